use entitle_cli::commands::init;
use entitle_core::EntitleConfig;

#[test]
fn init_writes_loadable_config() {
    let tmp = tempfile::tempdir().unwrap();

    init::run(Some(tmp.path())).unwrap();

    let config = EntitleConfig::from_file(&tmp.path().join("entitle.toml")).unwrap();
    assert_eq!(config.product.slug, "my-plugin");
    assert_eq!(config.product.version.as_deref(), Some("1.0.0"));
    assert!(config.validate().is_ok());
}

#[test]
fn init_keeps_existing_config() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("entitle.toml");
    std::fs::write(&path, "[product]\nslug = \"mine\"\n").unwrap();

    init::run(Some(tmp.path())).unwrap();

    let config = EntitleConfig::from_file(&path).unwrap();
    assert_eq!(config.product.slug, "mine");
}
