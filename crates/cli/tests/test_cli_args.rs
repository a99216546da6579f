use clap::Parser;
use entitle_cli::{Cli, Commands, OutputFormat};
use std::path::PathBuf;

#[test]
fn activate_takes_key() {
    let cli = Cli::try_parse_from(["entitle", "activate", "KEY-1"]).unwrap();
    assert!(matches!(cli.command, Commands::Activate { ref key } if key == "KEY-1"));
    assert_eq!(cli.format, OutputFormat::Terminal);
    assert!(!cli.verbose);
    assert!(cli.config.is_none());
}

#[test]
fn activate_requires_key() {
    assert!(Cli::try_parse_from(["entitle", "activate"]).is_err());
}

#[test]
fn global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "entitle",
        "check",
        "--format",
        "json",
        "--config",
        "/etc/entitle.toml",
        "-v",
    ])
    .unwrap();

    assert!(matches!(cli.command, Commands::Check));
    assert_eq!(cli.format, OutputFormat::Json);
    assert_eq!(cli.config, Some(PathBuf::from("/etc/entitle.toml")));
    assert!(cli.verbose);
}

#[test]
fn updates_flags() {
    let cli =
        Cli::try_parse_from(["entitle", "updates", "--current", "1.2.3", "--refresh"]).unwrap();
    match cli.command {
        Commands::Updates { current, refresh } => {
            assert_eq!(current.as_deref(), Some("1.2.3"));
            assert!(refresh);
        }
        _ => panic!("expected updates command"),
    }
}

#[test]
fn init_path_is_optional() {
    let cli = Cli::try_parse_from(["entitle", "init"]).unwrap();
    assert!(matches!(cli.command, Commands::Init { path: None }));

    let cli = Cli::try_parse_from(["entitle", "init", "/tmp/project"]).unwrap();
    assert!(matches!(cli.command, Commands::Init { path: Some(_) }));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["entitle"]).is_err());
}

#[test]
fn unknown_format_is_rejected() {
    assert!(Cli::try_parse_from(["entitle", "status", "--format", "sarif"]).is_err());
}
