//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::OutputFormat;

/// Default filter directive when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool, format: OutputFormat) -> &'static str {
    match (format, verbose) {
        (OutputFormat::Json, _) => "error",
        (_, true) => "entitle=debug,entitle_core=debug,entitle_cli=debug",
        (_, false) => "warn",
    }
}

/// Installs a stderr fmt subscriber. `RUST_LOG` wins over the flags.
pub fn init(verbose: bool, format: OutputFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, format)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_output_keeps_logs_quiet() {
        assert_eq!(default_directive(true, OutputFormat::Json), "error");
        assert_eq!(default_directive(false, OutputFormat::Terminal), "warn");
        assert!(default_directive(true, OutputFormat::Terminal).contains("entitle_core=debug"));
    }
}
