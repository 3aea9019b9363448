//! CLI configuration: thin wrapper around `wpsites_config`.
//!
//! Applies `GlobalOpts` overrides (--data-dir, --insecure, --timeout,
//! --output) on top of the loaded file + environment config.

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use wpsites_config::{Config, SecretBackend, config_path, load_config, save_config};

/// Loaded config with CLI flags applied. Flags win over file and env.
pub fn effective_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = load_config()?;
    apply_overrides(&mut cfg, global);
    cfg.validate()?;
    Ok(cfg)
}

fn apply_overrides(cfg: &mut Config, global: &GlobalOpts) {
    if let Some(ref dir) = global.data_dir {
        cfg.storage.data_dir = Some(dir.clone());
    }
    if global.insecure {
        cfg.defaults.insecure = true;
    }
    if let Some(timeout) = global.timeout {
        cfg.defaults.timeout = timeout;
    }
}

/// `--output`, then `defaults.output`, then table.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> OutputFormat {
    global.output.unwrap_or_else(|| match cfg.defaults.output.as_str() {
        "json" => OutputFormat::Json,
        "json-compact" => OutputFormat::JsonCompact,
        "yaml" => OutputFormat::Yaml,
        "plain" => OutputFormat::Plain,
        _ => OutputFormat::Table,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["wpsites"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["sites", "list"]);
        Cli::parse_from(argv).global
    }

    #[test]
    fn flags_override_loaded_values() {
        let mut cfg = Config::default();
        apply_overrides(
            &mut cfg,
            &global(&["--data-dir", "/tmp/wp", "--insecure", "--timeout", "7"]),
        );

        assert_eq!(cfg.storage.data_dir, Some(PathBuf::from("/tmp/wp")));
        assert!(cfg.defaults.insecure);
        assert_eq!(cfg.defaults.timeout, 7);
    }

    #[test]
    fn absent_flags_keep_loaded_values() {
        let mut cfg = Config::default();
        cfg.defaults.timeout = 12;
        apply_overrides(&mut cfg, &global(&[]));

        assert_eq!(cfg.defaults.timeout, 12);
        assert_eq!(cfg.storage.data_dir, None);
    }

    #[test]
    fn output_falls_back_to_config_default() {
        let mut cfg = Config::default();
        assert_eq!(output_format(&global(&[]), &cfg), OutputFormat::Table);

        cfg.defaults.output = "yaml".into();
        assert_eq!(output_format(&global(&[]), &cfg), OutputFormat::Yaml);
        assert_eq!(
            output_format(&global(&["-o", "json"]), &cfg),
            OutputFormat::Json
        );
    }
}
