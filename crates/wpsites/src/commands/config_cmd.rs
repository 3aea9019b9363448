//! Config subcommand handlers.

use std::path::PathBuf;

use dialoguer::{Confirm, Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config, SecretBackend};
use crate::error::CliError;
use crate::output;

/// Map a dialoguer failure into CliError.
fn prompt_err(e: dialoguer::Error) -> CliError {
    CliError::Io(std::io::Error::other(e))
}

/// TOML as it would be written, plus a trailing note on the secret region.
fn format_config(cfg: &Config) -> Result<String, CliError> {
    let body = toml::to_string_pretty(cfg).map_err(wpsites_config::ConfigError::from)?;
    Ok(format!(
        "{body}\n# data dir: {}\n# secrets:  {}",
        cfg.data_dir().display(),
        cfg.secret_store().describe()
    ))
}

fn run_wizard() -> Result<Config, CliError> {
    let mut cfg = Config::default();

    let formats = ["table", "json", "yaml", "plain"];
    let idx = Select::new()
        .with_prompt("Default output format")
        .items(&formats)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    cfg.defaults.output = formats[idx].into();

    let backends = [
        "OS keyring (recommended)",
        "Owner-only files in the data directory",
    ];
    let idx = Select::new()
        .with_prompt("Where should application passwords be stored?")
        .items(&backends)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    cfg.storage.secret_backend = if idx == 0 {
        SecretBackend::Keyring
    } else {
        SecretBackend::File
    };

    let data_dir: String = Input::new()
        .with_prompt("Data directory")
        .default(cfg.data_dir().display().to_string())
        .interact_text()
        .map_err(prompt_err)?;
    if PathBuf::from(&data_dir) != cfg.data_dir() {
        cfg.storage.data_dir = Some(PathBuf::from(data_dir));
    }

    cfg.defaults.timeout = Input::new()
        .with_prompt("Request timeout (seconds)")
        .default(cfg.defaults.timeout)
        .validate_with(|t: &u64| if *t > 0 { Ok(()) } else { Err("must be at least 1") })
        .interact_text()
        .map_err(prompt_err)?;

    cfg.defaults.insecure = Confirm::new()
        .with_prompt("Accept invalid TLS certificates (staging sites only)?")
        .default(false)
        .interact()
        .map_err(prompt_err)?;

    Ok(cfg)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let path = config::config_path();
            eprintln!("wpsites configuration");
            eprintln!("   Config path: {}\n", path.display());

            if path.exists()
                && !super::confirm("A config file already exists. Overwrite it?", global.yes)?
            {
                return Ok(());
            }

            let cfg = run_wizard()?;
            cfg.validate()?;
            config::save_config(&cfg)?;
            output::success(
                &format!("Config written to {}", path.display()),
                global.quiet,
                global.color,
            );
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::effective_config(global)?;
            let out = match config::output_format(global, &cfg) {
                OutputFormat::Table | OutputFormat::Plain => format_config(&cfg)?,
                structured => output::render_single(
                    structured,
                    &cfg,
                    |_| String::new(),
                    |_| String::new(),
                )?,
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn formatted_config_names_secret_location() {
        let mut cfg = Config::default();
        cfg.storage.data_dir = Some(PathBuf::from("/srv/wp"));
        cfg.storage.secret_backend = SecretBackend::File;

        let text = format_config(&cfg).unwrap();

        assert!(text.contains("[defaults]"));
        assert!(text.contains("secret_backend = \"file\""));
        assert!(text.contains("# secrets:  files in /srv/wp/secrets"));
    }
}
