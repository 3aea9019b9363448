//! Command dispatch and shared helpers.

pub mod config_cmd;
pub mod posts;
pub mod sites;

use clap::CommandFactory;
use secrecy::SecretString;

use wpsites_config::SecretRegion;
use wpsites_core::{CoreError, FileStore, RestClient, SiteProfile, SiteStore};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;

/// The store every site-facing command works against.
pub type Store = SiteStore<FileStore, SecretRegion>;

pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        // Neither needs the store
        Command::Completions(args) => {
            let mut cli = Cli::command();
            clap_complete::generate(args.shell, &mut cli, "wpsites", &mut std::io::stdout());
            Ok(())
        }
        Command::Config(args) => config_cmd::handle(args, global),

        Command::Sites(args) => {
            let cfg = config::effective_config(global)?;
            let store = build_store(&cfg)?;
            sites::handle(&store, args, &cfg, global).await
        }
        Command::Posts(args) => {
            let cfg = config::effective_config(global)?;
            let store = build_store(&cfg)?;
            posts::handle(&store, args, &cfg, global).await
        }
    }
}

pub fn build_store(cfg: &Config) -> Result<Store, CliError> {
    let client = RestClient::new(&cfg.transport_config()).map_err(CoreError::from)?;
    tracing::debug!(
        data_dir = %cfg.data_dir().display(),
        secrets = %cfg.secret_store().describe(),
        "opening site store"
    );
    Ok(SiteStore::new(client, cfg.metadata_store(), cfg.secret_store()))
}

/// Look up a site or fail with `NotFound`.
pub async fn require_site(store: &Store, id: &str) -> Result<SiteProfile, CliError> {
    store
        .get_site(id)
        .await?
        .ok_or_else(|| CliError::NotFound { id: id.to_owned() })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Read an application password without echo.
pub fn prompt_password(prompt: &str) -> Result<SecretString, CliError> {
    let password = rpassword::prompt_password(prompt)?;
    Ok(SecretString::from(password.trim().to_owned()))
}
