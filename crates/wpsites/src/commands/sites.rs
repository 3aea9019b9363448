//! Site command handlers.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Serialize;
use tabled::Tabled;

use wpsites_core::{AuthStrategy, SiteCapabilities, SiteInput, SiteProfile};

use crate::cli::{GlobalOpts, SiteAddArgs, SiteUpdateArgs, SitesArgs, SitesCommand};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

use super::Store;

// ── Views ───────────────────────────────────────────────────────────

/// What the CLI shows for a site. The application password never appears.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SiteView {
    id: String,
    name: String,
    base_url: String,
    rest_base: String,
    username: String,
    auth_strategy: AuthStrategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    capabilities: Option<SiteCapabilities>,
    #[serde(skip_serializing_if = "Option::is_none")]
    validated_at: Option<DateTime<Utc>>,
}

impl From<&SiteProfile> for SiteView {
    fn from(p: &SiteProfile) -> Self {
        Self {
            id: p.metadata.id.clone(),
            name: p.metadata.name.clone(),
            base_url: p.metadata.base_url.clone(),
            rest_base: p.metadata.rest_base.clone(),
            username: p.credentials.username.clone(),
            auth_strategy: p.credentials.auth_strategy,
            capabilities: p.metadata.capabilities,
            validated_at: p.metadata.validated_at,
        }
    }
}

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Validated")]
    validated: String,
}

impl From<&SiteView> for SiteRow {
    fn from(v: &SiteView) -> Self {
        Self {
            id: v.id.clone(),
            name: v.name.clone(),
            url: v.base_url.clone(),
            user: v.username.clone(),
            validated: format_stamp(v.validated_at),
        }
    }
}

fn format_stamp(stamp: Option<DateTime<Utc>>) -> String {
    stamp.map_or_else(|| "never".into(), |t| t.format("%Y-%m-%d %H:%M UTC").to_string())
}

fn detail(v: &SiteView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:         {}", v.id);
    let _ = writeln!(out, "Name:       {}", v.name);
    let _ = writeln!(out, "URL:        {}", v.base_url);
    let _ = writeln!(out, "REST base:  {}", v.rest_base);
    let _ = writeln!(out, "User:       {}", v.username);
    let _ = writeln!(out, "Auth:       {}", v.auth_strategy);
    if let Some(caps) = v.capabilities {
        let enabled: Vec<&str> = [
            ("categories", caps.categories),
            ("tags", caps.tags),
            ("media", caps.media),
        ]
        .into_iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect();
        let _ = writeln!(out, "Supports:   {}", enabled.join(", "));
    }
    let _ = write!(out, "Validated:  {}", format_stamp(v.validated_at));
    out
}

fn print_site(profile: &SiteProfile, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let view = SiteView::from(profile);
    let out = output::render_single(
        config::output_format(global, cfg),
        &view,
        detail,
        |v| v.id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Input assembly ──────────────────────────────────────────────────

/// `--password` / `WPSITES_APP_PASSWORD`, else an interactive prompt.
fn password_or_prompt(password: Option<String>) -> Result<SecretString, CliError> {
    match password {
        Some(p) => Ok(SecretString::from(p)),
        None => super::prompt_password("Application password: "),
    }
}

fn add_input(args: SiteAddArgs) -> Result<SiteInput, CliError> {
    let application_password = password_or_prompt(args.password)?;
    Ok(SiteInput {
        id: None,
        name: args.name,
        base_url: args.url,
        rest_base: args.rest_base,
        username: args.username,
        application_password,
    })
}

/// Overlay the given flags on the stored profile. Unset flags keep the
/// stored value; the stored password is reused unless a new one is given.
fn update_input(existing: &SiteProfile, args: SiteUpdateArgs) -> Result<SiteInput, CliError> {
    let mut input = SiteInput::from(existing);
    if let Some(name) = args.name {
        input.name = name;
    }
    if let Some(url) = args.url {
        input.base_url = url;
    }
    if let Some(rest_base) = args.rest_base {
        input.rest_base = Some(rest_base);
    }
    if let Some(username) = args.username {
        input.username = username;
    }
    if let Some(password) = args.password {
        input.application_password = SecretString::from(password);
    } else if args.prompt_password {
        input.application_password = super::prompt_password("New application password: ")?;
    }
    Ok(input)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    store: &Store,
    args: SitesArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SitesCommand::List => {
            let sites = store.list_sites().await?;
            let views: Vec<SiteView> = sites.iter().map(SiteView::from).collect();
            let out = output::render_list(
                config::output_format(global, cfg),
                &views,
                |v| SiteRow::from(v),
                |v| v.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SitesCommand::Get { id } => {
            let profile = super::require_site(store, &id).await?;
            print_site(&profile, cfg, global)
        }

        SitesCommand::Add(add) => {
            let input = add_input(add)?;
            let spinner = output::spinner(&format!("Validating {}", input.base_url), global.quiet);
            let result = store.upsert_site(input).await;
            spinner.finish_and_clear();

            let profile = result?;
            output::success(
                &format!("Site '{}' added ({})", profile.name(), profile.id()),
                global.quiet,
                global.color,
            );
            print_site(&profile, cfg, global)
        }

        SitesCommand::Update(update) => {
            let existing = super::require_site(store, &update.id).await?;
            let input = update_input(&existing, update)?;
            let spinner = output::spinner(&format!("Validating {}", input.base_url), global.quiet);
            let result = store.upsert_site(input).await;
            spinner.finish_and_clear();

            let profile = result?;
            output::success(
                &format!("Site '{}' updated", profile.name()),
                global.quiet,
                global.color,
            );
            print_site(&profile, cfg, global)
        }

        SitesCommand::Remove { id } => {
            let profile = super::require_site(store, &id).await?;
            if !super::confirm(
                &format!(
                    "Remove site '{}' ({}) and its stored credentials?",
                    profile.name(),
                    profile.metadata.base_url
                ),
                global.yes,
            )? {
                return Ok(());
            }
            store.remove_site(&id).await?;
            output::success(
                &format!("Site '{}' removed", profile.name()),
                global.quiet,
                global.color,
            );
            Ok(())
        }

        SitesCommand::Validate { id } => {
            let spinner = output::spinner(&format!("Validating site {id}"), global.quiet);
            let result = store.revalidate_site(&id).await;
            spinner.finish_and_clear();

            let profile = result?;
            output::success(
                &format!("Site '{}' accepted the stored credentials", profile.name()),
                global.quiet,
                global.color,
            );
            print_site(&profile, cfg, global)
        }
    }
}
