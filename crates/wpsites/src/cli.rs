//! Clap derive structures for the `wpsites` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wpsites -- manage WordPress site profiles and publish content
#[derive(Debug, Parser)]
#[command(
    name = "wpsites",
    version,
    about = "Manage WordPress site profiles and publish content",
    long_about = "Register WordPress sites with application-password credentials,\n\
        validate them against the live REST API, and publish posts.\n\n\
        Site metadata is stored on disk; credentials go to the OS keyring\n\
        (or an owner-only file store when configured).",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Output format (defaults to the config file value, then "table")
    #[arg(long, short = 'o', env = "WPSITES_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "WPSITES_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "WPSITES_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Data directory for the site index (overrides config)
    #[arg(long, env = "WPSITES_DATA_DIR", global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage registered WordPress sites
    #[command(alias = "s")]
    Sites(SitesArgs),

    /// Publish and browse content on a registered site
    #[command(alias = "p")]
    Posts(PostsArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SITES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SitesArgs {
    #[command(subcommand)]
    pub command: SitesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SitesCommand {
    /// List registered sites
    #[command(alias = "ls")]
    List,

    /// Show one site
    Get {
        /// Site ID
        id: String,
    },

    /// Register a site (validated before it is saved)
    Add(SiteAddArgs),

    /// Change a site's settings (re-validated before it is saved)
    Update(SiteUpdateArgs),

    /// Remove a site and its stored credentials
    #[command(alias = "rm")]
    Remove {
        /// Site ID
        id: String,
    },

    /// Re-check a site's credentials against the live API
    Validate {
        /// Site ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct SiteAddArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// Site URL, e.g. https://example.com
    #[arg(long)]
    pub url: String,

    /// REST API base path (default /wp-json/wp/v2/)
    #[arg(long)]
    pub rest_base: Option<String>,

    /// WordPress username
    #[arg(long, short = 'u')]
    pub username: String,

    /// Application password (prompted when omitted)
    #[arg(long, env = "WPSITES_APP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct SiteUpdateArgs {
    /// Site ID
    pub id: String,

    /// New display name
    #[arg(long)]
    pub name: Option<String>,

    /// New site URL
    #[arg(long)]
    pub url: Option<String>,

    /// New REST API base path
    #[arg(long)]
    pub rest_base: Option<String>,

    /// New WordPress username
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// New application password
    #[arg(long, env = "WPSITES_APP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Prompt for a new application password
    #[arg(long, conflicts_with = "password")]
    pub prompt_password: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  POSTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub command: PostsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PostsCommand {
    /// Create a post
    Create(PostCreateArgs),

    /// List the site's categories
    Categories {
        /// Site ID
        #[arg(long, short = 's')]
        site: String,
    },

    /// List the site's tags
    Tags {
        /// Site ID
        #[arg(long, short = 's')]
        site: String,
    },
}

#[derive(Debug, Args)]
pub struct PostCreateArgs {
    /// Site ID
    #[arg(long, short = 's')]
    pub site: String,

    /// Post title
    #[arg(long, short = 't')]
    pub title: String,

    /// Post body (HTML)
    #[arg(long, conflicts_with = "content_file")]
    pub content: Option<String>,

    /// Read the post body from a file
    #[arg(long, value_name = "PATH")]
    pub content_file: Option<PathBuf>,

    /// Excerpt
    #[arg(long)]
    pub excerpt: Option<String>,

    /// Publication status
    #[arg(long, default_value = "draft")]
    pub status: PostStatusArg,

    /// Category IDs (repeatable or comma-separated)
    #[arg(long = "category", value_delimiter = ',')]
    pub categories: Vec<u64>,

    /// Tag IDs (repeatable or comma-separated)
    #[arg(long = "tag", value_delimiter = ',')]
    pub tags: Vec<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PostStatusArg {
    Draft,
    Publish,
    Pending,
    Private,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG / COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display the resolved configuration
    Show,

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
