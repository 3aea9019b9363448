//! Post and taxonomy command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use wpsites_core::{CoreError, NewPost, PostStatus, WpPost, WpTerm};

use crate::cli::{GlobalOpts, PostCreateArgs, PostStatusArg, PostsArgs, PostsCommand};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

use super::Store;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct TermRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Posts")]
    count: u64,
}

impl From<&WpTerm> for TermRow {
    fn from(t: &WpTerm) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            slug: t.slug.clone(),
            count: t.count,
        }
    }
}

fn post_detail(p: &WpPost) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:      {}", p.id);
    let _ = writeln!(out, "Title:   {}", p.title.rendered);
    let _ = writeln!(out, "Status:  {}", p.status);
    let _ = write!(out, "Link:    {}", p.link);
    out
}

impl From<PostStatusArg> for PostStatus {
    fn from(arg: PostStatusArg) -> Self {
        match arg {
            PostStatusArg::Draft => Self::Draft,
            PostStatusArg::Publish => Self::Publish,
            PostStatusArg::Pending => Self::Pending,
            PostStatusArg::Private => Self::Private,
        }
    }
}

fn new_post(args: PostCreateArgs) -> Result<NewPost, CliError> {
    let content = match (args.content, args.content_file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)?,
        (None, None) => {
            return Err(CliError::Validation {
                field: "content".into(),
                reason: "pass --content or --content-file".into(),
            });
        }
    };

    if args.title.trim().is_empty() {
        return Err(CliError::Validation {
            field: "title".into(),
            reason: "must not be empty".into(),
        });
    }

    Ok(NewPost {
        title: args.title,
        content,
        status: args.status.into(),
        excerpt: args.excerpt,
        categories: args.categories,
        tags: args.tags,
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    store: &Store,
    args: PostsArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let format = config::output_format(global, cfg);

    match args.command {
        PostsCommand::Create(create) => {
            let profile = super::require_site(store, &create.site).await?;
            let post = new_post(create)?;

            let spinner = output::spinner(
                &format!("Publishing to {}", profile.metadata.base_url),
                global.quiet,
            );
            let result = store
                .client()
                .create_post(&profile.connection(), &profile.credentials, &post)
                .await;
            spinner.finish_and_clear();

            let created = result.map_err(CoreError::from)?;
            tracing::info!(site_id = %profile.id(), post_id = created.id, status = %post.status.as_str(), "post created");
            output::success(
                &format!("Post {} created as {}", created.id, post.status.as_str()),
                global.quiet,
                global.color,
            );

            let out = output::render_single(format, &created, post_detail, |p| p.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PostsCommand::Categories { site } => {
            let profile = super::require_site(store, &site).await?;
            let terms = store
                .client()
                .list_categories(&profile.connection(), &profile.credentials)
                .await
                .map_err(CoreError::from)?;
            print_terms(format, &terms, global.quiet)
        }

        PostsCommand::Tags { site } => {
            let profile = super::require_site(store, &site).await?;
            let terms = store
                .client()
                .list_tags(&profile.connection(), &profile.credentials)
                .await
                .map_err(CoreError::from)?;
            print_terms(format, &terms, global.quiet)
        }
    }
}

fn print_terms(
    format: crate::cli::OutputFormat,
    terms: &[WpTerm],
    quiet: bool,
) -> Result<(), CliError> {
    let out = output::render_list(format, terms, |t| TermRow::from(t), |t| t.id.to_string())?;
    output::print_output(&out, quiet);
    Ok(())
}
