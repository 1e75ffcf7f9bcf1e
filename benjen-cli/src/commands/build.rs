//! Build command implementation.

use anyhow::{Context, Result};
use benjen_core::{
    paginate, recent, Config, Entry, Feed, SiteBuilder, SiteIndex, Stream, FEED_FILE,
};
use benjen_render::SiteTemplates;
use chrono::{DateTime, Utc};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Everything a build stage needs, passed explicitly between stages
struct BuildContext {
    config: Config,
    templates: SiteTemplates,
    output_dir: PathBuf,
}

impl BuildContext {
    fn write(&self, file_name: &str, contents: &str) -> Result<()> {
        let path = self.output_dir.join(file_name);
        fs::write(&path, contents).with_context(|| format!("Failed to write {:?}", path))?;
        tracing::debug!("Wrote {}", file_name);
        Ok(())
    }
}

/// Build the static site described by the config file
pub fn build_site(config_path: &Path) -> Result<()> {
    tracing::info!("Loading config from {:?}", config_path);
    let config = Config::from_file(config_path)
        .with_context(|| format!("Failed to load configuration {:?}", config_path))?;
    build_site_with_config(config)
}

/// Build the site from an already loaded config
pub fn build_site_with_config(config: Config) -> Result<()> {
    let output_dir = config.output_dir();
    reset_output_dir(&output_dir, &config.static_dir())?;

    let templates_dir = config.templates_dir();
    let templates = SiteTemplates::load(&templates_dir).context("Failed to load templates")?;

    let ctx = BuildContext {
        config,
        templates,
        output_dir,
    };

    let index = SiteBuilder::new(&ctx.config)
        .build()
        .context("Failed to load entries")?;

    let recent_posts = recent(&index.main, ctx.config.recent_posts);

    render_stream(&ctx, &index, Stream::Main, recent_posts)?;
    render_archive(&ctx, &index.main)?;
    render_stream(&ctx, &index, Stream::Galley, recent_posts)?;

    for entry in index.all_entries() {
        render_post(&ctx, entry)?;
    }

    render_statics(&ctx)?;
    generate_feed(&ctx, &index, Utc::now())?;

    tracing::info!("✓ Built {} entries", index.len());
    tracing::info!("✓ Output written to {:?}", ctx.output_dir);

    Ok(())
}

/// Remove any previous output and seed it with the static assets
fn reset_output_dir(output_dir: &Path, static_dir: &Path) -> Result<()> {
    match fs::remove_dir_all(output_dir) {
        Ok(()) => tracing::debug!("Removed previous output {:?}", output_dir),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to remove {:?}", output_dir));
        }
    }

    if !static_dir.is_dir() {
        anyhow::bail!("Static assets directory {:?} does not exist", static_dir);
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;
    copy_dir(static_dir, output_dir)?;
    tracing::info!("Copied static assets from {:?}", static_dir);

    Ok(())
}

fn copy_dir(src: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry.with_context(|| format!("Failed to walk {:?}", src))?;
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {:?}", target))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)
                .with_context(|| format!("Failed to copy {:?} to {:?}", entry.path(), target))?;
        }
    }
    Ok(())
}

/// Render every page of one stream
fn render_stream(
    ctx: &BuildContext,
    index: &SiteIndex,
    stream: Stream,
    recent_posts: &[Entry],
) -> Result<()> {
    let pages = paginate(
        index.stream(stream),
        ctx.config.per_page,
        recent_posts,
        stream.page_prefix(),
    );

    for page in &pages {
        let html = ctx
            .templates
            .render_index(page)
            .with_context(|| format!("Failed to render {}", page.file_name))?;
        ctx.write(&page.file_name, &html)?;
    }

    tracing::debug!("Rendered {} {} pages", pages.len(), stream.page_prefix());
    Ok(())
}

fn render_archive(ctx: &BuildContext, posts: &[Entry]) -> Result<()> {
    let html = ctx
        .templates
        .render_archive(posts)
        .context("Failed to render archive.html")?;
    ctx.write("archive.html", &html)
}

fn render_post(ctx: &BuildContext, entry: &Entry) -> Result<()> {
    let html = ctx
        .templates
        .render_post(entry)
        .with_context(|| format!("Failed to render post '{}'", entry.title))?;
    ctx.write(&entry.link, &html)
}

/// Render the templates that are not part of the generated page set
fn render_statics(ctx: &BuildContext) -> Result<()> {
    for file_name in ctx.templates.static_pages() {
        tracing::info!("Processing {}", file_name);
        let html = ctx
            .templates
            .render_static(file_name)
            .with_context(|| format!("Failed to render {}", file_name))?;
        ctx.write(file_name, &html)?;
    }
    Ok(())
}

/// Write feed.xml when both rss_title and rss_description are configured
fn generate_feed(ctx: &BuildContext, index: &SiteIndex, built_at: DateTime<Utc>) -> Result<()> {
    let Some((title, description)) = ctx.config.rss() else {
        tracing::info!("RSS title or description not configured; skipping {}", FEED_FILE);
        return Ok(());
    };

    let feed = Feed::new(
        title,
        description,
        &ctx.config.root_url,
        built_at,
        index.all_entries(),
    )
    .context("Failed to build feed")?;

    ctx.write(FEED_FILE, &feed.to_xml())?;
    tracing::info!("Generated {} with {} items", FEED_FILE, feed.items.len());
    Ok(())
}
