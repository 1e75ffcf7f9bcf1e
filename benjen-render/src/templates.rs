//! Tera-backed site templates.

use benjen_core::{Entry, Page};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use thiserror::Error;

/// Templates that drive generated pages and are never passed through.
/// `top.html` is the shared layout the others extend.
pub const RESERVED_TEMPLATES: [&str; 4] = ["top.html", "index.html", "archive.html", "post.html"];

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to list templates in {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load templates from {path:?}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },

    #[error("Failed to render template '{name}': {source}")]
    Render {
        name: String,
        #[source]
        source: tera::Error,
    },
}

/// Parameters of the archive template
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveContext<'a> {
    pub posts: &'a [Entry],
}

/// Parameters of the post template
#[derive(Debug, Clone, Serialize)]
pub struct PostContext<'a> {
    pub post: &'a Entry,
}

/// Every template of the site's template directory
pub struct SiteTemplates {
    tera: Tera,
    file_names: Vec<String>,
}

impl SiteTemplates {
    /// Load every (non-hidden) file directly inside `dir`, each named by
    /// its file name
    pub fn load(dir: &Path) -> Result<Self, RenderError> {
        let io_err = |source: std::io::Error| RenderError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut files: Vec<(PathBuf, String)> = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') || !entry.file_type().map_err(io_err)?.is_file() {
                continue;
            }
            files.push((entry.path(), name));
        }
        files.sort_by(|a, b| a.1.cmp(&b.1));

        let mut tera = Tera::default();
        tera.add_template_files(
            files
                .iter()
                .map(|(path, name)| (path.as_path(), Some(name.as_str()))),
        )
        .map_err(|source| RenderError::Load {
            path: dir.to_path_buf(),
            source,
        })?;

        tracing::debug!("Loaded {} templates from {:?}", files.len(), dir);

        Ok(Self {
            tera,
            file_names: files.into_iter().map(|(_, name)| name).collect(),
        })
    }

    /// Render the template `<name>.html` with the given parameters
    pub fn render<C: Serialize>(&self, name: &str, params: &C) -> Result<String, RenderError> {
        let template = format!("{}.html", name);
        let context = Context::from_serialize(params).map_err(|source| RenderError::Render {
            name: template.clone(),
            source,
        })?;
        self.render_file(&template, &context)
    }

    /// One page of a paginated stream
    pub fn render_index(&self, page: &Page<'_>) -> Result<String, RenderError> {
        self.render("index", page)
    }

    pub fn render_archive(&self, posts: &[Entry]) -> Result<String, RenderError> {
        self.render("archive", &ArchiveContext { posts })
    }

    pub fn render_post(&self, post: &Entry) -> Result<String, RenderError> {
        self.render("post", &PostContext { post })
    }

    /// Render a passthrough template without parameters
    pub fn render_static(&self, file_name: &str) -> Result<String, RenderError> {
        self.render_file(file_name, &Context::new())
    }

    /// File names of the templates rendered as standalone pages
    pub fn static_pages(&self) -> impl Iterator<Item = &str> {
        self.file_names
            .iter()
            .map(|name| name.as_str())
            .filter(|name| !RESERVED_TEMPLATES.contains(name))
    }

    fn render_file(&self, template: &str, context: &Context) -> Result<String, RenderError> {
        self.tera
            .render(template, context)
            .map_err(|source| RenderError::Render {
                name: template.to_string(),
                source,
            })
    }
}
