//! Static editor assets: the page template and the default markdown sample.

use std::path::{Path, PathBuf};
use crate::utils::escape_markup;
use tera::{Context, Tera};

pub const TEMPLATE_FILE: &str = "index.html";
pub const DEFAULT_MARKDOWN_FILE: &str = "markdown.md";

/// Parsed page template plus the markdown the editor opens with.
///
/// Loaded once at startup and never mutated afterwards.
pub struct Assets {
    templates: Tera,
    markdown_default: String,
}

impl Assets {
    pub async fn load(dir: &Path) -> Result<Self, AssetError> {
        let template_path = dir.join(TEMPLATE_FILE);
        let template = read(&template_path).await?;
        let markdown_default = read(&dir.join(DEFAULT_MARKDOWN_FILE)).await?;

        log::debug!("Loaded editor assets from {}", dir.display());
        Self::from_sources(&template, markdown_default)
    }

    pub fn from_sources(template: &str, markdown_default: String) -> Result<Self, AssetError> {
        let mut templates = Tera::default();
        templates.set_escape_fn(escape_markup);
        templates.add_raw_template(TEMPLATE_FILE, template)?;
        Ok(Self {
            templates,
            markdown_default,
        })
    }

    /// Renders the editor page with the default markdown in the `markdown` slot.
    pub fn render_editor(&self) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("markdown", &self.markdown_default);
        self.templates.render(TEMPLATE_FILE, &context)
    }
}

async fn read(path: &Path) -> Result<String, AssetError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| AssetError::Read {
            path: path.to_path_buf(),
            source,
        })
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing template: {0}")]
    Template(#[from] tera::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_assets(template: &str, markdown: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(TEMPLATE_FILE), template).unwrap();
        fs::write(dir.path().join(DEFAULT_MARKDOWN_FILE), markdown).unwrap();
        dir
    }

    #[actix_web::test]
    async fn loads_and_renders_default_markdown() {
        let dir = write_assets("<textarea>{{ markdown }}</textarea>", "# Hello");
        let assets = Assets::load(dir.path()).await.unwrap();

        assert_eq!(assets.render_editor().unwrap(), "<textarea># Hello</textarea>");
    }

    #[actix_web::test]
    async fn default_markdown_is_html_escaped() {
        let dir = write_assets("{{ markdown }}", "<script>alert(1)</script>");
        let page = Assets::load(dir.path()).await.unwrap().render_editor().unwrap();

        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;"));
    }

    #[actix_web::test]
    async fn urls_in_default_markdown_stay_literal() {
        let dir = write_assets("{{ markdown }}", "[docs](https://example.com/a/b)");
        let page = Assets::load(dir.path()).await.unwrap().render_editor().unwrap();

        assert_eq!(page, "[docs](https://example.com/a/b)");
    }

    #[actix_web::test]
    async fn bundled_templates_load() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates");
        let page = Assets::load(&dir).await.unwrap().render_editor().unwrap();
        assert!(page.contains("# Markdown Editor"));
    }

    #[actix_web::test]
    async fn missing_markdown_fails_load() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(TEMPLATE_FILE), "{{ markdown }}").unwrap();

        let err = Assets::load(dir.path()).await.err().unwrap();
        match err {
            AssetError::Read { path, .. } => assert!(path.ends_with(DEFAULT_MARKDOWN_FILE)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[actix_web::test]
    async fn malformed_template_fails_load() {
        let dir = write_assets("{{ markdown ", "text");
        let err = Assets::load(dir.path()).await.err().unwrap();
        assert!(matches!(err, AssetError::Template(_)));
    }
}
