use crate::assets::Assets;
use crate::render::MarkdownRenderer;
use std::sync::Arc;

/// Per-worker handler state. Holds nothing mutable.
pub struct AppState {
    pub assets: Arc<Assets>,
    pub renderer: Box<dyn MarkdownRenderer>,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(assets: Arc<Assets>, renderer: Box<dyn MarkdownRenderer>, max_body_bytes: usize) -> Self {
        Self {
            assets,
            renderer,
            max_body_bytes,
        }
    }
}
