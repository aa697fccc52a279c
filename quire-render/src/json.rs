//! JSON output of the full model.

use crate::{RenderError, Renderer};
use quire_core::DocumentModel;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    pub pretty: bool,
}

impl JsonRenderer {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Renderer for JsonRenderer {
    type Output = String;

    fn render(&self, model: &DocumentModel) -> Result<String, RenderError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(model)?
        } else {
            serde_json::to_string(model)?
        };
        Ok(json)
    }
}
