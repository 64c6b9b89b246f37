//! Render configuration - the working directory and the default template.
//!
//! Loaded once and handed to [`crate::RenderPipeline`]; the stages themselves
//! never look it up.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::TexError;
use crate::templates::{TemplateRegistry, TexTemplate};

pub const DEFAULT_TEX_DIR: &str = "media/Tex";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    /// Directory holding every `.tex`, compiled and `.svg` artifact.
    #[serde(default = "default_tex_dir")]
    pub tex_dir: PathBuf,
    #[serde(default)]
    pub tex_template: TexTemplate,
}

fn default_tex_dir() -> PathBuf { PathBuf::from(DEFAULT_TEX_DIR) }

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tex_dir: default_tex_dir(),
            tex_template: TexTemplate::default(),
        }
    }
}

impl RenderConfig {
    pub fn new(tex_dir: impl Into<PathBuf>, tex_template: TexTemplate) -> Self {
        Self { tex_dir: tex_dir.into(), tex_template }
    }

    /// Read a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, TexError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Swap the default template for one from `registry`.
    pub fn with_template_id(
        mut self,
        registry: &TemplateRegistry,
        id: &str,
    ) -> Result<Self, TexError> {
        self.tex_template = registry
            .get(id)
            .cloned()
            .ok_or_else(|| TexError::Config(format!("Template not found: {}", id)))?;
        Ok(self)
    }
}
