//! Render Pipeline - Single Entry Point
//!
//! generate → compile → convert, each stage reusing its artifact when the
//! fingerprinted file already exists.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::compiler::compile_tex;
use crate::config::RenderConfig;
use crate::converter::{convert_to_svg, DEFAULT_PAGE};
use crate::error::TexError;
use crate::generator::generate_tex_file;
use crate::process::{ProcessRunner, SystemRunner};
use crate::templates::TexTemplate;

/// Every artifact produced for one expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedSvg {
    pub fingerprint: String,
    pub tex_path: PathBuf,
    pub compiled_path: PathBuf,
    pub svg_path: PathBuf,
}

pub struct RenderPipeline {
    config: RenderConfig,
    runner: Box<dyn ProcessRunner>,
}

impl RenderPipeline {
    pub fn new(config: RenderConfig) -> Self {
        Self::with_runner(config, Box::new(SystemRunner))
    }

    pub fn with_runner(config: RenderConfig, runner: Box<dyn ProcessRunner>) -> Self {
        Self { config, runner }
    }

    pub fn tex_dir(&self) -> &Path {
        &self.config.tex_dir
    }

    pub fn default_template(&self) -> &TexTemplate {
        &self.config.tex_template
    }

    /// Render `expression` to SVG and return the SVG path.
    ///
    /// `template` falls back to the configured default.
    pub fn tex_to_svg_file(
        &self,
        expression: &str,
        environment: Option<&str>,
        template: Option<&TexTemplate>,
    ) -> Result<PathBuf, TexError> {
        Ok(self.render(expression, environment, template)?.svg_path)
    }

    /// Same as [`Self::tex_to_svg_file`], reporting every intermediate artifact.
    pub fn render(
        &self,
        expression: &str,
        environment: Option<&str>,
        template: Option<&TexTemplate>,
    ) -> Result<RenderedSvg, TexError> {
        let template = template.unwrap_or(&self.config.tex_template);
        let tex_dir = self.tex_dir();

        let tex_path = generate_tex_file(expression, environment, template, tex_dir)?;
        let compiled_path = compile_tex(
            &tex_path,
            &template.tex_compiler,
            &template.output_format,
            tex_dir,
            self.runner.as_ref(),
        )?;
        let svg_path = convert_to_svg(
            &compiled_path,
            &template.output_format,
            DEFAULT_PAGE,
            self.runner.as_ref(),
        )?;

        let fingerprint = tex_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(RenderedSvg { fingerprint, tex_path, compiled_path, svg_path })
    }
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}
