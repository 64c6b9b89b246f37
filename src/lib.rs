//! TexVector Core - TeX expression to SVG compiler
//!
//! # Pipeline
//! 1. Document: expression + template → `{fingerprint}.tex`
//! 2. Compile: external TeX compiler → `{fingerprint}.dvi|.xdv|.pdf`
//! 3. Convert: dvisvgm → `{fingerprint}.svg`
//!
//! The fingerprint is a hash of the rendered document, so every stage is a
//! content-addressed cache: an existing artifact is never rebuilt.

pub mod compiler;
pub mod config;
pub mod converter;
pub mod error;
pub mod generator;
pub mod hashing;
pub mod pipeline;
pub mod process;
pub mod templates;

pub use compiler::{compile_tex, scrape_log_errors, tex_compilation_command, LogExcerpt};
pub use config::RenderConfig;
pub use converter::convert_to_svg;
pub use error::TexError;
pub use generator::generate_tex_file;
pub use hashing::{sha256_hex, tex_hash};
pub use pipeline::{RenderPipeline, RenderedSvg};
pub use process::{CommandSpec, ProcessOutcome, ProcessRunner, SystemRunner};
pub use templates::{TemplateId, TemplateRegistry, TexTemplate};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
