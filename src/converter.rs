//! Vector Converter - turns DVI/XDV/PDF output into SVG with dvisvgm.

use std::path::{Path, PathBuf};

use crate::compiler::with_extension;
use crate::error::TexError;
use crate::process::{CommandSpec, ProcessRunner};

pub const CONVERTER_PROGRAM: &str = "dvisvgm";
pub const DEFAULT_PAGE: u32 = 1;

pub fn svg_conversion_command(
    input: &Path,
    extension: &str,
    page: u32,
    output: &Path,
) -> CommandSpec {
    let mut command = CommandSpec::new(CONVERTER_PROGRAM);
    if extension == ".pdf" {
        command = command.arg("--pdf");
    }
    command
        .arg("-p")
        .arg(page.to_string())
        .arg(input.display().to_string())
        .arg("-n")
        .arg("-v")
        .arg("0")
        .arg("-o")
        .arg(output.display().to_string())
}

/// Convert `input` to SVG, reusing an existing SVG.
///
/// Success is judged by the SVG existing afterwards, not by dvisvgm's exit code.
pub fn convert_to_svg(
    input: &Path,
    extension: &str,
    page: u32,
    runner: &dyn ProcessRunner,
) -> Result<PathBuf, TexError> {
    let result = with_extension(input, ".svg");
    if !result.exists() {
        let command = svg_conversion_command(input, extension, page, &result);
        let outcome = runner.run(&command)?;
        if !outcome.is_success() {
            tracing::debug!("{} exited with {:?}", CONVERTER_PROGRAM, outcome.code);
        }
    }

    if !result.exists() {
        return Err(TexError::ConversionUnsupported {
            extension: extension.to_string(),
        });
    }

    Ok(result)
}
