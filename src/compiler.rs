//! Compiler Invoker - runs the TeX compiler and scrapes its log on failure.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::TexError;
use crate::process::{CommandSpec, ProcessRunner};

/// Compilers driven with `-output-format`.
pub const LATEX_FAMILY: [&str; 4] = ["latex", "pdflatex", "luatex", "lualatex"];

const ERROR_MARKER: &str = "!";
const LOCATION_MARKER: &str = "l.";
const MAX_EXCERPT_LOOKAHEAD: usize = 10;

/// One diagnostic pulled from a compiler log, starting at its `!` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogExcerpt {
    /// Zero-based index of the `!` line in the log.
    pub line: usize,
    pub lines: Vec<String>,
}

/// Replace the extension of `path`; `extension` may carry a leading dot.
pub(crate) fn with_extension(path: &Path, extension: &str) -> PathBuf {
    path.with_extension(extension.trim_start_matches('.'))
}

/// Build the compile command for `tex_compiler`.
pub fn tex_compilation_command(
    tex_compiler: &str,
    output_format: &str,
    tex_file: &Path,
    tex_dir: &Path,
) -> Result<CommandSpec, TexError> {
    let output_directory = format!("-output-directory={}", tex_dir.display());
    let tex_file = tex_file.display().to_string();

    if LATEX_FAMILY.contains(&tex_compiler) {
        Ok(CommandSpec::new(tex_compiler)
            .arg("-interaction=batchmode")
            .arg(format!("-output-format={}", output_format.trim_start_matches('.')))
            .arg("-halt-on-error")
            .arg(output_directory)
            .arg(tex_file))
    } else if tex_compiler == "xelatex" {
        let mut command = CommandSpec::new("xelatex");
        match output_format {
            ".xdv" => command = command.arg("-no-pdf"),
            ".pdf" => {}
            _ => {
                return Err(TexError::UnsupportedFormat {
                    compiler: tex_compiler.to_string(),
                    format: output_format.to_string(),
                })
            }
        }
        Ok(command
            .arg("-interaction=batchmode")
            .arg("-halt-on-error")
            .arg(output_directory)
            .arg(tex_file))
    } else {
        Err(TexError::UnknownCompiler(tex_compiler.to_string()))
    }
}

/// Compile `tex_file` into `output_format`, reusing an existing output.
pub fn compile_tex(
    tex_file: &Path,
    tex_compiler: &str,
    output_format: &str,
    tex_dir: &Path,
    runner: &dyn ProcessRunner,
) -> Result<PathBuf, TexError> {
    let result = with_extension(tex_file, output_format);
    if result.exists() {
        tracing::debug!("reusing compiled {}", result.display());
        return Ok(result);
    }

    let command = tex_compilation_command(tex_compiler, output_format, tex_file, tex_dir)?;
    let outcome = runner.run(&command)?;
    if outcome.is_success() {
        return Ok(result);
    }

    let log_path = with_extension(tex_file, ".log");
    if !log_path.exists() {
        return Err(TexError::ToolchainMissing {
            compiler: tex_compiler.to_string(),
        });
    }

    let log = String::from_utf8_lossy(&std::fs::read(&log_path)?).into_owned();
    let excerpts = scrape_log_errors(&log);
    if !excerpts.is_empty() {
        tracing::error!("LaTeX compilation error! {} reports:", tex_compiler);
        for excerpt in &excerpts {
            for line in &excerpt.lines {
                tracing::error!("{}", line);
            }
        }
    }

    Err(TexError::CompilationError {
        compiler: tex_compiler.to_string(),
        format: output_format.to_string(),
        log_path,
        excerpts,
    })
}

/// Collect the diagnostic windows of a TeX log.
///
/// A window runs from a `!` line through the next `l.` line within ten lines,
/// or covers the `!` line and the ten lines after it when no `l.` follows.
pub fn scrape_log_errors(log: &str) -> Vec<LogExcerpt> {
    let lines: Vec<&str> = log.lines().collect();
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.starts_with(ERROR_MARKER))
        .map(|(start, _)| {
            let limit = (start + MAX_EXCERPT_LOOKAHEAD).min(lines.len().saturating_sub(1));
            let end = (start + 1..=limit)
                .find(|&i| lines[i].starts_with(LOCATION_MARKER))
                .unwrap_or(limit);
            LogExcerpt {
                line: start,
                lines: lines[start..=end].iter().map(|l| l.to_string()).collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> (PathBuf, PathBuf) {
        (PathBuf::from("media/Tex/abc.tex"), PathBuf::from("media/Tex"))
    }

    #[test]
    fn test_latex_family_command() {
        let (file, dir) = paths();
        for compiler in LATEX_FAMILY {
            let cmd = tex_compilation_command(compiler, ".dvi", &file, &dir).unwrap();
            assert_eq!(cmd.program, compiler);
            assert_eq!(
                cmd.args,
                vec![
                    "-interaction=batchmode",
                    "-output-format=dvi",
                    "-halt-on-error",
                    "-output-directory=media/Tex",
                    "media/Tex/abc.tex",
                ]
            );
        }
    }

    #[test]
    fn test_xelatex_flags() {
        let (file, dir) = paths();
        let xdv = tex_compilation_command("xelatex", ".xdv", &file, &dir).unwrap();
        assert_eq!(xdv.args.first().map(String::as_str), Some("-no-pdf"));

        let pdf = tex_compilation_command("xelatex", ".pdf", &file, &dir).unwrap();
        assert!(!pdf.has_arg("-no-pdf"));
        assert!(pdf.has_arg("-halt-on-error"));

        let err = tex_compilation_command("xelatex", ".dvi", &file, &dir).unwrap_err();
        assert!(matches!(err, TexError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_unknown_compiler() {
        let (file, dir) = paths();
        let err = tex_compilation_command("not-a-compiler", ".pdf", &file, &dir).unwrap_err();
        assert!(matches!(err, TexError::UnknownCompiler(ref name) if name == "not-a-compiler"));
    }

    #[test]
    fn test_scrape_stops_at_location_line() {
        let log = "This is pdfTeX\n\
                   ! Undefined control sequence.\n\
                   <recently read> \\foo\n\
                   \n\
                   l.7 $\\foo\n\
                   Here is how much of TeX's memory you used:\n";
        let excerpts = scrape_log_errors(log);
        assert_eq!(excerpts.len(), 1);
        assert_eq!(excerpts[0].line, 1);
        assert_eq!(
            excerpts[0].lines,
            vec!["! Undefined control sequence.", "<recently read> \\foo", "", "l.7 $\\foo"]
        );
    }

    #[test]
    fn test_scrape_without_location_is_bounded() {
        let mut log = String::from("! Emergency stop.\n");
        for i in 0..20 {
            log.push_str(&format!("context {}\n", i));
        }
        let excerpts = scrape_log_errors(&log);
        assert_eq!(excerpts[0].lines.len(), 1 + MAX_EXCERPT_LOOKAHEAD);

        let short = scrape_log_errors("! Emergency stop.\nonly line");
        assert_eq!(short[0].lines, vec!["! Emergency stop.", "only line"]);
    }

    #[test]
    fn test_scrape_multiple_errors() {
        let log = "! First.\nl.1 a\n! Second.\nl.2 b\n";
        let excerpts = scrape_log_errors(log);
        assert_eq!(excerpts.len(), 2);
        assert_eq!(excerpts[1].lines, vec!["! Second.", "l.2 b"]);
        assert!(scrape_log_errors("no problems here\n").is_empty());
    }
}
