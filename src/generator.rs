//! Document Generator - writes the rendered document under its fingerprint.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::TexError;
use crate::hashing::tex_hash;
use crate::templates::TexTemplate;

/// Render `expression` with `template` and write it to `tex_dir/{fingerprint}.tex`.
///
/// An existing file with that name is left untouched.
pub fn generate_tex_file(
    expression: &str,
    environment: Option<&str>,
    template: &TexTemplate,
    tex_dir: &Path,
) -> Result<PathBuf, TexError> {
    let output = template.render(expression, environment);

    fs::create_dir_all(tex_dir)?;

    let result = tex_dir.join(format!("{}.tex", tex_hash(&output)));
    if !result.exists() {
        tracing::info!("Writing \"{}\" to {}", expression, result.display());
        fs::write(&result, output.as_bytes())?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLog {
        fn take(&self) -> String {
            String::from_utf8(std::mem::take(&mut *self.0.lock().unwrap())).unwrap()
        }
    }

    #[test]
    fn test_writes_fingerprinted_file() {
        let dir = tempfile::tempdir().unwrap();
        let tex_dir = dir.path().join("nested").join("Tex");
        let template = TexTemplate::default();

        let path = generate_tex_file("x^2", None, &template, &tex_dir).unwrap();
        let expected = template.get_texcode_for_expression("x^2");
        assert_eq!(path, tex_dir.join(format!("{}.tex", tex_hash(&expected))));
        assert_eq!(fs::read_to_string(&path).unwrap(), expected);
    }

    #[test]
    fn test_environment_changes_fingerprint() {
        let dir = tempfile::tempdir().unwrap();
        let template = TexTemplate::default();
        let plain = generate_tex_file("a=b", None, &template, dir.path()).unwrap();
        let aligned = generate_tex_file("a=b", Some("align*"), &template, dir.path()).unwrap();
        assert_ne!(plain, aligned);
        assert!(fs::read_to_string(&aligned).unwrap().contains("\\begin{align*}"));
    }

    #[test]
    fn test_existing_file_is_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let template = TexTemplate::default();
        let path = generate_tex_file("y", None, &template, dir.path()).unwrap();

        fs::write(&path, "sentinel").unwrap();
        let again = generate_tex_file("y", None, &template, dir.path()).unwrap();
        assert_eq!(path, again);
        assert_eq!(fs::read_to_string(&again).unwrap(), "sentinel");
    }

    #[test]
    fn test_logs_only_on_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let template = TexTemplate::default();
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let path = generate_tex_file("x^2", None, &template, dir.path()).unwrap();
            let first = log.take();
            assert!(first.contains("Writing \"x^2\""));
            assert!(first.contains(&path.display().to_string()));

            generate_tex_file("x^2", None, &template, dir.path()).unwrap();
            assert!(log.take().is_empty());
        });
    }
}
