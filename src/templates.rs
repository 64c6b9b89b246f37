//! Template System - turns an expression into a compilable document

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::TexError;

pub type TemplateId = String;

pub const DEFAULT_TEMPLATE_ID: &str = "default";
pub const CTEX_TEMPLATE_ID: &str = "ctex";

const DEFAULT_DOCUMENTCLASS: &str = r"\documentclass[preview]{standalone}";
const DEFAULT_PLACEHOLDER: &str = "YourTextHere";

const DEFAULT_PREAMBLE: &str = r"\usepackage[english]{babel}
\usepackage[utf8]{inputenc}
\usepackage[T1]{fontenc}
\usepackage{lmodern}
\usepackage{amsmath}
\usepackage{amssymb}
\usepackage{dsfont}
\usepackage{setspace}
\usepackage{tipa}
\usepackage{relsize}
\usepackage{textcomp}
\usepackage{mathrsfs}
\usepackage{calligra}
\usepackage{wasysym}
\usepackage{ragged2e}
\usepackage{physics}
\usepackage{xcolor}
\usepackage{microtype}
\DisableLigatures{encoding = *, family = * }
\linespread{1}";

const CTEX_PREAMBLE: &str = r"\usepackage[UTF8]{ctex}
\usepackage{amsmath}
\usepackage{amssymb}
\usepackage{xcolor}
\linespread{1}";

/// A document template. Its rendered text is what gets fingerprinted, so any
/// change here changes every artifact path derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TexTemplate {
    pub id: TemplateId,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_compiler")]
    pub tex_compiler: String,
    /// Extension of the compiler's output, with leading dot (`.dvi`, `.xdv`, `.pdf`).
    #[serde(default = "default_output_format")]
    pub output_format: String,
    #[serde(default = "default_documentclass")]
    pub documentclass: String,
    #[serde(default = "default_preamble")]
    pub preamble: String,
    #[serde(default = "default_placeholder")]
    pub placeholder_text: String,
    #[serde(default)]
    pub post_doc_commands: String,
    /// Full document text. When set it replaces the assembled body.
    #[serde(default)]
    pub body: Option<String>,
}

fn default_compiler() -> String { "latex".to_string() }
fn default_output_format() -> String { ".dvi".to_string() }
fn default_documentclass() -> String { DEFAULT_DOCUMENTCLASS.to_string() }
fn default_preamble() -> String { DEFAULT_PREAMBLE.to_string() }
fn default_placeholder() -> String { DEFAULT_PLACEHOLDER.to_string() }

impl Default for TexTemplate {
    fn default() -> Self {
        Self {
            id: DEFAULT_TEMPLATE_ID.to_string(),
            description: "Standalone preview document compiled with latex to DVI".to_string(),
            tex_compiler: default_compiler(),
            output_format: default_output_format(),
            documentclass: default_documentclass(),
            preamble: default_preamble(),
            placeholder_text: default_placeholder(),
            post_doc_commands: String::new(),
            body: None,
        }
    }
}

impl TexTemplate {
    /// Template for CJK text, compiled with xelatex to XDV.
    pub fn ctex() -> Self {
        Self {
            id: CTEX_TEMPLATE_ID.to_string(),
            description: "ctex document compiled with xelatex to XDV".to_string(),
            tex_compiler: "xelatex".to_string(),
            output_format: ".xdv".to_string(),
            preamble: CTEX_PREAMBLE.to_string(),
            ..Self::default()
        }
    }

    /// Build a template whose whole body comes from a `.tex` file.
    ///
    /// The file must contain `placeholder_text` where the expression goes.
    pub fn from_tex_file(
        id: impl Into<TemplateId>,
        path: &Path,
        tex_compiler: impl Into<String>,
        output_format: impl Into<String>,
    ) -> Result<Self, TexError> {
        let body = fs::read_to_string(path)?;
        let template = Self {
            id: id.into(),
            description: format!("Loaded from {}", path.display()),
            tex_compiler: tex_compiler.into(),
            output_format: output_format.into(),
            body: Some(body),
            ..Self::default()
        };
        if !template.body().contains(&template.placeholder_text) {
            return Err(TexError::Config(format!(
                "template file {} does not contain placeholder {}",
                path.display(),
                template.placeholder_text
            )));
        }
        Ok(template)
    }

    /// The full document with the placeholder still in place.
    pub fn body(&self) -> String {
        if let Some(body) = &self.body {
            return body.clone();
        }
        format!(
            "{}\n{}\n\\begin{{document}}\n{}\n{}\n\n\\end{{document}}\n",
            self.documentclass, self.preamble, self.post_doc_commands, self.placeholder_text
        )
    }

    pub fn get_texcode_for_expression(&self, expression: &str) -> String {
        self.body().replace(&self.placeholder_text, expression)
    }

    pub fn get_texcode_for_expression_in_env(&self, expression: &str, environment: &str) -> String {
        let wrapped = format!(
            "\\begin{{{env}}}\n{expression}\n\\end{{{env}}}",
            env = environment
        );
        self.body().replace(&self.placeholder_text, &wrapped)
    }

    /// Document text for `expression`, wrapped in `environment` when one is given.
    pub fn render(&self, expression: &str, environment: Option<&str>) -> String {
        match environment {
            Some(env) => self.get_texcode_for_expression_in_env(expression, env),
            None => self.get_texcode_for_expression(expression),
        }
    }

    pub fn add_to_preamble(&mut self, txt: &str, prepend: bool) {
        self.preamble = if prepend {
            format!("{}\n{}", txt, self.preamble)
        } else {
            format!("{}\n{}", self.preamble, txt)
        };
    }

    pub fn add_to_document(&mut self, txt: &str) {
        self.post_doc_commands.push_str(txt);
    }
}

/// Template registry - loads and caches templates
pub struct TemplateRegistry {
    templates: HashMap<TemplateId, TexTemplate>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self { templates: HashMap::new() }
    }

    /// Registry holding the built-in `default` and `ctex` templates.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(TexTemplate::default());
        registry.register(TexTemplate::ctex());
        registry
    }

    /// Built-ins plus every `*.json` template definition in `dir`.
    ///
    /// Files that fail to parse are skipped with a warning.
    pub fn load_from_dir(dir: &Path) -> Result<Self, std::io::Error> {
        let mut registry = Self::builtin();
        if dir.exists() {
            for entry in fs::read_dir(dir)? {
                let entry = entry?;
                let path = entry.path();
                if path.extension().map_or(false, |e| e == "json") {
                    let parsed = fs::read_to_string(&path)
                        .map_err(TexError::from)
                        .and_then(|content| Ok(serde_json::from_str::<TexTemplate>(&content)?));
                    match parsed {
                        Ok(template) => registry.register(template),
                        Err(e) => tracing::warn!("skipping template {}: {}", path.display(), e),
                    }
                }
            }
        }
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<&TexTemplate> {
        self.templates.get(id)
    }

    pub fn list(&self) -> Vec<&TexTemplate> {
        let mut templates: Vec<_> = self.templates.values().collect();
        templates.sort_by(|a, b| a.id.cmp(&b.id));
        templates
    }

    pub fn register(&mut self, template: TexTemplate) {
        self.templates.insert(template.id.clone(), template);
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
