//! TexVector CLI - render TeX expressions to SVG
//!
//! Commands: render, hash, templates
//! Outputs JSON to stdout, logs to stderr
//! Returns non-zero when rendering fails

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use texvector_core::{
    RenderConfig, RenderPipeline, TemplateRegistry, TexError, ENGINE_VERSION,
    hashing::tex_hash,
};

#[derive(Parser)]
#[command(name = "texvector-cli")]
#[command(about = "TexVector CLI - TeX expression to SVG compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON render config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to a directory of JSON template definitions
    #[arg(short, long, default_value = "templates")]
    templates_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// List available templates
    Templates,

    /// Print the fingerprint an expression would be cached under
    Hash {
        expression: String,

        #[arg(short, long)]
        environment: Option<String>,

        /// Template ID (defaults to the configured template)
        #[arg(short, long)]
        template: Option<String>,
    },

    /// Render an expression to SVG
    Render {
        expression: String,

        /// Environment to wrap the expression in, e.g. align*
        #[arg(short, long)]
        environment: Option<String>,

        /// Template ID (defaults to the configured template)
        #[arg(short, long)]
        template: Option<String>,

        /// Override the working directory
        #[arg(long)]
        tex_dir: Option<PathBuf>,
    },
}

fn load_config(
    cli: &Cli,
    registry: &TemplateRegistry,
    template: Option<&str>,
) -> Result<RenderConfig, TexError> {
    let config = match &cli.config {
        Some(path) => RenderConfig::from_file(path)?,
        None => RenderConfig::default(),
    };
    match template {
        Some(id) => config.with_template_id(registry, id),
        None => Ok(config),
    }
}

fn fail(error: &TexError) -> ExitCode {
    let output = serde_json::json!({
        "success": false,
        "error": error.to_string(),
    });
    println!("{}", output);
    ExitCode::from(2)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let registry = match TemplateRegistry::load_from_dir(&cli.templates_dir) {
        Ok(r) => r,
        Err(e) => {
            eprintln!(r#"{{"error": "Failed to load templates: {}"}}"#, e);
            return ExitCode::FAILURE;
        }
    };

    match &cli.command {
        Commands::Templates => {
            let templates: Vec<_> = registry.list()
                .iter()
                .map(|t| serde_json::json!({
                    "id": t.id,
                    "description": t.description,
                    "compiler": t.tex_compiler,
                    "outputFormat": t.output_format,
                }))
                .collect();

            println!("{}", serde_json::Value::Array(templates));
            ExitCode::SUCCESS
        }

        Commands::Hash { expression, environment, template } => {
            let config = match load_config(&cli, &registry, template.as_deref()) {
                Ok(c) => c,
                Err(e) => return fail(&e),
            };
            let code = config.tex_template.render(expression, environment.as_deref());
            println!("{}", serde_json::json!({ "fingerprint": tex_hash(&code) }));
            ExitCode::SUCCESS
        }

        Commands::Render { expression, environment, template, tex_dir } => {
            let mut config = match load_config(&cli, &registry, template.as_deref()) {
                Ok(c) => c,
                Err(e) => return fail(&e),
            };
            if let Some(dir) = tex_dir {
                config.tex_dir = dir.clone();
            }

            let pipeline = RenderPipeline::new(config);
            match pipeline.render(expression, environment.as_deref(), None) {
                Ok(rendered) => {
                    let output = serde_json::json!({
                        "success": true,
                        "engineVersion": ENGINE_VERSION,
                        "rendered": rendered,
                    });
                    println!("{}", output);
                    ExitCode::SUCCESS
                }
                Err(e) => fail(&e),
            }
        }
    }
}
