//! scaffold-ai CLI
//!
//! Pick a prompt template in the terminal and generate code from it.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use scaffold_ai::catalog::{DEFAULT_TEMPLATES_DIR, DirectoryCatalog, TemplateSource};
use scaffold_ai::config::Config;
use scaffold_ai::gateway::{self, GenerationGateway, create_gateway};
use scaffold_ai::prompt::{FilePromptSource, PromptSource};
use scaffold_ai::report::{catalog_entries, format_catalog};
use scaffold_ai::tui::{self, App, Theme, TuiConfig};
use scaffold_ai::types::{GenerationOutcome, OutputFormat, Template};

#[derive(Parser)]
#[command(name = "scaffold-ai")]
#[command(about = "Generate code from prompt templates")]
#[command(version)]
struct Cli {
    /// Directory holding one sub-directory per template
    #[arg(long, global = true, default_value = DEFAULT_TEMPLATES_DIR)]
    templates: PathBuf,

    /// Config file (default: ./config.json, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend to use, overriding the config file
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Directory for daily log files
    #[arg(long, global = true, default_value = "logs")]
    log_dir: PathBuf,

    /// Disable colors in the TUI
    #[arg(long, global = true)]
    no_color: bool,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List templates and whether their prompt is usable (no network)
    List {
        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Generate once from a single template and print the result
    Generate {
        /// Template name (a directory under --templates)
        template: String,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(&cli.log_dir, cli.verbose) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    info!("application starting");

    let result = match &cli.command {
        None => cmd_tui(&cli).await,
        Some(Commands::List { format }) => cmd_list(&cli, (*format).into()),
        Some(Commands::Generate { template }) => cmd_generate(&cli, template).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "application error");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// LOGGING
// ============================================================================

/// Log to `<log_dir>/<YYYY-MM-DD>.log`, never to the terminal.
fn setup_logging(log_dir: &Path, verbose: bool) -> Result<(), String> {
    fs::create_dir_all(log_dir)
        .map_err(|e| format!("failed to create log directory {}: {}", log_dir.display(), e))?;

    let file_name = format!("{}.log", chrono::Local::now().format("%Y-%m-%d"));
    let log_path = log_dir.join(file_name);
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| format!("failed to open log file {}: {}", log_path.display(), e))?;

    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| format!("failed to initialize logging: {}", e))?;

    info!(path = %log_path.display(), verbose, "logging initialized");
    Ok(())
}

// ============================================================================
// STARTUP WIRING
// ============================================================================

fn load_templates(cli: &Cli) -> Result<Vec<Template>, String> {
    DirectoryCatalog::new(&cli.templates)
        .templates()
        .map_err(|e| e.to_string())
}

/// Load and validate config, then build the gateway it names.
fn load_gateway(cli: &Cli) -> Result<(Config, Arc<dyn GenerationGateway>), String> {
    let mut config = Config::load(cli.config.as_deref()).map_err(|e| e.to_string())?;
    if let Some(backend) = &cli.backend {
        config.backend = backend.clone();
    }
    config.validate().map_err(|e| e.to_string())?;

    info!(backend = %config.backend, model = %config.gemini.model_name, "config ready");

    let gateway = create_gateway(&config.backend, &config).map_err(|e| e.to_string())?;
    Ok((config, gateway))
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

async fn cmd_tui(cli: &Cli) -> Result<(), String> {
    let templates = load_templates(cli)?;
    let (config, gateway) = load_gateway(cli)?;

    let tui_config = TuiConfig {
        prompts: Box::new(FilePromptSource::new(&cli.templates)),
        gateway,
        timeout: config.timeout(),
        theme: if cli.no_color { Theme::plain() } else { Theme::colored() },
    };

    tui::run(App::new(templates), tui_config)
        .await
        .map_err(|e| format!("terminal error: {}", e))
}

fn cmd_list(cli: &Cli, format: OutputFormat) -> Result<(), String> {
    let templates = load_templates(cli)?;
    let prompts = FilePromptSource::new(&cli.templates);

    let entries = catalog_entries(&templates, &prompts);
    let out = format_catalog(&entries, format).map_err(|e| e.to_string())?;
    print!("{}", out);
    if format == OutputFormat::Json {
        println!();
    }
    Ok(())
}

async fn cmd_generate(cli: &Cli, name: &str) -> Result<(), String> {
    let templates = load_templates(cli)?;
    let template = templates
        .into_iter()
        .find(|t| t.name == name)
        .ok_or_else(|| format!("template not found: {}", name))?;

    let prompts = FilePromptSource::new(&cli.templates);
    let prompt = prompts.read_prompt(&template).map_err(|e| e.to_string())?;

    let (config, gateway) = load_gateway(cli)?;
    eprintln!("Generating from '{}' with {}...", template.name, gateway.name());

    match gateway::dispatch(gateway.as_ref(), &prompt, config.timeout()).await {
        GenerationOutcome::Text(text) => {
            println!("{}", text);
            Ok(())
        }
        GenerationOutcome::Failure(reason) => Err(format!("generation failed: {}", reason)),
    }
}
