mod api;
mod config;
mod error;
mod invoice;
mod pdf;
mod render;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use crate::api::ApiClient;
use crate::config::{config_dir, load_config, resolve_output_dir, Config, CONFIG_TEMPLATE};
use crate::error::{BillingError, Result};
use crate::pdf::{open_path, save_pdf};
use crate::render::TemplateResolver;

#[derive(Parser)]
#[command(name = "avbill")]
#[command(version, about = "Aviation billing invoice viewer", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.avbill or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Override the configured API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the config directory with a template config.toml
    Init,

    /// Fetch and render a single invoice
    Show {
        /// Invoice id
        id: u64,

        /// Template identifier (overrides the invoice's stored template)
        #[arg(short, long)]
        template: Option<String>,

        /// Print the raw invoice record as JSON instead of rendering
        #[arg(long)]
        json: bool,
    },

    /// Fetch and render a consolidated invoice
    Consolidated {
        /// Consolidated invoice id
        id: u64,

        /// Template identifier (overrides the invoice's stored template)
        #[arg(short, long)]
        template: Option<String>,

        /// Print the raw record as JSON instead of rendering
        #[arg(long)]
        json: bool,
    },

    /// Download the backend-generated PDF for an invoice
    Pdf {
        /// Invoice id
        id: u64,

        /// Download the consolidated invoice PDF instead
        #[arg(long)]
        consolidated: bool,

        /// Custom output file path (default: output_dir/invoice-<id>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open the downloaded PDF with the system default viewer
        #[arg(long)]
        open: bool,
    },

    /// List available render templates
    Templates,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Determine config directory
    let cfg_dir = match cli.config_dir.clone() {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Templates => cmd_templates(),
        Commands::Show { id, template, json } => {
            let config = load_effective_config(&cfg_dir, cli.base_url.as_deref())?;
            cmd_show(&config, id, template.as_deref(), json)
        }
        Commands::Consolidated { id, template, json } => {
            let config = load_effective_config(&cfg_dir, cli.base_url.as_deref())?;
            cmd_consolidated(&config, id, template.as_deref(), json)
        }
        Commands::Pdf {
            id,
            consolidated,
            output,
            open,
        } => {
            let config = load_effective_config(&cfg_dir, cli.base_url.as_deref())?;
            cmd_pdf(&cfg_dir, &config, id, consolidated, output, open)
        }
    }
}

/// Load config.toml, letting --base-url both override the configured URL
/// and stand in for a missing config file.
fn load_effective_config(cfg_dir: &Path, base_url: Option<&str>) -> Result<Config> {
    match base_url {
        Some(url) => match load_config(cfg_dir) {
            Ok(mut config) => {
                config.api.base_url = url.trim_end_matches('/').to_string();
                Ok(config)
            }
            Err(BillingError::ConfigNotFound(_)) => Ok(Config::with_base_url(url)),
            Err(e) => Err(e),
        },
        None => load_config(cfg_dir),
    }
}

/// Initialize config directory with a template config file
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(BillingError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("downloads"))?;
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;

    println!("Initialized avbill config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Point it at your billing backend:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!();
    println!("Then view an invoice:");
    println!("  avbill show <id>");

    Ok(())
}

// Table row struct for the templates listing
#[derive(Tabled)]
struct TemplateRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
}

/// List available render templates
fn cmd_templates() -> Result<()> {
    let rows: Vec<TemplateRow> = render::available()
        .iter()
        .map(|template| TemplateRow {
            id: template.id().to_string(),
            name: template.name().to_string(),
            description: template.description().to_string(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!();
    println!(
        "Default: {} (used when an invoice names no template or an unknown one)",
        render::DEFAULT_TEMPLATE_ID
    );

    Ok(())
}

/// Fetch and render a single invoice
fn cmd_show(config: &Config, id: u64, template_override: Option<&str>, json: bool) -> Result<()> {
    let client = ApiClient::new(&config.api.base_url, config.api.timeout_secs);
    let invoice = client.fetch_invoice(id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&invoice)?);
        return Ok(());
    }

    // View-level override beats the invoice's stored template identifier
    let mut resolver = TemplateResolver::new();
    let requested = template_override.or(invoice.template.as_deref());
    let template = resolver.resolve(requested);

    print!("{}", template.render(&invoice));

    Ok(())
}

/// Fetch and render a consolidated invoice
fn cmd_consolidated(
    config: &Config,
    id: u64,
    template_override: Option<&str>,
    json: bool,
) -> Result<()> {
    let client = ApiClient::new(&config.api.base_url, config.api.timeout_secs);
    let rollup = client.fetch_consolidated(id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rollup)?);
        return Ok(());
    }

    let mut resolver = TemplateResolver::new();
    let requested = template_override.or(rollup.template.as_deref());
    let template = resolver.resolve(requested);

    print!("{}", template.render_consolidated(&rollup));

    Ok(())
}

/// Download a backend-generated PDF
fn cmd_pdf(
    cfg_dir: &Path,
    config: &Config,
    id: u64,
    consolidated: bool,
    output: Option<PathBuf>,
    open: bool,
) -> Result<()> {
    let client = ApiClient::new(&config.api.base_url, config.api.timeout_secs);
    let bytes = if consolidated {
        client.download_consolidated_pdf(id)?
    } else {
        client.download_invoice_pdf(id)?
    };

    let pdf_path = match output {
        Some(path) => path,
        None => {
            let output_dir = resolve_output_dir(&config.pdf.output_dir, cfg_dir);
            let prefix = if consolidated { "consolidated" } else { "invoice" };
            output_dir.join(format!("{prefix}-{id}.pdf"))
        }
    };

    save_pdf(&bytes, &pdf_path)?;
    println!("Saved {}", pdf_path.display());

    if open {
        open_path(&pdf_path)?;
    }

    Ok(())
}
