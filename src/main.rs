//! sbom-manager: versioned SBOM store
//!
//! Ingests SPDX, `CycloneDX`, CSV and file-inventory documents into a
//! project-scoped database and queries or exports them.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use sbom_manager::{
    cli::{self, AddOptions},
    config::{AppConfig, OutputConfig, StoreConfig, Validatable},
    reports::{OutputFormat, DEFAULT_COLUMN_WIDTH},
    store::{ListScope, SbomStore},
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sbom-manager")]
#[command(author = "Binarly.io")]
#[command(version)]
#[command(about = "Versioned SBOM store for SPDX, CycloneDX, CSV and file inventories", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Create the store
    sbom-manager init

    # Add a document, detecting its format
    sbom-manager add firmware.spdx -p router -t auto

    # Search the latest version of every project
    sbom-manager find openssl

    # Export a project as SPDX tag-value
    sbom-manager generate -p router -O router.spdx")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file (default: auto-discover .sbom-manager.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store directory (overrides the config file)
    #[arg(long, global = true, env = "SBOM_MANAGER_STORE")]
    store: Option<PathBuf>,

    /// Output format for listings
    #[arg(short = 'o', long = "output", global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Write output to a file instead of stdout
    #[arg(short = 'O', long = "output-file", global = true)]
    output_file: Option<PathBuf>,

    /// Console column width
    #[arg(long, global = true)]
    width: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the store, discarding any existing content
    Init,

    /// Add an SBOM document as the next version of a project
    Add(AddArgs),

    /// Find stored components by product name
    Find(FindArgs),

    /// List stored documents and components
    List(ListArgs),

    /// Generate an SPDX tag-value document for a project
    Generate(GenerateArgs),

    /// Run the configured vulnerability scanner over stored documents
    Scan(ScanArgs),

    /// Copy the store database to a file
    ExportDb {
        /// Destination file
        file: PathBuf,
    },

    /// Replace the store database with a previously exported file
    ImportDb {
        /// Source file
        file: PathBuf,
    },

    /// Show the audit trail
    Log,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Show config file search paths
    Path,
    /// Create an example config file in the current directory
    Init,
    /// Print the JSON Schema of the config file
    Schema,
}

#[derive(Parser)]
struct AddArgs {
    /// SBOM document
    file: PathBuf,

    /// Document type: spdx, cyclonedx, csv, dir or auto
    #[arg(short = 't', long = "type", default_value = "auto")]
    sbom_type: String,

    /// Project name
    #[arg(short, long)]
    project: String,

    /// Free-text description
    #[arg(short, long)]
    description: Option<String>,
}

#[derive(Parser)]
struct FindArgs {
    /// Product name, or part of it
    module: String,

    /// Restrict to one project
    #[arg(short, long, default_value = "")]
    project: String,

    /// Include every stored version, not only the latest
    #[arg(long)]
    history: bool,
}

#[derive(Parser)]
struct ListArgs {
    /// What to list
    #[arg(value_enum, default_value_t = ListScope::All)]
    scope: ListScope,

    /// Restrict to one project
    #[arg(short, long, default_value = "")]
    project: String,

    /// Include every stored version, not only the latest
    #[arg(long)]
    history: bool,

    /// List exactly this file version
    #[arg(long = "version", value_name = "N")]
    file_version: Option<u32>,
}

#[derive(Parser)]
struct GenerateArgs {
    /// Project name
    #[arg(short, long)]
    project: String,
}

#[derive(Parser)]
struct ScanArgs {
    /// Project name
    #[arg(short, long)]
    project: String,

    /// Scan every stored document, not only the latest
    #[arg(long)]
    history: bool,
}

impl Cli {
    /// Configuration expressed by command-line flags alone.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            store: StoreConfig {
                location: self.store.clone(),
            },
            output: OutputConfig {
                format: self.format.unwrap_or_default(),
                file: self.output_file.clone(),
                width: self.width.unwrap_or(DEFAULT_COLUMN_WIDTH),
            },
            ..AppConfig::default()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let (config, loaded_from) =
        AppConfig::from_file_with_overrides(cli.config.as_deref(), &cli.overrides());
    if let Some(path) = &loaded_from {
        tracing::debug!("Loaded config from {}", path.display());
    }
    for error in config.validate() {
        tracing::warn!("Invalid configuration: {error}");
    }

    let store = SbomStore::new(config.store.resolved_location());

    // Dispatch to command handlers
    match cli.command {
        Commands::Init => cli::run_init(&store),

        Commands::Add(args) => {
            let options = AddOptions {
                file: args.file,
                sbom_type: args.sbom_type,
                project: args.project,
                description: args.description,
            };
            let version = cli::run_add(&store, &options)?;
            if !cli.quiet {
                eprintln!(
                    "Added {} to {} as version {version}",
                    options.file.display(),
                    options.project
                );
            }
            Ok(())
        }

        Commands::Find(args) => cli::run_find(
            &store,
            &args.module,
            &args.project,
            args.history,
            &config.output,
        ),

        Commands::List(args) => cli::run_list(
            &store,
            args.scope,
            &args.project,
            args.history,
            args.file_version,
            &config.output,
        ),

        Commands::Generate(args) => {
            cli::run_generate(&store, &args.project, config.output.file.clone())
        }

        Commands::Scan(args) => {
            let scanned = cli::run_scan(
                &store,
                &config.scanner,
                &args.project,
                args.history,
                &config.output,
            )?;
            tracing::debug!("Scanned {scanned} document(s)");
            Ok(())
        }

        Commands::ExportDb { file } => cli::run_export(&store, &file),

        Commands::ImportDb { file } => cli::run_import(&store, &file),

        Commands::Log => cli::run_log(&store, &config.output),

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "sbom-manager", &mut io::stdout());
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(())
            }
            ConfigAction::Path => {
                let search_paths: [Option<String>; 3] = [
                    std::env::current_dir()
                        .ok()
                        .map(|p| p.display().to_string()),
                    ::dirs::config_dir().map(|p| p.join("sbom-manager").display().to_string()),
                    ::dirs::home_dir().map(|p| p.display().to_string()),
                ];
                eprintln!("Config file search paths (in order):");
                for path in search_paths.into_iter().flatten() {
                    eprintln!("  {path}");
                }
                eprintln!();
                match sbom_manager::config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                eprintln!("Store location: {}", store.location().display());
                Ok(())
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".sbom-manager.yaml");
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                let content = sbom_manager::config::generate_example_config();
                std::fs::write(&target, content)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(())
            }
            ConfigAction::Schema => {
                let schema = sbom_manager::config::generate_json_schema()?;
                println!("{schema}");
                Ok(())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_defaults() {
        let cli = Cli::parse_from(["sbom-manager", "list"]);
        match cli.command {
            Commands::List(args) => {
                assert_eq!(args.scope, ListScope::All);
                assert!(args.project.is_empty());
                assert!(!args.history);
                assert_eq!(args.file_version, None);
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_global_output_overrides() {
        let cli = Cli::parse_from([
            "sbom-manager",
            "generate",
            "-p",
            "router",
            "-O",
            "router.spdx",
            "--store",
            "/tmp/store",
        ]);
        let overrides = cli.overrides();
        assert_eq!(overrides.output.file, Some(PathBuf::from("router.spdx")));
        assert_eq!(overrides.store.location, Some(PathBuf::from("/tmp/store")));
        assert_eq!(overrides.output.width, DEFAULT_COLUMN_WIDTH);
    }
}
