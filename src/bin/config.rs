//! Form Config CLI
//!
//! View and manage form registry configuration.

use clap::{Parser, Subcommand};
use familiar_forms::FormConfig;

#[derive(Parser)]
#[command(name = "form-config")]
#[command(about = "View and manage form registry configuration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current configuration
    Show {
        /// Config file to load (optional)
        #[arg(short, long)]
        config: Option<String>,

        /// Output as TOML
        #[arg(long)]
        toml: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Initialize a new config file
    Init {
        /// Output path (default: forms.toml)
        #[arg(short, long, default_value = "forms.toml")]
        output: String,

        /// Enable validation on change in the generated file
        #[arg(long)]
        validate_on_change: bool,
    },

    /// Validate configuration
    Validate {
        /// Config file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Show { config, toml, json } => {
            let cfg = FormConfig::load_from(config.as_deref())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&cfg)?);
            } else if toml {
                println!("{}", ::toml::to_string_pretty(&cfg)?);
            } else {
                println!("📋 Form Registry Configuration\n");
                println!("Form:");
                println!("  Validate on change: {}", cfg.form.validate_on_change);
                println!("  Default field type: {}", cfg.form.default_field_type);
                println!("  Array separator: {:?}", cfg.form.array_separator);

                println!("\nDiagnostics:");
                println!("  Warn on stale references: {}", cfg.diagnostics.warn_stale_references);
            }
        }

        Commands::Init { output, validate_on_change } => {
            let mut cfg = FormConfig::default();
            cfg.form.validate_on_change = validate_on_change;
            cfg.save(&output)?;
            println!("✅ Created config file: {}", output);
        }

        Commands::Validate { config } => match FormConfig::load_from(config.as_deref()) {
            Ok(cfg) => {
                if cfg.form.default_field_type.trim().is_empty() {
                    eprintln!("❌ Configuration error: form.default_field_type is empty");
                    std::process::exit(1);
                }
                println!("✅ Configuration is valid");
                println!("   Validate on change: {}", cfg.form.validate_on_change);
                println!("   Default field type: {}", cfg.form.default_field_type);
            }
            Err(e) => {
                eprintln!("❌ Configuration error: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
