//! Reporting command-line interface

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use reporting::cli::{convert, evaluate, output, validate};
use reporting::serializer::WireFormat;
use std::path::PathBuf;

/// Reporting command-line tool
#[derive(Parser)]
#[command(name = "reporting")]
#[command(author, version, about = "Clinical reporting tools", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, table, pretty)
    #[arg(short = 'f', long, global = true)]
    format: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    color: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Most recent encounter per patient
    Evaluate {
        /// Encounter file (JSON array)
        encounters: PathBuf,

        /// Base cohort patient ids (default: every patient in the file)
        #[arg(short = 'c', long = "patient", value_delimiter = ',')]
        patients: Vec<i64>,

        /// Earliest encounter date, inclusive
        #[arg(long)]
        on_or_after: Option<NaiveDate>,

        /// Latest encounter date, inclusive
        #[arg(long)]
        on_or_before: Option<NaiveDate>,

        /// Context parameters (name=value)
        #[arg(short, long = "param")]
        params: Vec<String>,
    },

    /// Convert a definition between JSON and XML
    Convert {
        /// Definition file
        file: PathBuf,

        /// Target format (json, xml)
        #[arg(short, long)]
        to: Option<WireFormat>,

        /// Pretty-print output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Validate definition files
    Validate {
        /// Definition files to validate
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    output::setup_colors(&cli.color);

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_log_filter(cli.verbose)),
    )
    .init();

    let result = match cli.command {
        Commands::Evaluate {
            encounters,
            patients,
            on_or_after,
            on_or_before,
            params,
        } => {
            let config = evaluate::EvaluateConfig {
                encounters,
                patients,
                on_or_after,
                on_or_before,
                params,
                verbose: cli.verbose,
                output_format: cli.format.clone(),
                output_file: cli.output.clone(),
            };
            evaluate::evaluate(config).await
        }

        Commands::Convert { file, to, pretty } => {
            let config = convert::ConvertConfig {
                file,
                to,
                pretty,
                verbose: cli.verbose,
                output_file: cli.output.clone(),
            };
            convert::convert(config).await
        }

        Commands::Validate { files } => {
            let config = validate::ValidateConfig {
                files,
                verbose: cli.verbose,
            };
            validate::validate(config).await
        }
    };

    if let Err(e) = result {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

/// Log filter used when `RUST_LOG` is unset
fn default_log_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}
