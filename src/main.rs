use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use postgen::db_url::ConnectionParams;
use postgen::pbxproj::{self, DEFAULT_DEPENDENCY, DEFAULT_PROJECT_PATH};

#[derive(Parser)]
#[command(name = "postgen")]
#[command(about = "Post-generation fixups for the display app project and deployment")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove a local folder reference from a generated project.pbxproj
    Strip {
        /// Path to the project descriptor
        #[arg(short, long, default_value = DEFAULT_PROJECT_PATH)]
        project: PathBuf,

        /// Name of the folder dependency to remove
        #[arg(short, long, default_value = DEFAULT_DEPENDENCY)]
        dependency: String,

        /// Report what would be removed without rewriting the file
        #[arg(long)]
        dry_run: bool,

        /// Print the report as JSON instead of the confirmation line
        #[arg(long)]
        json: bool,
    },
    /// Print the Cloud SQL connection string built from DB_USER, DB_PASS, DB_NAME and CONN
    DbUrl,
}

/// Initialize tracing on stderr; stdout carries command output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "postgen=warn".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_strip(project: PathBuf, dependency: &str, dry_run: bool, json: bool) -> anyhow::Result<()> {
    tracing::info!("Stripping ../{} from {}", dependency, project.display());

    let report = pbxproj::strip_project(&project, dependency, dry_run)?;

    if json {
        let out = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", out);
    } else {
        println!("{}", report.confirmation());
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Strip {
            project,
            dependency,
            dry_run,
            json,
        }) => run_strip(project, &dependency, dry_run, json)?,
        Some(Commands::DbUrl) => {
            let url = ConnectionParams::from_env().to_url();
            // No trailing newline
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(url.as_bytes())?;
            stdout.flush()?;
        }
        None => {
            // Default: strip the fixed dependency from the fixed project
            run_strip(
                PathBuf::from(DEFAULT_PROJECT_PATH),
                DEFAULT_DEPENDENCY,
                false,
                false,
            )?;
        }
    }

    Ok(())
}
