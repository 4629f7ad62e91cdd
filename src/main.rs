//! Slipway CLI - trigger deploys and browse build logs
//!
//! Usage: slipway [--root <dir>] <COMMAND>
//!
//! Commands:
//!   deploy    Run the deploy pipeline for a project
//!   builds    List a project's build numbers, newest first
//!   show      Print one build record with its timestamp
//!   projects  List configured projects

use std::path::PathBuf;
use std::process::exit;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use slipway::{Deployer, SlipwayError};

/// Exit code for precondition errors (project/config/target problems)
const EXIT_PRECONDITION: i32 = 2;

/// Slipway - single-host deploy runner
#[derive(Parser, Debug)]
#[command(name = "slipway")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Projects root directory
    #[arg(long, default_value = "projects", global = true)]
    root: PathBuf,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the deploy pipeline for a project
    Deploy {
        /// Project name (directory under the projects root)
        project: String,
    },

    /// List a project's build numbers, newest first (at most 100)
    Builds {
        /// Project name
        project: String,
    },

    /// Print one build record with its timestamp
    Show {
        /// Project name
        project: String,

        /// Build number
        number: u64,
    },

    /// List configured projects
    Projects,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let deployer = Deployer::new(&cli.root);
    let result = match &cli.command {
        Commands::Deploy { project } => cmd_deploy(&deployer, project),
        Commands::Builds { project } => cmd_builds(&deployer, project),
        Commands::Show { project, number } => cmd_show(&deployer, project, *number),
        Commands::Projects => cmd_projects(&deployer),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        exit(EXIT_PRECONDITION);
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_deploy(deployer: &Deployer, project: &str) -> Result<(), SlipwayError> {
    let outcome = deployer.deploy(project)?;
    let record = deployer.archive(project)?.retrieve(outcome.build_number)?;

    println!("{}", record.transcript);
    if outcome.failed {
        println!("build #{} FAILURE", outcome.build_number);
        exit(1);
    }
    println!("build #{} SUCCESS", outcome.build_number);
    Ok(())
}

fn cmd_builds(deployer: &Deployer, project: &str) -> Result<(), SlipwayError> {
    let archive = deployer.archive(project)?;
    for number in archive.list()? {
        let record = archive.retrieve(number)?;
        println!("#{:>10} / {}", number, record.timestamp_display());
    }
    Ok(())
}

fn cmd_show(deployer: &Deployer, project: &str, number: u64) -> Result<(), SlipwayError> {
    let record = deployer.archive(project)?.retrieve(number)?;
    println!(
        "{} / Build #{} / {}",
        project,
        record.number,
        record.timestamp_display()
    );
    println!("{}", record.transcript);
    Ok(())
}

fn cmd_projects(deployer: &Deployer) -> Result<(), SlipwayError> {
    for name in slipway::list_projects(deployer.root())? {
        println!("{name}");
    }
    Ok(())
}
