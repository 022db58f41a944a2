mod commands;

use clap::{Parser, Subcommand};
use commands::{RunArgs, check_entries, run_automount};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bootmount")]
#[command(about = "Mount a root filesystem and an fstab, unmount them on shutdown")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse fstab entries and print their fields
    Check {
        /// Entries of the form source:path:driver[:flags[:options[:control-options]]]
        #[arg(required = true)]
        entries: Vec<String>,
    },
    /// Mount everything and hold the mounts until SIGINT or SIGTERM
    Run {
        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Host directory standing in for `/`
        #[arg(long)]
        root: PathBuf,

        /// Archive to use as the first initial ramdisk
        #[arg(long)]
        initrd: Option<PathBuf>,

        /// Additional fstab entry, appended after the configured ones
        #[arg(long = "fstab")]
        fstab: Vec<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { entries } => check_entries(&entries)?,
        Commands::Run {
            config,
            root,
            initrd,
            fstab,
        } => run_automount(RunArgs {
            config,
            root,
            initrd,
            fstab,
        })?,
    }

    Ok(())
}
