//! Command-line definitions for `eepver`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use eeprom_version_core::EEPROM_SIZE;

use crate::logging::Verbosity;

/// eepver - Build provenance in the tail of an AVR EEPROM
///
/// Works on EEPROM image files: Intel HEX (`.eep`, `.hex`) as read and
/// written by avrdude, or raw binary dumps.
#[derive(Debug, Parser)]
#[command(name = "eepver")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a configuration file (default: ./eepver.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the version record stored in an image
    Show(ShowCommand),

    /// Write a version record into an image
    Write(WriteCommand),

    /// Hex dump of the reserved region
    Dump(ImageArgs),

    /// Print the effective build configuration
    Config(ConfigCommand),
}

/// Image file selection shared by all image commands.
#[derive(Debug, Args)]
pub struct ImageArgs {
    /// EEPROM image file
    pub image: PathBuf,

    /// EEPROM size in bytes
    #[arg(long, default_value_t = EEPROM_SIZE)]
    pub capacity: usize,
}

/// `show` arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    #[command(flatten)]
    pub image: ImageArgs,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// `write` arguments. Field options override the configuration.
#[derive(Debug, Args)]
pub struct WriteCommand {
    #[command(flatten)]
    pub image: ImageArgs,

    /// Replace a record that is already present
    #[arg(long)]
    pub overwrite: bool,

    /// Project name (at most 20 bytes)
    #[arg(long)]
    pub project_name: Option<String>,

    /// Vendor code (1 byte)
    #[arg(long)]
    pub vendor: Option<String>,

    /// Project version
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..))]
    pub project_version: Option<u8>,

    /// Software version (at most 7 bytes)
    #[arg(long)]
    pub software_version: Option<String>,

    /// Final software date, month spelled out (at most 18 bytes)
    #[arg(long)]
    pub date: Option<String>,
}

/// `config` arguments.
#[derive(Debug, Args)]
pub struct ConfigCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}
