//! `eepver` - host-side tool for EEPROM version records.
//!
//! - `show`: read and print the record, like the on-device data dumper
//! - `write`: build a record from configuration plus overrides and store it,
//!   honouring the first-write-wins guard unless `--overwrite` is given
//! - `dump`: hex view of the reserved region
//! - `config`: print the effective build configuration

#![deny(unsafe_code)]

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;

use eeprom_version_core::{image, render, BuildConfig, VersionRecord, VersionStore, WriteOutcome};

use cli::{Cli, Command, ConfigCommand, ImageArgs, ShowCommand, WriteCommand};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbosity());

    match cli.command {
        Command::Show(cmd) => handle_show(&cmd),
        Command::Write(cmd) => {
            let config = BuildConfig::load_from(cli.config).context("loading configuration")?;
            handle_write(&config, &cmd)
        }
        Command::Dump(args) => handle_dump(&args),
        Command::Config(cmd) => {
            let config = BuildConfig::load_from(cli.config).context("loading configuration")?;
            handle_config(&config, &cmd)
        }
    }
}

fn open_store(args: &ImageArgs) -> Result<VersionStore<eeprom_version_core::Eeprom>> {
    let eeprom = image::load_image(&args.image, args.capacity)
        .with_context(|| format!("opening {}", args.image.display()))?;
    Ok(VersionStore::new(eeprom)?)
}

fn handle_show(cmd: &ShowCommand) -> Result<()> {
    let store = open_store(&cmd.image)?;
    let record = store.read()?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    let record = record.unwrap_or_else(VersionRecord::absent);
    let mut out = String::new();
    render::render_record(&record, &mut out)?;
    if record.is_present() {
        render::render_format_version(&record, &mut out)?;
    }
    print!("{out}");
    Ok(())
}

fn handle_write(config: &BuildConfig, cmd: &WriteCommand) -> Result<()> {
    let mut record = VersionRecord::from_config(config);
    if let Some(name) = &cmd.project_name {
        record.set_project_name(name)?;
    }
    if let Some(vendor) = &cmd.vendor {
        record.set_vendor(vendor)?;
    }
    if let Some(version) = cmd.project_version {
        record.set_project_version(version);
    }
    if let Some(version) = &cmd.software_version {
        record.set_software_version(version)?;
    }
    if let Some(date) = &cmd.date {
        record.set_final_software_date(date)?;
    }

    let path = &cmd.image.image;
    let is_new = !path.exists();
    let eeprom = image::open_or_erased(path, cmd.image.capacity)
        .with_context(|| format!("opening {}", path.display()))?;
    let mut store = VersionStore::new(eeprom)?;
    let outcome = store.write(&record, cmd.overwrite)?;

    let eeprom = store.into_inner();
    if is_new || eeprom.is_dirty() {
        image::save_image(&eeprom, path).with_context(|| format!("saving {}", path.display()))?;
    }

    match outcome {
        WriteOutcome::Written => println!("written"),
        WriteOutcome::Skipped => println!("skipped (record present; use --overwrite)"),
    }
    Ok(())
}

fn handle_dump(args: &ImageArgs) -> Result<()> {
    let store = open_store(args)?;
    let start = store.start_address();
    let region = store.reserved_region();
    println!("Reserved region @ 0x{:04X} ({} bytes)", start, region.len());
    print!("{}", render::dump_region(&region, start));
    Ok(())
}

fn handle_config(config: &BuildConfig, cmd: &ConfigCommand) -> Result<()> {
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        println!("Project name:     {}", config.project_name);
        println!("Vendor:           {}", config.vendor);
        println!("Project version:  {}", config.project_version);
        println!("Software version: {}", config.software_version);
        println!("Software date:    {}", config.software_date);
    }
    Ok(())
}
