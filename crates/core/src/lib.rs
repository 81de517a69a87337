//! # eeprom-version-core
//!
//! Build provenance for AVR firmware, kept in the last 60 bytes of EEPROM.
//!
//! A [`VersionRecord`] (project name, vendor code, project version, software
//! version, delivery date) is written once per device and read back across
//! power cycles and reflashes, so a board in the field can report what it is
//! running.
//!
//! ## Architecture
//!
//! - [`VersionRecord`] — The record, its setters, and its 54-byte layout
//! - [`FixedStr`] — Fixed-capacity, always-terminated text fields
//! - [`VersionStore`] — Address layout and the first-write-wins guard
//! - [`ByteStore`] — Storage capability; [`Eeprom`] is the in-memory image
//! - [`render`] — Record view and hex dump for diagnostics
//! - [`hex`] / [`image`] — Intel HEX and raw EEPROM image files
//! - [`config`] — Default record contents (figment: TOML + environment)
//!
//! ## Example
//!
//! ```
//! use eeprom_version_core::{Eeprom, VersionRecord, VersionStore, WriteOutcome};
//!
//! let mut store = VersionStore::new(Eeprom::default()).unwrap();
//! let mut record = VersionRecord::default();
//! record.set_project_name("Tank Plant").unwrap();
//!
//! assert_eq!(store.write(&record, false).unwrap(), WriteOutcome::Written);
//! assert_eq!(store.write(&record, false).unwrap(), WriteOutcome::Skipped);
//! assert_eq!(store.read().unwrap(), Some(record));
//! ```

pub mod config;
pub mod error;
pub mod hex;
pub mod image;
pub mod memory;
pub mod record;
pub mod render;
pub mod store;
pub mod text;

pub use config::BuildConfig;
pub use error::{Error, Result};
pub use memory::{ByteStore, Eeprom};
pub use record::{Presence, VersionRecord, RECORD_SIZE};
pub use store::{start_address, VersionStore, WriteOutcome};
pub use text::FixedStr;

/// EEPROM size: 1 KB (ATmega328P, ATmega32u4)
pub const EEPROM_SIZE: usize = 1024;
/// Bytes reserved for the version record at the end of the EEPROM
pub const RESERVED_BYTES: usize = 60;
/// Presence flag value marking a valid record
pub const MAGIC: u16 = 42;
/// Record layout revision written by this crate
pub const FORMAT_VERSION: u8 = 1;
