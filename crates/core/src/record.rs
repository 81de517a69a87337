//! The version record and its persisted layout.
//!
//! ## Wire layout
//!
//! ```text
//! +---------------------+  offset
//! | Presence flag       |   0  u16 little-endian, MAGIC when valid
//! +---------------------+
//! | Format version      |   2  u8
//! +---------------------+
//! | Project name        |   3  21 bytes, NUL-terminated
//! +---------------------+
//! | Vendor              |  24  2 bytes, NUL-terminated
//! +---------------------+
//! | Project version     |  26  u8
//! +---------------------+
//! | Software version    |  27  8 bytes, NUL-terminated
//! +---------------------+
//! | Final software date |  35  19 bytes, NUL-terminated
//! +---------------------+  54
//! ```
//!
//! Encoding goes through bincode's fixed-int little-endian format, which lays
//! the fields out back to back with no length prefixes for the fixed arrays.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{
    BuildConfig, DEFAULT_PROJECT_NAME, DEFAULT_PROJECT_VERSION, DEFAULT_SOFTWARE_DATE,
    DEFAULT_SOFTWARE_VERSION, DEFAULT_VENDOR,
};
use crate::error::{Error, Result};
use crate::text::FixedStr;
use crate::{FORMAT_VERSION, MAGIC, RESERVED_BYTES};

/// Project name, e.g. "Tank Plant". Official name, not the SKU.
pub type ProjectName = FixedStr<20>;
/// Single-letter vendor code.
pub type VendorCode = FixedStr<1>;
/// Free-form software version, e.g. "1.0.0.0".
pub type SoftwareVersion = FixedStr<7>;
/// Delivery date with the month spelled out, e.g. "September 23, 2024".
pub type SoftwareDate = FixedStr<18>;

/// Serialized size of a [`VersionRecord`] in bytes.
pub const RECORD_SIZE: usize = 2
    + 1
    + ProjectName::FIELD_WIDTH
    + VendorCode::FIELD_WIDTH
    + 1
    + SoftwareVersion::FIELD_WIDTH
    + SoftwareDate::FIELD_WIDTH;

const _: () = assert!(
    RECORD_SIZE <= RESERVED_BYTES,
    "version record exceeds the reserved EEPROM region"
);

/// Tagged result of a presence-guarded accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence<T> {
    /// The record is valid and holds this value.
    Present(T),
    /// The presence flag does not match; the record holds no valid data.
    Absent,
}

impl<T> Presence<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Presence::Present(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Presence::Present(v) => Some(v),
            Presence::Absent => None,
        }
    }
}

impl<T> From<Presence<T>> for Option<T> {
    fn from(p: Presence<T>) -> Self {
        p.into_option()
    }
}

/// Build and version metadata persisted in the EEPROM tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionRecord {
    presence: u16,
    format_version: u8,
    project_name: ProjectName,
    vendor: VendorCode,
    project_version: u8,
    software_version: SoftwareVersion,
    final_software_date: SoftwareDate,
}

/// Exact on-device image of a record.
#[derive(Serialize, Deserialize)]
struct WireRecord {
    presence: u16,
    format_version: u8,
    project_name: [u8; 21],
    vendor: [u8; 2],
    project_version: u8,
    software_version: [u8; 8],
    final_software_date: [u8; 19],
}

impl VersionRecord {
    /// Record built from the default configuration, checked at compile time.
    pub const DEFAULT: VersionRecord = VersionRecord {
        presence: MAGIC,
        format_version: FORMAT_VERSION,
        project_name: FixedStr::literal(DEFAULT_PROJECT_NAME),
        vendor: FixedStr::literal(DEFAULT_VENDOR),
        project_version: DEFAULT_PROJECT_VERSION,
        software_version: FixedStr::literal(DEFAULT_SOFTWARE_VERSION),
        final_software_date: FixedStr::literal(DEFAULT_SOFTWARE_DATE),
    };

    /// A record with no valid data, e.g. as the target of a read.
    pub const fn absent() -> Self {
        VersionRecord {
            presence: 0,
            format_version: 0,
            project_name: FixedStr::empty(),
            vendor: FixedStr::empty(),
            project_version: 0,
            software_version: FixedStr::empty(),
            final_software_date: FixedStr::empty(),
        }
    }

    /// Record built from `config`.
    ///
    /// Text that does not fit its field is truncated and terminated; each
    /// truncation is logged. Use [`BuildConfig::validate`] beforehand to
    /// reject such input instead.
    pub fn from_config(config: &BuildConfig) -> Self {
        VersionRecord {
            presence: MAGIC,
            format_version: FORMAT_VERSION,
            project_name: truncated("project_name", &config.project_name),
            vendor: truncated("vendor", &config.vendor),
            project_version: config.project_version,
            software_version: truncated("software_version", &config.software_version),
            final_software_date: truncated("software_date", &config.software_date),
        }
    }

    // --- Accessors ---

    /// Raw presence flag.
    pub fn presence_flag(&self) -> u16 {
        self.presence
    }

    /// True iff the presence flag equals [`MAGIC`].
    pub fn is_present(&self) -> bool {
        self.presence == MAGIC
    }

    /// Layout revision that wrote this record, if the record is valid.
    pub fn format_version(&self) -> Presence<u8> {
        if self.is_present() {
            Presence::Present(self.format_version)
        } else {
            Presence::Absent
        }
    }

    pub fn project_name(&self) -> &ProjectName {
        &self.project_name
    }

    pub fn vendor(&self) -> &VendorCode {
        &self.vendor
    }

    pub fn project_version(&self) -> u8 {
        self.project_version
    }

    pub fn software_version(&self) -> &SoftwareVersion {
        &self.software_version
    }

    pub fn final_software_date(&self) -> &SoftwareDate {
        &self.final_software_date
    }

    // --- Setters ---

    /// Set the project name (at most 20 bytes).
    pub fn set_project_name(&mut self, name: &str) -> Result<()> {
        self.project_name = checked("project name", name)?;
        Ok(())
    }

    /// Set the vendor code (at most 1 byte).
    pub fn set_vendor(&mut self, vendor: &str) -> Result<()> {
        self.vendor = checked("vendor", vendor)?;
        Ok(())
    }

    /// Set the software version (at most 7 bytes).
    pub fn set_software_version(&mut self, version: &str) -> Result<()> {
        self.software_version = checked("software version", version)?;
        Ok(())
    }

    /// Set the final software date (at most 18 bytes).
    pub fn set_final_software_date(&mut self, date: &str) -> Result<()> {
        self.final_software_date = checked("final software date", date)?;
        Ok(())
    }

    /// Set the project version: 1 for v1, 2 for v2, 3 for a reorder, and so on.
    ///
    /// Should be greater than zero; not enforced.
    pub fn set_project_version(&mut self, version: u8) {
        self.project_version = version;
    }

    // --- Encoding ---

    /// Serialize to the [`RECORD_SIZE`]-byte persisted layout.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let wire = WireRecord {
            presence: self.presence,
            format_version: self.format_version,
            project_name: self.project_name.to_field(),
            vendor: self.vendor.to_field(),
            project_version: self.project_version,
            software_version: self.software_version.to_field(),
            final_software_date: self.final_software_date.to_field(),
        };
        Ok(bincode::serialize(&wire)?)
    }

    /// Deserialize from the persisted layout. Trailing bytes are ignored.
    ///
    /// Text fields are decoded up to their terminator; a missing terminator
    /// is supplied, so the result is always terminator-safe.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let wire: WireRecord = bincode::deserialize(bytes)?;
        Ok(VersionRecord {
            presence: wire.presence,
            format_version: wire.format_version,
            project_name: FixedStr::from_field(&wire.project_name),
            vendor: FixedStr::from_field(&wire.vendor),
            project_version: wire.project_version,
            software_version: FixedStr::from_field(&wire.software_version),
            final_software_date: FixedStr::from_field(&wire.final_software_date),
        })
    }
}

impl Default for VersionRecord {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn checked<const N: usize>(field: &'static str, s: &str) -> Result<FixedStr<N>> {
    FixedStr::checked(s).ok_or(Error::OversizedField {
        field,
        capacity: N,
        len: s.len(),
    })
}

fn truncated<const N: usize>(field: &'static str, s: &str) -> FixedStr<N> {
    let text = FixedStr::truncating(s);
    if text.len() < s.len() {
        warn!(field, capacity = N, len = s.len(), "truncating configured text");
    }
    text
}
