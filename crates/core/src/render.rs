//! Diagnostic text output.
//!
//! - **Record view**: one labelled line per field, or a single
//!   "does not exist" line for an absent record
//! - **Format version**: the layout revision line
//! - **Region viewer**: hex + ASCII dump of raw EEPROM bytes
//!
//! All of it goes to any [`fmt::Write`] sink; nothing here prints.

use std::fmt::{self, Write};

use crate::record::{Presence, VersionRecord};

pub const PROJECT_NAME_LABEL: &str = "Project Name: ";
pub const VENDOR_LABEL: &str = "Vendor: ";
pub const PROJECT_VERSION_LABEL: &str = "Project Version: ";
pub const SOFTWARE_VERSION_LABEL: &str = "Software Version: ";
pub const SOFTWARE_DATE_LABEL: &str = "Software Date: ";
pub const FORMAT_VERSION_LABEL: &str = "Format Version: ";
/// The only line written for an absent record.
pub const ABSENT_LINE: &str = "Version data does not exist.";

/// Write the record's fields, one per line.
pub fn render_record<W: Write>(record: &VersionRecord, sink: &mut W) -> fmt::Result {
    if !record.is_present() {
        return writeln!(sink, "{}", ABSENT_LINE);
    }
    writeln!(sink, "{}{}", PROJECT_NAME_LABEL, record.project_name())?;
    writeln!(sink, "{}{}", VENDOR_LABEL, record.vendor())?;
    writeln!(sink, "{}{}", PROJECT_VERSION_LABEL, record.project_version())?;
    writeln!(sink, "{}{}", SOFTWARE_VERSION_LABEL, record.software_version())?;
    writeln!(sink, "{}{}", SOFTWARE_DATE_LABEL, record.final_software_date())
}

/// Write the format version line, or the absent line.
pub fn render_format_version<W: Write>(record: &VersionRecord, sink: &mut W) -> fmt::Result {
    match record.format_version() {
        Presence::Present(v) => writeln!(sink, "{}{}", FORMAT_VERSION_LABEL, v),
        Presence::Absent => writeln!(sink, "{}", ABSENT_LINE),
    }
}

/// Format a hex + ASCII dump of `data`, labelled from address `base`.
///
/// Outputs 16 bytes per line with address, hex values, and ASCII printable chars.
pub fn dump_region(data: &[u8], base: usize) -> String {
    let mut s = String::new();
    for (row, line) in data.chunks(16).enumerate() {
        let _ = write!(s, "{:04X}: ", base + row * 16);
        for i in 0..16 {
            match line.get(i) {
                Some(b) => {
                    let _ = write!(s, "{:02X} ", b);
                }
                None => s.push_str("   "),
            }
            if i == 7 {
                s.push(' ');
            }
        }
        s.push(' ');
        for &c in line {
            s.push(if (0x20..0x7F).contains(&c) { c as char } else { '.' });
        }
        s.push('\n');
    }
    s
}

impl fmt::Display for VersionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_record(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_present() {
        let mut rec = VersionRecord::default();
        rec.set_project_name("Tank Plant").unwrap();
        rec.set_vendor("N").unwrap();
        rec.set_project_version(2);
        rec.set_software_version("3.1.1").unwrap();
        rec.set_final_software_date("April 3, 2025").unwrap();

        let mut out = String::new();
        render_record(&rec, &mut out).unwrap();
        assert_eq!(
            out,
            "Project Name: Tank Plant\n\
             Vendor: N\n\
             Project Version: 2\n\
             Software Version: 3.1.1\n\
             Software Date: April 3, 2025\n"
        );
        assert_eq!(rec.to_string(), out);
    }

    #[test]
    fn test_render_absent_is_single_line() {
        let mut out = String::new();
        render_record(&VersionRecord::absent(), &mut out).unwrap();
        assert_eq!(out, "Version data does not exist.\n");
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_render_format_version() {
        let mut out = String::new();
        render_format_version(&VersionRecord::default(), &mut out).unwrap();
        assert_eq!(out, "Format Version: 1\n");

        out.clear();
        render_format_version(&VersionRecord::absent(), &mut out).unwrap();
        assert_eq!(out, format!("{}\n", ABSENT_LINE));
    }

    #[test]
    fn test_dump_region() {
        let mut data = vec![0xFFu8; 20];
        data[0] = 0x41; // 'A'
        data[1] = 0x42; // 'B'
        let dump = dump_region(&data, 0x3C4);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("03C4: 41 42 FF"));
        assert!(lines[0].ends_with("AB.............."));
        assert!(lines[1].starts_with("03D4: FF FF FF FF"));
    }
}
