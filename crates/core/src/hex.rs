//! Intel HEX EEPROM images.
//!
//! `avr-objcopy -j .eeprom -O ihex` produces `.eep` files in this format and
//! avrdude reads them back. Parsing handles record types 00 (data), 01 (EOF),
//! 02 (extended segment address) and 04 (extended linear address); 03 and 05
//! (start addresses) are accepted and ignored. Writing emits 16-byte data
//! records followed by an EOF record, which is all a 1 KB EEPROM needs.

use std::fmt::Write as _;

use crate::error::{Error, Result};

/// Data bytes per record when writing.
const BYTES_PER_RECORD: usize = 16;

/// Parse an Intel HEX string into `eeprom`.
///
/// Data outside `eeprom` is dropped. Returns the highest address written
/// plus one.
pub fn parse_hex(hex: &str, eeprom: &mut [u8]) -> Result<usize> {
    let mut max_addr = 0usize;
    let mut base_addr: u32 = 0;

    for (idx, line) in hex.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some(body) = line.strip_prefix(':') else {
            continue; // skip non-hex lines
        };

        let bytes = hex_line_to_bytes(body).map_err(|m| Error::hex_parse(line_no, m))?;
        if bytes.len() < 5 {
            return Err(Error::hex_parse(line_no, "line too short"));
        }

        let byte_count = bytes[0] as usize;
        if bytes.len() != byte_count + 5 {
            return Err(Error::hex_parse(
                line_no,
                format!("byte count {} does not match line length", byte_count),
            ));
        }
        let addr = u16::from_be_bytes([bytes[1], bytes[2]]);
        let record_type = bytes[3];
        let data = &bytes[4..4 + byte_count];

        let sum: u8 = bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
        if sum != 0 {
            return Err(Error::hex_parse(line_no, format!("checksum error: sum={}", sum)));
        }

        match record_type {
            0x00 => {
                let full_addr = base_addr as usize + addr as usize;
                for (i, &b) in data.iter().enumerate() {
                    let target = full_addr + i;
                    if let Some(cell) = eeprom.get_mut(target) {
                        *cell = b;
                        max_addr = max_addr.max(target + 1);
                    }
                }
            }
            0x01 => break,
            0x02 if byte_count >= 2 => {
                base_addr = (u16::from_be_bytes([data[0], data[1]]) as u32) << 4;
            }
            0x04 if byte_count >= 2 => {
                base_addr = (u16::from_be_bytes([data[0], data[1]]) as u32) << 16;
            }
            0x02..=0x05 => {}
            other => {
                return Err(Error::hex_parse(
                    line_no,
                    format!("unknown record type 0x{:02X}", other),
                ));
            }
        }
    }

    Ok(max_addr)
}

/// Format `eeprom` as Intel HEX, addressed from 0.
///
/// Images above 64 KB get extended linear address records.
pub fn write_hex(eeprom: &[u8]) -> String {
    let mut out = String::with_capacity(eeprom.len() / BYTES_PER_RECORD * 44 + 12);
    let mut upper: u32 = 0;

    for (i, chunk) in eeprom.chunks(BYTES_PER_RECORD).enumerate() {
        let addr = (i * BYTES_PER_RECORD) as u32;
        if addr >> 16 != upper {
            upper = addr >> 16;
            push_record(&mut out, 0, 0x04, &(upper as u16).to_be_bytes());
        }
        push_record(&mut out, addr as u16, 0x00, chunk);
    }
    push_record(&mut out, 0, 0x01, &[]);
    out
}

fn push_record(out: &mut String, addr: u16, record_type: u8, data: &[u8]) {
    let [hi, lo] = addr.to_be_bytes();
    let mut sum = (data.len() as u8)
        .wrapping_add(hi)
        .wrapping_add(lo)
        .wrapping_add(record_type);
    // Writing to a String cannot fail.
    let _ = write!(out, ":{:02X}{:04X}{:02X}", data.len(), addr, record_type);
    for &b in data {
        sum = sum.wrapping_add(b);
        let _ = write!(out, "{:02X}", b);
    }
    let _ = writeln!(out, "{:02X}", sum.wrapping_neg());
}

/// Convert hex character pairs to bytes
fn hex_line_to_bytes(hex_str: &str) -> std::result::Result<Vec<u8>, String> {
    let digits = hex_str.as_bytes();
    if digits.len() % 2 != 0 {
        return Err("odd number of hex characters".into());
    }
    digits
        .chunks(2)
        .map(|pair| -> std::result::Result<u8, String> {
            Ok((hex_digit(pair[0])? << 4) | hex_digit(pair[1])?)
        })
        .collect()
}

fn hex_digit(c: u8) -> std::result::Result<u8, String> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(format!("invalid hex character: {}", c as char)),
    }
}
