//! EEPROM image files.
//!
//! Two formats, chosen by file extension:
//!
//! | Extension               | Format                                  |
//! |-------------------------|-----------------------------------------|
//! | `.eep`, `.hex`, `.ihex` | Intel HEX (see [`crate::hex`])          |
//! | anything else           | raw binary, one byte per EEPROM cell    |
//!
//! Cells an image does not cover load as erased (`0xFF`).

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::hex;
use crate::memory::Eeprom;

/// On-disk representation of an EEPROM image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Intel HEX text.
    IntelHex,
    /// Raw bytes.
    Raw,
}

impl ImageFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("eep") | Some("hex") | Some("ihex") => ImageFormat::IntelHex,
            _ => ImageFormat::Raw,
        }
    }
}

/// Load an image of a `capacity`-byte EEPROM from `path`.
pub fn load_image(path: &Path, capacity: usize) -> Result<Eeprom> {
    let mut eeprom = Eeprom::new(capacity);
    let format = ImageFormat::from_path(path);
    match format {
        ImageFormat::IntelHex => {
            let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
            let mut cells = eeprom.as_bytes().to_vec();
            let used = hex::parse_hex(&text, &mut cells)?;
            eeprom.load(&cells);
            debug!(path = %path.display(), used, "loaded Intel HEX image");
        }
        ImageFormat::Raw => {
            let data = std::fs::read(path).map_err(|e| Error::io(path, e))?;
            if data.len() > capacity {
                warn!(
                    path = %path.display(),
                    len = data.len(),
                    capacity,
                    "image larger than EEPROM, extra bytes ignored"
                );
            } else if data.len() < capacity {
                warn!(
                    path = %path.display(),
                    len = data.len(),
                    capacity,
                    "image smaller than EEPROM, remainder treated as erased"
                );
            }
            eeprom.load(&data);
            debug!(path = %path.display(), len = data.len(), "loaded raw image");
        }
    }
    Ok(eeprom)
}

/// Load `path` if it exists, otherwise start from an erased EEPROM.
pub fn open_or_erased(path: &Path, capacity: usize) -> Result<Eeprom> {
    if path.exists() {
        load_image(path, capacity)
    } else {
        debug!(path = %path.display(), capacity, "no image yet, starting erased");
        Ok(Eeprom::new(capacity))
    }
}

/// Save `eeprom` to `path` in the format its extension selects.
pub fn save_image(eeprom: &Eeprom, path: &Path) -> Result<()> {
    let result = match ImageFormat::from_path(path) {
        ImageFormat::IntelHex => std::fs::write(path, hex::write_hex(eeprom.as_bytes())),
        ImageFormat::Raw => std::fs::write(path, eeprom.as_bytes()),
    };
    result.map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), "saved image");
    Ok(())
}
