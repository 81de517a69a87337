//! Byte-addressable non-volatile storage.
//!
//! [`ByteStore`] is the only capability the record store needs from a device:
//! a fixed capacity plus byte and block access. [`Eeprom`] is the in-memory
//! implementation used on the host; it models an AVR EEPROM:
//!
//! | Property      | Value                             |
//! |---------------|-----------------------------------|
//! | Erased state  | `0xFF` in every cell              |
//! | Default size  | 1 KB (ATmega328P / ATmega32u4)    |
//! | Write policy  | update: unchanged cells untouched |

use crate::EEPROM_SIZE;

/// Value of an erased EEPROM cell.
pub const ERASED: u8 = 0xFF;

/// Fixed-capacity, byte-addressable storage.
///
/// Addresses at or past [`capacity`](ByteStore::capacity) read as [`ERASED`]
/// and writes to them are dropped, matching how the AVR EEPROM address
/// register ignores bits above the array size.
pub trait ByteStore {
    /// Number of addressable bytes.
    fn capacity(&self) -> usize;

    /// Read one byte.
    fn read_byte(&self, addr: usize) -> u8;

    /// Fill `buf` with the bytes starting at `addr`.
    fn read_block(&self, addr: usize, buf: &mut [u8]) {
        for (i, b) in buf.iter_mut().enumerate() {
            *b = self.read_byte(addr + i);
        }
    }

    /// Store `bytes` starting at `addr`.
    fn write_block(&mut self, addr: usize, bytes: &[u8]);
}

impl<S: ByteStore + ?Sized> ByteStore for &mut S {
    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn read_byte(&self, addr: usize) -> u8 {
        (**self).read_byte(addr)
    }

    fn read_block(&self, addr: usize, buf: &mut [u8]) {
        (**self).read_block(addr, buf)
    }

    fn write_block(&mut self, addr: usize, bytes: &[u8]) {
        (**self).write_block(addr, bytes)
    }
}

/// In-memory EEPROM image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eeprom {
    data: Vec<u8>,
    /// True if modified since creation or the last [`Eeprom::mark_clean`]
    dirty: bool,
}

impl Eeprom {
    /// Erased EEPROM of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Eeprom {
            data: vec![ERASED; capacity],
            dirty: false,
        }
    }

    /// Wrap existing contents; the capacity is `data.len()`.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Eeprom { data, dirty: false }
    }

    /// Load contents from a byte slice, keeping the current capacity.
    ///
    /// Extra input is ignored; missing cells keep their current value.
    pub fn load(&mut self, data: &[u8]) {
        let len = data.len().min(self.data.len());
        self.data[..len].copy_from_slice(&data[..len]);
        self.dirty = false;
    }

    /// Reset every cell to [`ERASED`].
    pub fn erase(&mut self) {
        if self.data.iter().any(|&b| b != ERASED) {
            self.data.fill(ERASED);
            self.dirty = true;
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

impl Default for Eeprom {
    fn default() -> Self {
        Self::new(EEPROM_SIZE)
    }
}

impl ByteStore for Eeprom {
    fn capacity(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn read_byte(&self, addr: usize) -> u8 {
        self.data.get(addr).copied().unwrap_or(ERASED)
    }

    fn read_block(&self, addr: usize, buf: &mut [u8]) {
        let start = addr.min(self.data.len());
        let end = addr.saturating_add(buf.len()).min(self.data.len());
        let n = end - start;
        buf[..n].copy_from_slice(&self.data[start..end]);
        buf[n..].fill(ERASED);
    }

    fn write_block(&mut self, addr: usize, bytes: &[u8]) {
        for (i, &v) in bytes.iter().enumerate() {
            let Some(cell) = self.data.get_mut(addr + i) else {
                break;
            };
            // Update semantics: only changed cells are programmed.
            if *cell != v {
                *cell = v;
                self.dirty = true;
            }
        }
    }
}
