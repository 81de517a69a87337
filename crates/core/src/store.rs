//! The version record store: address layout and write guard.
//!
//! The record lives in the last [`RESERVED_BYTES`] of the device, so it
//! survives sketches that use EEPROM from address 0 upwards. The store has two
//! observable states, Absent and Present, and only [`VersionStore::write`]
//! moves between them.
//!
//! ## Write guard
//!
//! First write wins: once a valid record is present, a write without
//! `overwrite` leaves the stored bytes alone.
//!
//! ## Limitations
//!
//! - A write interrupted by power loss can leave a record whose flag is
//!   already valid but whose fields are torn. Nothing detects this; the only
//!   validity witness is the presence flag.
//! - `&mut self` makes `write` single-writer. A store shared between threads
//!   must sit behind a lock held across the presence check and the write.

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::memory::ByteStore;
use crate::record::{VersionRecord, RECORD_SIZE};
use crate::{MAGIC, RESERVED_BYTES};

/// Start of the reserved region in a store of `capacity` bytes.
///
/// `None` if the store is smaller than [`RESERVED_BYTES`].
pub const fn start_address(capacity: usize) -> Option<usize> {
    capacity.checked_sub(RESERVED_BYTES)
}

/// What a guarded write did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The record was stored.
    Written,
    /// A valid record was already present and overwrite was not requested.
    Skipped,
}

/// Version record access over a [`ByteStore`].
#[derive(Debug)]
pub struct VersionStore<S> {
    store: S,
    start: usize,
}

impl<S: ByteStore> VersionStore<S> {
    /// Wrap `store`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreTooSmall`] if the store cannot hold the reserved
    /// region.
    pub fn new(store: S) -> Result<Self> {
        let capacity = store.capacity();
        let start = start_address(capacity).ok_or(Error::StoreTooSmall {
            capacity,
            required: RESERVED_BYTES,
        })?;
        Ok(VersionStore { store, start })
    }

    /// Address of the first byte of the reserved region.
    pub fn start_address(&self) -> usize {
        self.start
    }

    /// True iff the stored presence flag equals [`MAGIC`].
    pub fn is_present(&self) -> bool {
        let mut flag = [0u8; 2];
        self.store.read_block(self.start, &mut flag);
        u16::from_le_bytes(flag) == MAGIC
    }

    /// Store `record` unless a valid record is present and `overwrite` is false.
    pub fn write(&mut self, record: &VersionRecord, overwrite: bool) -> Result<WriteOutcome> {
        if self.is_present() && !overwrite {
            debug!(addr = self.start, "version record present, write skipped");
            return Ok(WriteOutcome::Skipped);
        }
        let bytes = record.to_bytes()?;
        self.store.write_block(self.start, &bytes);
        debug!(addr = self.start, len = bytes.len(), overwrite, "version record written");
        Ok(WriteOutcome::Written)
    }

    /// Read the stored record into `out`.
    ///
    /// Returns `false` and leaves `out` untouched if no valid record is
    /// present.
    pub fn read_into(&self, out: &mut VersionRecord) -> Result<bool> {
        match self.read()? {
            Some(record) => {
                *out = record;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The stored record, or `None` if no valid record is present.
    pub fn read(&self) -> Result<Option<VersionRecord>> {
        if !self.is_present() {
            trace!(addr = self.start, "no version record");
            return Ok(None);
        }
        let mut buf = [0u8; RECORD_SIZE];
        self.store.read_block(self.start, &mut buf);
        trace!(addr = self.start, len = buf.len(), "version record read");
        VersionRecord::from_bytes(&buf).map(Some)
    }

    /// Raw bytes of the whole reserved region.
    pub fn reserved_region(&self) -> [u8; RESERVED_BYTES] {
        let mut buf = [0u8; RESERVED_BYTES];
        self.store.read_block(self.start, &mut buf);
        buf
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{Eeprom, ERASED};
    use crate::EEPROM_SIZE;

    fn fresh() -> VersionStore<Eeprom> {
        VersionStore::new(Eeprom::default()).unwrap()
    }

    #[test]
    fn test_start_address() {
        assert_eq!(start_address(1024), Some(964));
        assert_eq!(start_address(RESERVED_BYTES), Some(0));
        assert_eq!(start_address(RESERVED_BYTES - 1), None);
        assert_eq!(start_address(0), None);
        assert_eq!(fresh().start_address(), EEPROM_SIZE - RESERVED_BYTES);
    }

    #[test]
    fn test_store_too_small() {
        let err = VersionStore::new(Eeprom::new(RESERVED_BYTES - 1)).unwrap_err();
        assert!(matches!(
            err,
            Error::StoreTooSmall { capacity: 59, required: 60 }
        ));
        assert!(VersionStore::new(Eeprom::new(RESERVED_BYTES)).is_ok());
    }

    #[test]
    fn test_fresh_store_is_absent() {
        let vs = fresh();
        assert!(!vs.is_present());
        assert_eq!(vs.read().unwrap(), None);
    }

    #[test]
    fn test_read_into_leaves_output_untouched() {
        let vs = fresh();
        let mut out = VersionRecord::default();
        out.set_project_name("sentinel").unwrap();
        let before = out;
        assert!(!vs.read_into(&mut out).unwrap());
        assert_eq!(out, before);
    }

    #[test]
    fn test_round_trip() {
        let mut vs = fresh();
        let mut rec = VersionRecord::default();
        rec.set_project_name("Tank Plant").unwrap();
        rec.set_vendor("N").unwrap();
        assert_eq!(vs.write(&rec, false).unwrap(), WriteOutcome::Written);
        assert!(vs.is_present());

        let mut out = VersionRecord::absent();
        assert!(vs.read_into(&mut out).unwrap());
        assert_eq!(out, rec);
    }

    #[test]
    fn test_round_trip_with_embedded_nul() {
        let mut vs = fresh();
        let mut rec = VersionRecord::default();
        rec.set_project_name("Tank\0Plant").unwrap();
        rec.set_software_version("2\0.0").unwrap();
        assert_eq!(rec.project_name(), &"Tank");
        vs.write(&rec, false).unwrap();

        let back = vs.read().unwrap().unwrap();
        assert_eq!(back, rec);
        assert_eq!(back.software_version(), &"2");
    }

    #[test]
    fn test_presence_flag_is_little_endian_u16() {
        let mut eeprom = Eeprom::default();
        let start = start_address(eeprom.capacity()).unwrap();
        eeprom.write_block(start, &[42, 1]);
        assert!(!VersionStore::new(&mut eeprom).unwrap().is_present());
        eeprom.write_block(start, &[42, 0]);
        assert!(VersionStore::new(&mut eeprom).unwrap().is_present());
    }

    #[test]
    fn test_write_without_overwrite_is_noop_when_present() {
        let mut vs = fresh();
        vs.write(&VersionRecord::default(), false).unwrap();
        let before = vs.store().as_bytes().to_vec();

        let mut other = VersionRecord::default();
        other.set_software_version("9.9.9").unwrap();
        assert_eq!(vs.write(&other, false).unwrap(), WriteOutcome::Skipped);
        assert_eq!(vs.store().as_bytes(), &before[..]);
    }

    #[test]
    fn test_overwrite_replaces_bytes() {
        let mut vs = fresh();
        vs.write(&VersionRecord::default(), false).unwrap();
        let mut other = VersionRecord::default();
        other.set_software_version("9.9.9").unwrap();
        assert_eq!(vs.write(&other, true).unwrap(), WriteOutcome::Written);
        assert_eq!(*vs.read().unwrap().unwrap().software_version(), "9.9.9");
    }

    #[test]
    fn test_overwrite_on_fresh_store() {
        let mut vs = fresh();
        assert_eq!(vs.write(&VersionRecord::default(), true).unwrap(), WriteOutcome::Written);
        assert!(vs.is_present());
    }

    #[test]
    fn test_first_write_wins_scenario() {
        let mut vs = fresh();
        let rec = VersionRecord::default();
        assert_eq!(rec.project_version(), 1);
        assert_eq!(*rec.software_version(), "1.0.0");
        assert_eq!(*rec.vendor(), "M");
        assert_eq!(*rec.final_software_date(), "January 1, 2024");
        vs.write(&rec, false).unwrap();

        let mut rec2 = rec;
        rec2.set_project_version(2);
        vs.write(&rec2, false).unwrap();
        assert_eq!(vs.read().unwrap().unwrap().project_version(), 1);

        vs.write(&rec2, true).unwrap();
        assert_eq!(vs.read().unwrap().unwrap().project_version(), 2);
    }

    #[test]
    fn test_write_stays_in_reserved_region() {
        let mut vs = fresh();
        vs.write(&VersionRecord::default(), false).unwrap();
        let bytes = vs.into_inner().into_bytes();
        let start = start_address(bytes.len()).unwrap();
        assert!(bytes[..start].iter().all(|&b| b == ERASED));
        assert!(bytes[start + RECORD_SIZE..].iter().all(|&b| b == ERASED));
    }

    #[test]
    fn test_writing_absent_record_clears_presence() {
        let mut vs = fresh();
        vs.write(&VersionRecord::default(), false).unwrap();
        vs.write(&VersionRecord::absent(), true).unwrap();
        assert!(!vs.is_present());
    }

    #[test]
    fn test_reserved_region() {
        let mut vs = fresh();
        vs.write(&VersionRecord::default(), false).unwrap();
        let region = vs.reserved_region();
        assert_eq!(&region[..2], &[42, 0]);
        assert!(region[RECORD_SIZE..].iter().all(|&b| b == ERASED));
    }
}
