//! # Memory Map Walk
//!
//! The BIOS memory map the loader forwards is a run of *self-describing*
//! records: each starts with a `u32` size prefix giving the number of
//! bytes that follow it, so records may grow in future firmware without
//! breaking old walkers. The whole run occupies exactly `mmap_length`
//! bytes starting at `mmap_addr`.
//!
//! [`MemoryMap`] turns that foreign byte run into a lazy, finite,
//! restartable iterator. Every step checks the record's declared extent
//! against the bytes still inside the advertised span *before* touching
//! them; a record crossing the boundary yields
//! [`ParseError::TruncatedMemoryMap`] once and ends the walk. A run
//! whose records tile the span exactly terminates without error.
//!
//! The records live in loader/firmware-owned memory and stay valid only
//! until the kernel re-purposes that physical range; anything needed
//! long-term must be copied into kernel-owned storage first.

use crate::phys::PhysMapper;
use crate::{ParseError, PhysAddr};
use log::warn;

/// Bytes of the `u32` size prefix (not counted by the prefix itself).
const SIZE_PREFIX_BYTES: u64 = 4;

/// Bytes of the fixed record body: base (8), length (8), type (4).
const RECORD_BODY_BYTES: u64 = 20;

/// Usability classification of one physical memory region.
///
/// Type codes follow the BIOS E820 convention the Multiboot map
/// inherits. Codes this kernel does not know decode as [`Reserved`]:
/// memory of unknown status must never reach an allocator.
///
/// [`Reserved`]: MemoryRegionKind::Reserved
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum MemoryRegionKind {
    /// Available RAM (type 1).
    Usable,
    /// Reserved by firmware or in use by the platform (type 2, and any
    /// unknown code).
    Reserved,
    /// Holds ACPI tables; reclaimable after they are parsed (type 3).
    AcpiReclaimable,
    /// ACPI non-volatile storage, preserved across sleep (type 4).
    Nvs,
    /// Defective RAM reported by the firmware (type 5).
    Bad,
}

impl MemoryRegionKind {
    #[must_use]
    pub const fn from_raw(code: u32) -> Self {
        match code {
            1 => Self::Usable,
            3 => Self::AcpiReclaimable,
            4 => Self::Nvs,
            5 => Self::Bad,
            _ => Self::Reserved,
        }
    }
}

/// One decoded memory map record.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct MemoryMapEntry {
    /// Physical start of the region.
    pub base: PhysAddr,
    /// Region length in bytes.
    pub length: u64,
    /// Usability classification.
    pub kind: MemoryRegionKind,
}

/// Lazy walk over the memory map records.
///
/// Obtained from [`BootInfo::memory_map`](crate::BootInfo::memory_map);
/// calling that accessor again restarts the walk from the first record.
/// After a [`ParseError::TruncatedMemoryMap`] the iterator is fused —
/// nothing past a record with a lying size prefix can be framed.
#[derive(Clone)]
pub struct MemoryMap<'a, M> {
    mapper: &'a M,
    cursor: PhysAddr,
    remaining: u64,
    fused: bool,
}

impl<'a, M: PhysMapper> MemoryMap<'a, M> {
    pub(crate) const fn new(mapper: &'a M, addr: PhysAddr, length: u32) -> Self {
        Self {
            mapper,
            cursor: addr,
            remaining: length as u64,
            fused: false,
        }
    }
}

impl<M: PhysMapper> Iterator for MemoryMap<'_, M> {
    type Item = Result<MemoryMapEntry, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fused || self.remaining == 0 {
            return None;
        }

        // The prefix itself must fit in the span before it may be read.
        if self.remaining < SIZE_PREFIX_BYTES {
            warn!(
                "memory map leaves {} trailing bytes, too few for a size prefix",
                self.remaining
            );
            self.fused = true;
            return Some(Err(ParseError::TruncatedMemoryMap));
        }
        // SAFETY: [cursor, cursor + 4) lies within the advertised span,
        // which the mapper contract guarantees to be mapped.
        let prefix = unsafe {
            self.mapper
                .phys_to_slice(self.cursor, SIZE_PREFIX_BYTES as usize)
        };
        let declared = u64::from(read_u32(prefix));

        let total = SIZE_PREFIX_BYTES + declared;
        if declared < RECORD_BODY_BYTES || total > self.remaining {
            warn!(
                "memory map record at {} declares {declared} bytes with {} remaining",
                self.cursor, self.remaining
            );
            self.fused = true;
            return Some(Err(ParseError::TruncatedMemoryMap));
        }

        // SAFETY: the record's full extent was just checked against the
        // remaining span; only the fixed body is read, trailing bytes of
        // an oversized record are skipped.
        let body = unsafe {
            self.mapper.phys_to_slice(
                self.cursor + SIZE_PREFIX_BYTES,
                RECORD_BODY_BYTES as usize,
            )
        };
        let entry = MemoryMapEntry {
            base: PhysAddr::from_u64(read_u64(&body[0..8])),
            length: read_u64(&body[8..16]),
            kind: MemoryRegionKind::from_raw(read_u32(&body[16..20])),
        };

        self.cursor = self.cursor + total;
        self.remaining -= total;
        Some(Ok(entry))
    }
}

/// Little-endian `u32` from the first four bytes of `bytes`.
fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(buf)
}

/// Little-endian `u64` from the first eight bytes of `bytes`.
fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(buf)
}
