//! # Module List Walk
//!
//! Modules are auxiliary blobs (an initial ramdisk, servers, …) the
//! loader placed in memory alongside the kernel. The list is simpler
//! than the memory map: exactly `mods_count` fixed 16-byte records at
//! `mods_addr`, so the walk is indexed by count rather than framed by a
//! byte length.
//!
//! Per-record validation is deliberately *non*-fusing: one record
//! violating `start <= end` yields
//! [`ParseError::MalformedModuleEntry`] for that position only, and the
//! records after it remain reachable. The record boundaries are fixed,
//! so unlike a truncated memory map a bad record cannot poison the
//! framing of its successors.
//!
//! Same ownership rule as the memory map: the records (and the tag
//! strings they point at) live in loader-owned memory and must be
//! copied out before that physical range is reclaimed.

use crate::phys::PhysMapper;
use crate::raw::MODULE_ENTRY_BYTES;
use crate::strings::read_str;
use crate::{ParseError, PhysAddr};
use log::warn;

/// One decoded module record.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ModuleEntry<'a> {
    /// Physical address of the first byte of the module.
    pub start: PhysAddr,
    /// Physical address one past the last byte of the module.
    pub end: PhysAddr,
    /// The loader's tag string for this module, usually command-line
    /// style. `None` if the loader supplied no string or the string
    /// failed the bounded scan — the address pair stays usable either
    /// way.
    pub string: Option<&'a str>,
}

impl ModuleEntry<'_> {
    /// Module size in bytes.
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.end.as_u64() - self.start.as_u64()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start.as_u64() == self.end.as_u64()
    }
}

/// Lazy walk over the module list.
///
/// Obtained from [`BootInfo::modules`](crate::BootInfo::modules);
/// calling that accessor again restarts the walk. Yields exactly
/// `mods_count` items in list order.
#[derive(Clone)]
pub struct Modules<'a, M> {
    mapper: &'a M,
    base: PhysAddr,
    count: u32,
    index: u32,
}

impl<'a, M: PhysMapper> Modules<'a, M> {
    pub(crate) const fn new(mapper: &'a M, base: PhysAddr, count: u32) -> Self {
        Self {
            mapper,
            base,
            count,
            index: 0,
        }
    }
}

impl<'a, M: PhysMapper> Iterator for Modules<'a, M> {
    type Item = Result<ModuleEntry<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index == self.count {
            return None;
        }
        let index = self.index;
        self.index += 1;

        let offset = u64::from(index) * MODULE_ENTRY_BYTES;
        // SAFETY: record `index < mods_count`, so the 16 bytes lie
        // within the span the loader advertised for the list.
        let record = unsafe {
            self.mapper
                .phys_to_slice(self.base + offset, MODULE_ENTRY_BYTES as usize)
        };
        let start = u32::from_le_bytes([record[0], record[1], record[2], record[3]]);
        let end = u32::from_le_bytes([record[4], record[5], record[6], record[7]]);
        let string = u32::from_le_bytes([record[8], record[9], record[10], record[11]]);

        if start > end {
            warn!("module entry {index} has start {start:#x} above end {end:#x}");
            return Some(Err(ParseError::MalformedModuleEntry { index }));
        }

        let string = if string == 0 {
            None
        } else {
            // SAFETY: tag strings share the loader-owned boot region;
            // the scan itself is bounded.
            unsafe { read_str(self.mapper, PhysAddr::from_u32(string)).ok() }
        };

        Some(Ok(ModuleEntry {
            start: PhysAddr::from_u32(start),
            end: PhysAddr::from_u32(end),
            string,
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.count - self.index) as usize;
        (left, Some(left))
    }
}

impl<M: PhysMapper> ExactSizeIterator for Modules<'_, M> {}
