//! # Boot Info View
//!
//! A validating lens over the raw information block. The view exposes a
//! field only when its gate bit in the [`flags`](InfoFlags) bitmap is
//! set; ungated storage is never observable through this API, however
//! plausible its bytes look.
//!
//! The view is stateless: every accessor recomputes its answer from the
//! raw block, so repeated calls for the same flags always agree and the
//! variable-length walks ([`modules`](BootInfo::modules),
//! [`memory_map`](BootInfo::memory_map)) restart from the top each time
//! the accessor is called.
//!
//! The view borrows loader-owned memory and must not outlive the boot
//! phase; once the kernel installs its own memory map, anything still
//! needed has to be copied into kernel-owned storage.

use crate::entry::ValidatedAddress;
use crate::flags::InfoFlags;
use crate::mmap::MemoryMap;
use crate::modules::Modules;
use crate::phys::PhysMapper;
use crate::raw::RawBootInfo;
use crate::strings::read_str;
use crate::{ParseError, PhysAddr};

/// The legacy low/high memory sizes (gate bit 0).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct MemorySummary {
    /// Conventional memory below 1 MiB, in KiB. At most 640.
    pub lower_kib: u32,
    /// Extended memory above 1 MiB, in KiB (first hole at most).
    pub upper_kib: u32,
}

/// The decoded BIOS boot device code (gate bit 1).
///
/// Four bytes, most significant first: the BIOS drive number, then up
/// to three nested partition levels. [`Self::UNUSED`] marks a level the
/// loader did not descend into.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct BootDevice {
    /// BIOS drive number as used by INT 13h (`0x00` first floppy,
    /// `0x80` first hard disk).
    pub drive: u8,
    /// Top-level, sub, and sub-sub partition, outermost first.
    pub partitions: [u8; 3],
}

impl BootDevice {
    /// Marks a partition level the loader did not use.
    pub const UNUSED: u8 = 0xff;

    #[must_use]
    pub const fn from_raw(code: u32) -> Self {
        let [b3, b2, b1, b0] = code.to_be_bytes();
        Self {
            drive: b3,
            partitions: [b2, b1, b0],
        }
    }

    /// Whether the BIOS drive number denotes a hard disk.
    #[must_use]
    pub const fn is_hard_disk(&self) -> bool {
        self.drive & 0x80 != 0
    }
}

/// Kernel symbol information (gate bits 4 xor 5).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SymbolInfo {
    /// a.out-style symbol table (bit 4).
    Aout(AoutSymbols),
    /// ELF section header table (bit 5).
    Elf(ElfSections),
}

/// a.out symbol table info from the symbol area.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct AoutSymbols {
    /// Size of the symbol table in bytes.
    pub tabsize: u32,
    /// Size of the string table that follows it.
    pub strsize: u32,
    /// Physical address of the symbol table.
    pub addr: PhysAddr,
}

/// ELF section header info from the symbol area.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ElfSections {
    /// Number of section headers.
    pub num: u32,
    /// Size of one section header in bytes.
    pub entry_size: u32,
    /// Physical address of the section header table.
    pub addr: PhysAddr,
    /// Index of the section name string table.
    pub shndx: u32,
}

/// The advertised BIOS drive info span (gate bit 7).
///
/// Exposed as a span only; the record format inside it is firmware
/// territory this kernel does not interpret.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct DrivesRegion {
    /// Physical start of the drive info region.
    pub addr: PhysAddr,
    /// Region length in bytes.
    pub length: u32,
}

/// The VESA BIOS Extensions info (gate bit 11).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct VbeInfo {
    /// Physical address of the VBE control info block.
    pub control_info: PhysAddr,
    /// Physical address of the VBE mode info block.
    pub mode_info: PhysAddr,
    /// Current VBE mode number.
    pub mode: u16,
    /// VBE 3.0 protected-mode interface segment.
    pub interface_seg: u16,
    /// VBE 3.0 protected-mode interface offset.
    pub interface_off: u16,
    /// VBE 3.0 protected-mode interface length.
    pub interface_len: u16,
}

/// Flag-gated view over the Multiboot information block.
///
/// Constructed from a [`ValidatedAddress`] — the output of the entry
/// gate — plus the [`PhysMapper`] for the current environment. Holds a
/// borrowed, read-only reference into loader-owned physical memory.
pub struct BootInfo<'a, M: PhysMapper> {
    raw: &'a RawBootInfo,
    mapper: M,
}

impl<'a, M: PhysMapper> BootInfo<'a, M> {
    /// Overlay the raw block at the validated address.
    ///
    /// This is the one place in the boot path where an untyped address
    /// becomes a typed structure; every later read flows through the
    /// gated accessors below.
    ///
    /// # Safety
    /// The caller must ensure that through `mapper`:
    /// * `address` covers a readable, 4-byte-aligned
    ///   [`RawBootInfo`] that stays unmodified while the view lives,
    /// * every structure a *gated* field points at (command line,
    ///   module list and tag strings, memory map, …) is readable over
    ///   its advertised extent.
    ///
    /// A loader following the Multiboot convention provides all of
    /// this; [`validate`](crate::validate) only establishes that the
    /// loader claimed to.
    #[must_use]
    pub unsafe fn new(address: ValidatedAddress, mapper: M) -> Self {
        // SAFETY: forwarded to the caller.
        let raw = unsafe { mapper.phys_to_ref::<RawBootInfo>(address.as_phys()) };
        Self { raw, mapper }
    }

    /// The gate bitmap. Always available.
    #[must_use]
    pub fn flags(&self) -> InfoFlags {
        InfoFlags::from_bits(self.raw.flags)
    }

    /// The legacy memory sizes, if gated in (bit 0).
    #[must_use]
    pub fn memory_summary(&self) -> Option<MemorySummary> {
        self.flags().memory().then(|| MemorySummary {
            lower_kib: self.raw.mem_lower,
            upper_kib: self.raw.mem_upper,
        })
    }

    /// The BIOS boot device, if gated in (bit 1).
    #[must_use]
    pub fn boot_device(&self) -> Option<BootDevice> {
        self.flags()
            .boot_device()
            .then(|| BootDevice::from_raw(self.raw.boot_device))
    }

    /// The kernel command line, if gated in (bit 2).
    ///
    /// The returned string borrows loader memory. An unterminated or
    /// non-UTF-8 string reports [`ParseError::MalformedString`] without
    /// affecting any other field.
    #[must_use]
    pub fn command_line(&self) -> Option<Result<&'a str, ParseError>> {
        self.flags().cmdline().then(|| {
            // SAFETY: gated pointer; readability per the `new` contract.
            unsafe { read_str(&self.mapper, PhysAddr::from_u32(self.raw.cmdline)) }
        })
    }

    /// The module list walk, if gated in (bit 3).
    ///
    /// Restartable: each call begins a fresh walk of exactly
    /// `mods_count` records.
    #[must_use]
    pub fn modules(&self) -> Option<Modules<'_, M>> {
        self.flags().modules().then(|| {
            Modules::new(
                &self.mapper,
                PhysAddr::from_u32(self.raw.mods_addr),
                self.raw.mods_count,
            )
        })
    }

    /// Kernel symbol information, if exactly one of bits 4 and 5 is set.
    ///
    /// The two bits are mutually exclusive by specification. A block
    /// asserting both is malformed, and since the claims contradict
    /// each other neither is trusted: the accessor returns `None`, and
    /// the failure stays as local as any other field-level problem.
    #[must_use]
    pub fn symbols(&self) -> Option<SymbolInfo> {
        let [w0, w1, w2, w3] = self.raw.syms;
        match (self.flags().aout_symbols(), self.flags().elf_symbols()) {
            (true, false) => Some(SymbolInfo::Aout(AoutSymbols {
                tabsize: w0,
                strsize: w1,
                addr: PhysAddr::from_u32(w2),
            })),
            (false, true) => Some(SymbolInfo::Elf(ElfSections {
                num: w0,
                entry_size: w1,
                addr: PhysAddr::from_u32(w2),
                shndx: w3,
            })),
            _ => None,
        }
    }

    /// The memory map walk, if gated in (bit 6).
    ///
    /// Restartable: each call begins a fresh walk over the advertised
    /// `mmap_length` bytes.
    #[must_use]
    pub fn memory_map(&self) -> Option<MemoryMap<'_, M>> {
        self.flags().memory_map().then(|| {
            MemoryMap::new(
                &self.mapper,
                PhysAddr::from_u32(self.raw.mmap_addr),
                self.raw.mmap_length,
            )
        })
    }

    /// The BIOS drive info span, if gated in (bit 7).
    #[must_use]
    pub fn drives(&self) -> Option<DrivesRegion> {
        self.flags().drives().then(|| DrivesRegion {
            addr: PhysAddr::from_u32(self.raw.drives_addr),
            length: self.raw.drives_length,
        })
    }

    /// The ROM configuration table address, if gated in (bit 8).
    #[must_use]
    pub fn config_table(&self) -> Option<PhysAddr> {
        self.flags()
            .config_table()
            .then(|| PhysAddr::from_u32(self.raw.config_table))
    }

    /// The bootloader's name, if gated in (bit 9).
    ///
    /// Same bounded-scan rules as [`command_line`](Self::command_line).
    #[must_use]
    pub fn loader_name(&self) -> Option<Result<&'a str, ParseError>> {
        self.flags().loader_name().then(|| {
            // SAFETY: gated pointer; readability per the `new` contract.
            unsafe { read_str(&self.mapper, PhysAddr::from_u32(self.raw.boot_loader_name)) }
        })
    }

    /// The APM table address, if gated in (bit 10).
    #[must_use]
    pub fn apm_table(&self) -> Option<PhysAddr> {
        self.flags()
            .apm_table()
            .then(|| PhysAddr::from_u32(self.raw.apm_table))
    }

    /// The VESA graphics info, if gated in (bit 11).
    #[must_use]
    pub fn vbe(&self) -> Option<VbeInfo> {
        self.flags().vbe().then(|| VbeInfo {
            control_info: PhysAddr::from_u32(self.raw.vbe_control_info),
            mode_info: PhysAddr::from_u32(self.raw.vbe_mode_info),
            mode: self.raw.vbe_mode,
            interface_seg: self.raw.vbe_interface_seg,
            interface_off: self.raw.vbe_interface_off,
            interface_len: self.raw.vbe_interface_len,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::phys::IdentityMapper;
    use crate::{BOOT_MAGIC, validate};

    fn view(raw: &RawBootInfo) -> BootInfo<'_, IdentityMapper> {
        let address = core::ptr::from_ref(raw) as u64;
        let validated = validate(BOOT_MAGIC, address).expect("gate accepts a real block");
        // SAFETY: `raw` is a live, aligned host allocation; the blocks
        // under test gate in no pointers beyond what each test sets up.
        unsafe { BootInfo::new(validated, IdentityMapper) }
    }

    #[test]
    fn ungated_fields_stay_hidden_despite_garbage_storage() {
        let mut raw = RawBootInfo::zeroed();
        raw.mem_lower = 640;
        raw.mem_upper = 0xdead;
        raw.boot_device = 0x80ff_ffff;
        raw.config_table = 0x000f_0000;
        raw.apm_table = 0x000f_c000;
        raw.vbe_mode = 0x118;
        // flags stays zero: none of that storage is gated in.
        let info = view(&raw);

        assert!(info.memory_summary().is_none());
        assert!(info.boot_device().is_none());
        assert!(info.command_line().is_none());
        assert!(info.modules().is_none());
        assert!(info.symbols().is_none());
        assert!(info.memory_map().is_none());
        assert!(info.drives().is_none());
        assert!(info.config_table().is_none());
        assert!(info.loader_name().is_none());
        assert!(info.apm_table().is_none());
        assert!(info.vbe().is_none());
    }

    #[test]
    fn boot_device_decodes_drive_and_partition_bytes() {
        let mut raw = RawBootInfo::zeroed();
        raw.flags = 1 << 1;
        raw.boot_device = 0x8001_02ff;
        let info = view(&raw);

        let device = info.boot_device().expect("gated in");
        assert_eq!(device.drive, 0x80);
        assert!(device.is_hard_disk());
        assert_eq!(device.partitions, [0x01, 0x02, BootDevice::UNUSED]);
    }

    #[test]
    fn symbol_area_decodes_per_exclusive_gate_bit() {
        let mut raw = RawBootInfo::zeroed();
        raw.syms = [64, 32, 0x0010_0000, 7];

        raw.flags = 1 << 4;
        match view(&raw).symbols() {
            Some(SymbolInfo::Aout(aout)) => {
                assert_eq!(aout.tabsize, 64);
                assert_eq!(aout.strsize, 32);
                assert_eq!(aout.addr.as_u64(), 0x0010_0000);
            }
            other => panic!("expected a.out symbols, got {other:?}"),
        }

        raw.flags = 1 << 5;
        match view(&raw).symbols() {
            Some(SymbolInfo::Elf(elf)) => {
                assert_eq!(elf.num, 64);
                assert_eq!(elf.entry_size, 32);
                assert_eq!(elf.addr.as_u64(), 0x0010_0000);
                assert_eq!(elf.shndx, 7);
            }
            other => panic!("expected ELF sections, got {other:?}"),
        }
    }

    #[test]
    fn contradictory_symbol_bits_expose_neither_interpretation() {
        let mut raw = RawBootInfo::zeroed();
        raw.flags = (1 << 4) | (1 << 5);
        raw.syms = [64, 32, 0x0010_0000, 7];
        assert!(view(&raw).symbols().is_none());
    }

    #[test]
    fn scalar_accessors_return_the_gated_values() {
        let mut raw = RawBootInfo::zeroed();
        raw.flags = (1 << 0) | (1 << 7) | (1 << 8) | (1 << 10) | (1 << 11);
        raw.mem_lower = 640;
        raw.mem_upper = 261_120;
        raw.drives_length = 40;
        raw.drives_addr = 0x0009_a000;
        raw.config_table = 0x000f_0000;
        raw.apm_table = 0x000f_c000;
        raw.vbe_control_info = 0x0008_0000;
        raw.vbe_mode_info = 0x0008_0200;
        raw.vbe_mode = 0x118;
        raw.vbe_interface_seg = 0xc000;
        raw.vbe_interface_off = 0x0042;
        raw.vbe_interface_len = 0x0100;
        let info = view(&raw);

        let memory = info.memory_summary().expect("gated in");
        assert_eq!(memory.lower_kib, 640);
        assert_eq!(memory.upper_kib, 261_120);

        let drives = info.drives().expect("gated in");
        assert_eq!(drives.addr.as_u64(), 0x0009_a000);
        assert_eq!(drives.length, 40);

        assert_eq!(info.config_table().expect("gated in").as_u64(), 0x000f_0000);
        assert_eq!(info.apm_table().expect("gated in").as_u64(), 0x000f_c000);

        let vbe = info.vbe().expect("gated in");
        assert_eq!(vbe.control_info.as_u64(), 0x0008_0000);
        assert_eq!(vbe.mode_info.as_u64(), 0x0008_0200);
        assert_eq!(vbe.mode, 0x118);
        assert_eq!(vbe.interface_seg, 0xc000);
        assert_eq!(vbe.interface_off, 0x0042);
        assert_eq!(vbe.interface_len, 0x0100);
    }
}
