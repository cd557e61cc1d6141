//! # The Multiboot Flags Word
//!
//! The first word of the information block is a bitmap declaring which
//! of the remaining fields the bootloader actually filled in. A field
//! whose gate bit is clear may hold stale or undefined bytes and must
//! never be interpreted; every accessor on
//! [`BootInfo`](crate::BootInfo) consults this bitmap first.
//!
//! ### Bit layout
//!
//! | Bit   | Gates                          |
//! |-------|--------------------------------|
//! | 0     | `mem_lower` / `mem_upper`      |
//! | 1     | `boot_device`                  |
//! | 2     | `cmdline`                      |
//! | 3     | `mods_count` / `mods_addr`     |
//! | 4     | a.out symbol table info        |
//! | 5     | ELF section header info        |
//! | 6     | `mmap_length` / `mmap_addr`    |
//! | 7     | `drives_length` / `drives_addr`|
//! | 8     | `config_table`                 |
//! | 9     | `boot_loader_name`             |
//! | 10    | `apm_table`                    |
//! | 11    | `vbe_*` fields                 |
//! | 12-31 | reserved, must be ignored      |
//!
//! Bits 4 and 5 are mutually exclusive; a block asserting both is
//! malformed and neither symbol interpretation can be trusted.

use bitfield_struct::bitfield;

/// The `flags` bitmap of the Multiboot information block.
///
/// One named accessor per gate bit; the reserved high bits are masked
/// off and never exposed.
#[bitfield(u32)]
pub struct InfoFlags {
    /// Bit 0: `mem_lower` and `mem_upper` are valid.
    pub memory: bool,
    /// Bit 1: `boot_device` is valid.
    pub boot_device: bool,
    /// Bit 2: `cmdline` points to a NUL-terminated command line.
    pub cmdline: bool,
    /// Bit 3: `mods_count` and `mods_addr` describe the module list.
    pub modules: bool,
    /// Bit 4: the symbol area holds a.out symbol table info.
    pub aout_symbols: bool,
    /// Bit 5: the symbol area holds ELF section header info.
    pub elf_symbols: bool,
    /// Bit 6: `mmap_length` and `mmap_addr` describe the memory map.
    pub memory_map: bool,
    /// Bit 7: `drives_length` and `drives_addr` describe drive info.
    pub drives: bool,
    /// Bit 8: `config_table` points at the ROM configuration table.
    pub config_table: bool,
    /// Bit 9: `boot_loader_name` points to the loader's name string.
    pub loader_name: bool,
    /// Bit 10: `apm_table` points at the APM table.
    pub apm_table: bool,
    /// Bit 11: the `vbe_*` fields carry VESA graphics info.
    pub vbe: bool,
    #[bits(20)]
    __: u32,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn gate_bits_match_the_multiboot_layout() {
        assert!(InfoFlags::from_bits(1 << 0).memory());
        assert!(InfoFlags::from_bits(1 << 1).boot_device());
        assert!(InfoFlags::from_bits(1 << 2).cmdline());
        assert!(InfoFlags::from_bits(1 << 3).modules());
        assert!(InfoFlags::from_bits(1 << 4).aout_symbols());
        assert!(InfoFlags::from_bits(1 << 5).elf_symbols());
        assert!(InfoFlags::from_bits(1 << 6).memory_map());
        assert!(InfoFlags::from_bits(1 << 7).drives());
        assert!(InfoFlags::from_bits(1 << 8).config_table());
        assert!(InfoFlags::from_bits(1 << 9).loader_name());
        assert!(InfoFlags::from_bits(1 << 10).apm_table());
        assert!(InfoFlags::from_bits(1 << 11).vbe());
    }

    #[test]
    fn reserved_bits_do_not_leak_into_gates() {
        let flags = InfoFlags::from_bits(0xffff_f000);
        assert!(!flags.memory());
        assert!(!flags.cmdline());
        assert!(!flags.modules());
        assert!(!flags.memory_map());
        assert!(!flags.vbe());
    }
}
