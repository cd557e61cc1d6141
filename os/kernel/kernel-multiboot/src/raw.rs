//! # Raw Multiboot Information Block Layout
//!
//! The fixed-layout structure a Multiboot (v1) loader places in memory
//! before jumping to the kernel. Field widths are the wire widths of
//! the Multiboot specification (`u32`/`u16`); the order matches the
//! classic information block.
//!
//! Nothing in this module interprets the fields. Which of them carry
//! meaning is declared by the [`flags`](RawBootInfo::flags) bitmap, and
//! only the [`BootInfo`](crate::BootInfo) view applies that gating —
//! raw field reads outside the view are a bug.

/// The Multiboot information block, exactly as laid out by the loader.
///
/// Keep this `#[repr(C)]` with fixed-size integers: it overlays foreign
/// memory at the address the loader handed over.
#[repr(C)]
#[derive(Copy, Clone)]
pub struct RawBootInfo {
    /// Bitmap declaring which of the following fields are valid.
    pub flags: u32,
    /// Conventional ("low") memory size in KiB. Gated by bit 0.
    pub mem_lower: u32,
    /// Extended ("high") memory size in KiB. Gated by bit 0.
    pub mem_upper: u32,
    /// BIOS boot device code. Gated by bit 1.
    pub boot_device: u32,
    /// Physical address of the NUL-terminated command line. Gated by bit 2.
    pub cmdline: u32,
    /// Number of loaded modules. Gated by bit 3.
    pub mods_count: u32,
    /// Physical address of the module list. Gated by bit 3.
    pub mods_addr: u32,
    /// Symbol area: a.out `tabsize`/`strsize`/`addr`/reserved when bit 4
    /// is set, ELF `num`/`size`/`addr`/`shndx` when bit 5 is set.
    pub syms: [u32; 4],
    /// Total size of the memory map in bytes. Gated by bit 6.
    pub mmap_length: u32,
    /// Physical address of the first memory map record. Gated by bit 6.
    pub mmap_addr: u32,
    /// Size of the BIOS drive info region in bytes. Gated by bit 7.
    pub drives_length: u32,
    /// Physical address of the BIOS drive info region. Gated by bit 7.
    pub drives_addr: u32,
    /// Physical address of the ROM configuration table. Gated by bit 8.
    pub config_table: u32,
    /// Physical address of the loader's NUL-terminated name. Gated by bit 9.
    pub boot_loader_name: u32,
    /// Physical address of the APM table. Gated by bit 10.
    pub apm_table: u32,
    /// Physical address of the VBE control info block. Gated by bit 11.
    pub vbe_control_info: u32,
    /// Physical address of the VBE mode info block. Gated by bit 11.
    pub vbe_mode_info: u32,
    /// Current VBE mode number. Gated by bit 11.
    pub vbe_mode: u16,
    /// VBE 3.0 protected-mode interface segment. Gated by bit 11.
    pub vbe_interface_seg: u16,
    /// VBE 3.0 protected-mode interface offset. Gated by bit 11.
    pub vbe_interface_off: u16,
    /// VBE 3.0 protected-mode interface length. Gated by bit 11.
    pub vbe_interface_len: u16,
}

impl RawBootInfo {
    /// An all-zero block: no flag set, every field ungated.
    #[must_use]
    pub const fn zeroed() -> Self {
        Self {
            flags: 0,
            mem_lower: 0,
            mem_upper: 0,
            boot_device: 0,
            cmdline: 0,
            mods_count: 0,
            mods_addr: 0,
            syms: [0; 4],
            mmap_length: 0,
            mmap_addr: 0,
            drives_length: 0,
            drives_addr: 0,
            config_table: 0,
            boot_loader_name: 0,
            apm_table: 0,
            vbe_control_info: 0,
            vbe_mode_info: 0,
            vbe_mode: 0,
            vbe_interface_seg: 0,
            vbe_interface_off: 0,
            vbe_interface_len: 0,
        }
    }
}

/// One record of the module list: 16 bytes, `mods_count` of them in a
/// row at `mods_addr`.
#[repr(C)]
#[derive(Copy, Clone)]
pub struct RawModuleEntry {
    /// Physical address of the first byte of the module.
    pub mod_start: u32,
    /// Physical address one past the last byte of the module.
    pub mod_end: u32,
    /// Physical address of the module's NUL-terminated tag string,
    /// or zero if the loader supplied none.
    pub string: u32,
    /// Always zero; reserved by the loader.
    pub reserved: u32,
}

/// Size of one module record in bytes.
pub(crate) const MODULE_ENTRY_BYTES: u64 = 16;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn block_layout_is_the_multiboot_wire_size() {
        // flags through apm_table: 18 u32 words, then 2 u32 + 4 u16 of VBE.
        assert_eq!(core::mem::size_of::<RawBootInfo>(), 88);
        assert_eq!(core::mem::size_of::<RawModuleEntry>(), 16);
        assert_eq!(core::mem::offset_of!(RawBootInfo, mmap_length), 44);
        assert_eq!(core::mem::offset_of!(RawBootInfo, vbe_mode), 80);
    }
}
