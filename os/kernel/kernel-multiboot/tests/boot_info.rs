//! Behavioral tests for the entry gate and the boot info view, run
//! against synthetic information blocks laid out in a host-memory
//! arena. "Physical" addresses are offsets into the arena and a
//! [`PhysMapper`] adds the arena base, the same shape a higher-half
//! direct map has in a real kernel.

use kernel_multiboot::{
    BOOT_MAGIC, BootInfo, MemoryRegionKind, ParseError, PhysAddr, PhysMapper, RawBootInfo,
    validate,
};

/// Backing store for one synthetic boot environment. 64 KiB of
/// zero-initialized, 8-byte-aligned memory.
struct Arena {
    buf: Box<[u64; 8192]>,
}

/// Translates arena offsets to host pointers.
#[derive(Copy, Clone)]
struct ArenaMapper {
    base: *const u8,
}

impl PhysMapper for ArenaMapper {
    unsafe fn phys_to_ref<'a, T>(&self, pa: PhysAddr) -> &'a T {
        unsafe { &*self.base.add(pa.as_u64() as usize).cast::<T>() }
    }

    unsafe fn phys_to_slice<'a>(&self, pa: PhysAddr, len: usize) -> &'a [u8] {
        unsafe { core::slice::from_raw_parts(self.base.add(pa.as_u64() as usize), len) }
    }
}

impl Arena {
    fn new() -> Self {
        Self {
            buf: Box::new([0; 8192]),
        }
    }

    fn mapper(&self) -> ArenaMapper {
        ArenaMapper {
            base: self.buf.as_ptr().cast(),
        }
    }

    fn write(&mut self, offset: usize, bytes: &[u8]) {
        let total = self.buf.len() * 8;
        assert!(offset + bytes.len() <= total, "arena overflow");
        let base = self.buf.as_mut_ptr().cast::<u8>();
        unsafe {
            core::ptr::copy_nonoverlapping(bytes.as_ptr(), base.add(offset), bytes.len());
        }
    }

    fn write_block(&mut self, offset: usize, raw: &RawBootInfo) {
        let bytes = unsafe {
            core::slice::from_raw_parts(
                core::ptr::from_ref(raw).cast::<u8>(),
                core::mem::size_of::<RawBootInfo>(),
            )
        };
        self.write(offset, bytes);
    }

    fn view(&self, block_offset: u64) -> BootInfo<'_, ArenaMapper> {
        let validated = validate(BOOT_MAGIC, block_offset).expect("gate accepts the handoff");
        unsafe { BootInfo::new(validated, self.mapper()) }
    }
}

/// Arena offsets used by the fixtures. The block itself sits at a
/// 4-aligned offset; the unterminated-string fixture gets a full page.
const BLOCK: usize = 0x100;
const CMDLINE: usize = 0x400;
const LOADER_NAME: usize = 0x500;
const MODULES: usize = 0x600;
const MODULE_STR_A: usize = 0x700;
const MODULE_STR_B: usize = 0x740;
const MMAP: usize = 0x800;
const UNTERMINATED: usize = 0x2000;

/// One memory map record: size prefix, base, length, type code, plus
/// `declared - 20` bytes of padding for oversized records.
fn mmap_record(declared: u32, base: u64, length: u64, kind: u32) -> Vec<u8> {
    let mut record = declared.to_le_bytes().to_vec();
    record.extend_from_slice(&base.to_le_bytes());
    record.extend_from_slice(&length.to_le_bytes());
    record.extend_from_slice(&kind.to_le_bytes());
    record.resize(4 + declared as usize, 0);
    record
}

/// A module list record.
fn module_record(start: u32, end: u32, string: u32) -> Vec<u8> {
    let mut record = start.to_le_bytes().to_vec();
    record.extend_from_slice(&end.to_le_bytes());
    record.extend_from_slice(&string.to_le_bytes());
    record.extend_from_slice(&0u32.to_le_bytes());
    record
}

#[test]
fn round_trip_reads_back_every_gated_field() {
    let mut arena = Arena::new();
    arena.write(CMDLINE, b"root=/dev/ram0 quiet\0");
    arena.write(LOADER_NAME, b"GNU GRUB 0.97\0");

    let mut raw = RawBootInfo::zeroed();
    raw.flags = (1 << 0) | (1 << 1) | (1 << 2) | (1 << 9);
    raw.mem_lower = 640;
    raw.mem_upper = 64512;
    raw.boot_device = 0x8000_ffff;
    raw.cmdline = CMDLINE as u32;
    raw.boot_loader_name = LOADER_NAME as u32;
    arena.write_block(BLOCK, &raw);

    let info = arena.view(BLOCK as u64);

    // Idempotent: the lens is stateless, so ask everything twice.
    for _ in 0..2 {
        let memory = info.memory_summary().expect("bit 0 gated in");
        assert_eq!(memory.lower_kib, 640);
        assert_eq!(memory.upper_kib, 64512);

        let device = info.boot_device().expect("bit 1 gated in");
        assert_eq!(device.drive, 0x80);
        assert_eq!(device.partitions[0], 0x00);

        let cmdline = info.command_line().expect("bit 2 gated in");
        assert_eq!(cmdline, Ok("root=/dev/ram0 quiet"));

        let name = info.loader_name().expect("bit 9 gated in");
        assert_eq!(name, Ok("GNU GRUB 0.97"));

        // Everything ungated stays invisible.
        assert!(info.modules().is_none());
        assert!(info.symbols().is_none());
        assert!(info.memory_map().is_none());
        assert!(info.drives().is_none());
        assert!(info.config_table().is_none());
        assert!(info.apm_table().is_none());
        assert!(info.vbe().is_none());
    }
}

#[test]
fn memory_map_walk_yields_records_in_order_and_stops_at_the_boundary() {
    let mut arena = Arena::new();

    // Three records tiling the span exactly, the middle one oversized
    // (declares 4 trailing bytes the walker must skip, not interpret).
    let mut map = Vec::new();
    map.extend(mmap_record(20, 0x0000_0000, 0x0009_fc00, 1));
    map.extend(mmap_record(24, 0x0009_fc00, 0x0000_0400, 2));
    map.extend(mmap_record(20, 0x0010_0000, 0x03f0_0000, 1));
    let length = map.len() as u32;
    arena.write(MMAP, &map);

    let mut raw = RawBootInfo::zeroed();
    raw.flags = 1 << 6;
    raw.mmap_addr = MMAP as u32;
    raw.mmap_length = length;
    arena.write_block(BLOCK, &raw);

    let info = arena.view(BLOCK as u64);
    let entries: Vec<_> = info
        .memory_map()
        .expect("bit 6 gated in")
        .collect::<Result<_, _>>()
        .expect("exact tiling walks without error");

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].base.as_u64(), 0);
    assert_eq!(entries[0].length, 0x0009_fc00);
    assert_eq!(entries[0].kind, MemoryRegionKind::Usable);
    assert_eq!(entries[1].base.as_u64(), 0x0009_fc00);
    assert_eq!(entries[1].kind, MemoryRegionKind::Reserved);
    assert_eq!(entries[2].base.as_u64(), 0x0010_0000);
    assert_eq!(entries[2].kind, MemoryRegionKind::Usable);

    // Restartable: a second walk sees the same records.
    let again: Vec<_> = info
        .memory_map()
        .expect("still gated in")
        .collect::<Result<_, _>>()
        .expect("still no error");
    assert_eq!(again, entries);
}

#[test]
fn memory_map_record_crossing_the_span_reports_truncation() {
    let mut arena = Arena::new();

    // Two good records, then one whose declared size reaches past the
    // advertised length.
    let mut map = Vec::new();
    map.extend(mmap_record(20, 0x0000_0000, 0x0009_fc00, 1));
    map.extend(mmap_record(20, 0x0010_0000, 0x0100_0000, 1));
    let length = (map.len() + 12) as u32; // 12 bytes left, record wants 24
    map.extend(&20u32.to_le_bytes());
    map.extend([0u8; 8]);
    arena.write(MMAP, &map);

    let mut raw = RawBootInfo::zeroed();
    raw.flags = 1 << 6;
    raw.mmap_addr = MMAP as u32;
    raw.mmap_length = length;
    arena.write_block(BLOCK, &raw);

    let info = arena.view(BLOCK as u64);
    let mut walk = info.memory_map().expect("bit 6 gated in");

    assert!(walk.next().expect("first record").is_ok());
    assert!(walk.next().expect("second record").is_ok());
    assert_eq!(walk.next(), Some(Err(ParseError::TruncatedMemoryMap)));
    // Fused after truncation: nothing past a lying size prefix.
    assert_eq!(walk.next(), None);
}

#[test]
fn one_malformed_module_does_not_discard_its_neighbors() {
    let mut arena = Arena::new();
    arena.write(MODULE_STR_A, b"initrd.img\0");
    arena.write(MODULE_STR_B, b"keymap=us\0");

    let mut list = Vec::new();
    list.extend(module_record(0x0030_0000, 0x0040_0000, MODULE_STR_A as u32));
    list.extend(module_record(0x0060_0000, 0x0050_0000, 0)); // start > end
    list.extend(module_record(0x0070_0000, 0x0070_8000, MODULE_STR_B as u32));
    arena.write(MODULES, &list);

    let mut raw = RawBootInfo::zeroed();
    raw.flags = 1 << 3;
    raw.mods_addr = MODULES as u32;
    raw.mods_count = 3;
    arena.write_block(BLOCK, &raw);

    let info = arena.view(BLOCK as u64);
    let mut modules = info.modules().expect("bit 3 gated in");
    assert_eq!(modules.len(), 3);

    let first = modules.next().expect("entry 0").expect("entry 0 is intact");
    assert_eq!(first.start.as_u64(), 0x0030_0000);
    assert_eq!(first.end.as_u64(), 0x0040_0000);
    assert_eq!(first.len(), 0x0010_0000);
    assert_eq!(first.string, Some("initrd.img"));

    assert_eq!(
        modules.next(),
        Some(Err(ParseError::MalformedModuleEntry { index: 1 }))
    );

    let third = modules.next().expect("entry 2").expect("entry 2 is intact");
    assert_eq!(third.start.as_u64(), 0x0070_0000);
    assert_eq!(third.string, Some("keymap=us"));

    assert_eq!(modules.next(), None);
}

#[test]
fn unterminated_command_line_fails_locally() {
    let mut arena = Arena::new();
    // A page of printable bytes with no terminator anywhere in bound.
    arena.write(UNTERMINATED, &[b'a'; 4096]);

    let mut raw = RawBootInfo::zeroed();
    raw.flags = (1 << 0) | (1 << 2);
    raw.mem_lower = 640;
    raw.mem_upper = 31744;
    raw.cmdline = UNTERMINATED as u32;
    arena.write_block(BLOCK, &raw);

    let info = arena.view(BLOCK as u64);
    assert_eq!(
        info.command_line(),
        Some(Err(ParseError::MalformedString))
    );

    // The bad string is local: the memory summary still reads fine.
    let memory = info.memory_summary().expect("bit 0 gated in");
    assert_eq!(memory.lower_kib, 640);
}

#[test]
fn non_utf8_loader_name_fails_locally() {
    let mut arena = Arena::new();
    arena.write(LOADER_NAME, &[0xff, 0xfe, 0x80, 0x00]);

    let mut raw = RawBootInfo::zeroed();
    raw.flags = 1 << 9;
    raw.boot_loader_name = LOADER_NAME as u32;
    arena.write_block(BLOCK, &raw);

    let info = arena.view(BLOCK as u64);
    assert_eq!(
        info.loader_name(),
        Some(Err(ParseError::MalformedString))
    );
}

#[test]
fn empty_memory_map_and_empty_module_list_walk_cleanly() {
    let mut arena = Arena::new();

    let mut raw = RawBootInfo::zeroed();
    raw.flags = (1 << 3) | (1 << 6);
    raw.mods_addr = MODULES as u32;
    raw.mods_count = 0;
    raw.mmap_addr = MMAP as u32;
    raw.mmap_length = 0;
    arena.write_block(BLOCK, &raw);

    let info = arena.view(BLOCK as u64);
    assert_eq!(info.modules().expect("gated in").count(), 0);
    assert_eq!(info.memory_map().expect("gated in").count(), 0);
}
