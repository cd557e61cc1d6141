//! # Kernel Entry Point
//!
//! The first kernel code to run after a Multiboot loader jumps in, and
//! the platform adapter the handoff contract leaves outside its core:
//! the loader places the magic in `EAX` and the information block
//! address in `EBX`, and [`_start`] does nothing but carry those two
//! words into the SysV argument registers, install a stack, and enter
//! Rust.
//!
//! From there the path is fixed: bring up the console logger, run the
//! entry gate, and either report the rejected handoff and halt, or walk
//! the validated boot information and log it for the initialization
//! stages that follow.

#![cfg_attr(not(test), no_std)]
#![allow(unsafe_code)]

use kernel_multiboot::{BootInfo, MemoryRegionKind, PhysMapper, SymbolInfo};
use log::{info, warn};

#[cfg(all(target_arch = "x86_64", not(test)))]
mod entry {
    use kernel_console::ConsoleLogger;
    use kernel_console::vga_fmt::console_clear;
    use kernel_multiboot::{BootInfo, IdentityMapper, validate};
    use log::LevelFilter;
    use log::error;

    #[panic_handler]
    fn panic(info: &core::panic::PanicInfo) -> ! {
        kernel_console::console_print!("panic: {info}\n");
        halt()
    }

    /// Boot stack size.
    const BOOT_STACK_SIZE: usize = 64 * 1024;

    /// 16-byte aligned stack.
    #[repr(align(16))]
    struct Aligned<const N: usize>([u8; N]);

    #[unsafe(link_section = ".bss.boot")]
    #[unsafe(no_mangle)]
    static mut BOOT_STACK: Aligned<BOOT_STACK_SIZE> = Aligned([0; BOOT_STACK_SIZE]);

    /// The kernel entry point.
    ///
    /// # Handoff
    /// Per the Multiboot convention the loader leaves the magic in
    /// `EAX` and the information block address in `EBX`; the boot shim
    /// preserves both across the switch to long mode. This stub is the
    /// whole architecture-specific surface of the handoff: it moves
    /// the two words into the SysV argument registers and nothing else
    /// interprets registers again.
    ///
    /// # Naked function & Stack
    /// Naked so the stack can be set up by hand: the loader's stack
    /// carries no guarantees, and letting the compiler emit a prologue
    /// against it would be UB waiting to happen.
    #[unsafe(no_mangle)]
    #[unsafe(naked)]
    pub extern "C" fn _start() -> ! {
        core::arch::naked_asm!(
            "cli",
            // Multiboot handoff registers into the SysV argument registers.
            "mov edi, eax",
            "mov esi, ebx",
            // Build the kernel stack and a valid call frame.
            "lea rax, [rip + {stack_sym}]",
            "add rax, {stack_size}",
            "and rax, -16",
            "mov rsp, rax",
            // Emulate a CALL by pushing a dummy return address.
            "push 0",
            "xor rbp, rbp",
            "jmp {rust_entry}",
            stack_sym = sym BOOT_STACK,
            stack_size = const BOOT_STACK_SIZE,
            rust_entry = sym kernel_entry,
        );
    }

    /// Kernel entry running on the kernel's own stack.
    ///
    /// # Notes
    /// * `no_mangle` so [`_start`] can jump to it by name.
    /// * C ABI for a defined convention when coming in from assembly;
    ///   `EDI` holds the magic, `ESI` (zero-extended) the block address.
    #[unsafe(no_mangle)]
    extern "C" fn kernel_entry(magic: u32, address: u64) -> ! {
        console_clear();
        let _ = ConsoleLogger::new(LevelFilter::Info).init();

        match validate(magic, address) {
            Ok(validated) => {
                // SAFETY: the loader's identity map is still installed,
                // so the block and everything its gated fields point at
                // are readable at their physical addresses.
                let info = unsafe { BootInfo::new(validated, IdentityMapper) };
                crate::boot_report(&info);
                // Later initialization stages take over from here.
                halt()
            }
            Err(e) => {
                // Fatal: nothing below this layer can recover.
                error!("boot handoff rejected: {e}");
                halt()
            }
        }
    }

    pub fn halt() -> ! {
        loop {
            core::hint::spin_loop();
        }
    }
}

/// Log everything the loader handed over.
///
/// One line per gated field, walking both variable-length sections;
/// parse failures are logged where they occur and the walk goes on,
/// since a failure in one field says nothing about the others.
pub fn boot_report<M: PhysMapper>(info: &BootInfo<'_, M>) {
    info!("Multiboot flags: {:#014b}", info.flags().into_bits());

    if let Some(memory) = info.memory_summary() {
        info!(
            "legacy memory: {} KiB low, {} KiB high",
            memory.lower_kib, memory.upper_kib
        );
    }

    if let Some(device) = info.boot_device() {
        info!(
            "boot device: drive {:#04x}, partitions {:?}",
            device.drive, device.partitions
        );
    }

    match info.command_line() {
        Some(Ok(cmdline)) => info!("command line: {cmdline:?}"),
        Some(Err(e)) => warn!("command line unreadable: {e}"),
        None => {}
    }

    match info.loader_name() {
        Some(Ok(name)) => info!("loaded by: {name}"),
        Some(Err(e)) => warn!("loader name unreadable: {e}"),
        None => {}
    }

    if let Some(modules) = info.modules() {
        for module in modules {
            match module {
                Ok(module) => info!(
                    "module {}..{} ({} bytes): {}",
                    module.start,
                    module.end,
                    module.len(),
                    module.string.unwrap_or("<untagged>")
                ),
                Err(e) => warn!("skipping module: {e}"),
            }
        }
    }

    if let Some(map) = info.memory_map() {
        let mut usable: u64 = 0;
        for region in map {
            match region {
                Ok(region) => {
                    if region.kind == MemoryRegionKind::Usable {
                        usable += region.length;
                    }
                    info!(
                        "memory region {} + {:#x} bytes, {:?}",
                        region.base, region.length, region.kind
                    );
                }
                Err(e) => warn!("memory map cut short: {e}"),
            }
        }
        info!("usable memory: {} KiB", usable / 1024);
    }

    match info.symbols() {
        Some(SymbolInfo::Aout(aout)) => {
            info!("a.out symbols at {}, {} bytes", aout.addr, aout.tabsize);
        }
        Some(SymbolInfo::Elf(elf)) => {
            info!(
                "ELF sections at {}: {} headers of {} bytes",
                elf.addr, elf.num, elf.entry_size
            );
        }
        None => {}
    }

    if let Some(drives) = info.drives() {
        info!("drive info: {} + {} bytes", drives.addr, drives.length);
    }
    if let Some(config) = info.config_table() {
        info!("ROM config table at {config}");
    }
    if let Some(apm) = info.apm_table() {
        info!("APM table at {apm}");
    }
    if let Some(vbe) = info.vbe() {
        info!(
            "VBE mode {:#06x}, control info at {}, mode info at {}",
            vbe.mode, vbe.control_info, vbe.mode_info
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use kernel_multiboot::{BOOT_MAGIC, IdentityMapper, RawBootInfo, validate};

    #[test]
    fn boot_report_tolerates_a_block_with_nothing_gated_in() {
        let mut raw = RawBootInfo::zeroed();
        // Garbage in ungated storage must not be read, let alone chased.
        raw.cmdline = 0xdead_0000;
        raw.mods_addr = 0xdead_1000;
        raw.mods_count = 9999;
        raw.mmap_addr = 0xdead_2000;
        raw.mmap_length = 0xffff_ffff;

        let address = core::ptr::from_ref(&raw) as u64;
        let validated = validate(BOOT_MAGIC, address).expect("live block");
        let info = unsafe { BootInfo::new(validated, IdentityMapper) };
        boot_report(&info);
    }
}
