//! # Multiboot Handoff Contract
//!
//! The structure a Multiboot (v1) bootloader passes to a freshly
//! started kernel, and the validation discipline the entry point
//! applies before trusting any field in it.
//!
//! This is the single place where the kernel crosses a trust boundary
//! with an external, loosely specified, versioned binary layout, under
//! constraints no ordinary code runs under: no heap, no verified memory
//! map, and one chance to get addressing right before any later
//! subsystem can initialize.
//!
//! ## The two components
//!
//! Strictly sequential, no concurrency — this stage runs before
//! interrupts or schedulers exist:
//!
//! 1. **Entry gate** ([`validate`]): takes the two machine words the
//!    loader left behind (magic, info address) and decides whether to
//!    proceed. Pure; never dereferences. Its success value,
//!    [`ValidatedAddress`], is the only ticket into step 2.
//! 2. **Boot info view** ([`BootInfo`]): a stateless validating lens
//!    over the raw block. Exposes a field only when the block's
//!    [`flags`](InfoFlags) bitmap gates it in, and turns the two
//!    variable-length sections (memory map, module list) into
//!    bounds-checked, fail-soft iterators.
//!
//! ```text
//! bootloader ─(magic, address)─▶ validate ─▶ ValidatedAddress
//!                                               │
//!                                               ▼
//!                      BootInfo ──▶ typed, gated fields ──▶ kernel init
//! ```
//!
//! ## Failure model
//!
//! [`BootError`] is fatal: before the gate passes there is nothing to
//! fall back to, so the caller prints what it can and halts.
//! [`ParseError`] is local: one corrupt field or record never takes the
//! others with it.
//!
//! ## Memory model
//!
//! The view owns nothing. It borrows read-only, loader-owned physical
//! memory through a [`PhysMapper`], and everything it yields is valid
//! only until the kernel reclaims that physical range — copy out what
//! must survive.

#![cfg_attr(not(test), no_std)]
#![allow(unsafe_code)]

mod addresses;
mod entry;
mod error;
mod flags;
mod info;
mod mmap;
mod modules;
mod phys;
mod raw;
mod strings;

pub use addresses::PhysAddr;
pub use entry::{BOOT_MAGIC, ValidatedAddress, validate};
pub use error::{BootError, ParseError};
pub use flags::InfoFlags;
pub use info::{
    AoutSymbols, BootDevice, BootInfo, DrivesRegion, ElfSections, MemorySummary, SymbolInfo,
    VbeInfo,
};
pub use mmap::{MemoryMap, MemoryMapEntry, MemoryRegionKind};
pub use modules::{ModuleEntry, Modules};
pub use phys::{IdentityMapper, PhysMapper};
pub use raw::{RawBootInfo, RawModuleEntry};
pub use strings::MAX_STRING_LEN;
