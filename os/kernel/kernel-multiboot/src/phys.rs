//! # Physical Memory Access Seam
//!
//! The information block and the lists it points at live in *physical*
//! memory owned by the bootloader. How a physical address becomes a
//! dereferenceable pointer differs between environments: the early
//! kernel runs identity-mapped, a later kernel may use a higher-half
//! direct map, and the test suite backs "physical" addresses with
//! ordinary host allocations. The [`PhysMapper`] trait abstracts over
//! those strategies so the parsing code is written once.
//!
//! All reads performed by the boot-info view go through this seam in
//! bounded steps: the view computes how many bytes a structure is
//! allowed to cover *before* asking the mapper for them, so a malformed
//! or adversarial block can never cause a read outside its advertised
//! span.

use crate::PhysAddr;

/// Converts physical addresses to pointers in the current address space.
///
/// Read-only by contract: the boot information is owned by the
/// bootloader/firmware and the kernel must not mutate it.
pub trait PhysMapper {
    /// Borrow a `T` living at physical address `pa`.
    ///
    /// # Safety
    /// The caller must ensure `pa` is mapped, covers `size_of::<T>()`
    /// bytes of initialized memory, is aligned for `T`, and is not
    /// mutated for the duration of the borrow.
    unsafe fn phys_to_ref<'a, T>(&self, pa: PhysAddr) -> &'a T;

    /// Borrow `len` bytes starting at physical address `pa`.
    ///
    /// # Safety
    /// The caller must ensure the whole `[pa, pa + len)` range is
    /// mapped, initialized, and not mutated for the duration of the
    /// borrow.
    unsafe fn phys_to_slice<'a>(&self, pa: PhysAddr, len: usize) -> &'a [u8];
}

/// [`PhysMapper`] for the pre-paging boot environment, where physical
/// and virtual addresses coincide.
///
/// This is the mapper the entry path uses: Multiboot hands control
/// over with paging disabled (or the loader's identity map still
/// installed), so the block is reachable at its physical address.
#[derive(Copy, Clone, Default)]
pub struct IdentityMapper;

impl PhysMapper for IdentityMapper {
    unsafe fn phys_to_ref<'a, T>(&self, pa: PhysAddr) -> &'a T {
        let ptr = pa.as_u64() as usize as *const T;
        // SAFETY: caller guarantees the range is mapped and valid for T.
        unsafe { &*ptr }
    }

    unsafe fn phys_to_slice<'a>(&self, pa: PhysAddr, len: usize) -> &'a [u8] {
        let ptr = pa.as_u64() as usize as *const u8;
        // SAFETY: caller guarantees the whole range is mapped and initialized.
        unsafe { core::slice::from_raw_parts(ptr, len) }
    }
}
