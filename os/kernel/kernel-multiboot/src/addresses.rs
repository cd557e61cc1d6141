//! # Physical Addresses in the Boot Information Block
//!
//! Every pointer the bootloader leaves in the information block is a
//! *physical* address. The [`PhysAddr`] newtype keeps those values from
//! being mixed up with pointers of the kernel's own address space; the
//! only way to turn one into something dereferenceable is through a
//! [`PhysMapper`](crate::PhysMapper).

use core::ops::Add;

/// A **physical** memory address reported by the bootloader.
///
/// Newtype over `u64` to prevent mixing with virtual addresses.
/// No alignment guarantees by itself.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PhysAddr(u64);

impl PhysAddr {
    #[must_use]
    pub const fn from_u64(addr: u64) -> Self {
        Self(addr)
    }

    /// Widening constructor for the 32-bit pointer fields of the info block.
    #[must_use]
    pub const fn from_u32(addr: u32) -> Self {
        Self(addr as u64)
    }

    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl Add<u64> for PhysAddr {
    type Output = Self;

    fn add(self, rhs: u64) -> Self::Output {
        Self(self.0.checked_add(rhs).expect("PhysAddr add"))
    }
}

impl From<u64> for PhysAddr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl core::fmt::Display for PhysAddr {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "0x{:010x}", self.0)
    }
}

impl core::fmt::Debug for PhysAddr {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "0x{:010x} (@{} KiB)", self.0, self.0 / 1024)
    }
}
