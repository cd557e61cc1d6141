//! # Entry Gate
//!
//! First decision the kernel makes: whether the two machine words the
//! bootloader handed over can be trusted at all. How those words arrive
//! (EAX/EBX under the Multiboot convention) is the platform adapter's
//! business; by the time they reach [`validate`] they are plain values.
//!
//! Validation is pure. Nothing is dereferenced here, and failure is
//! fatal by definition: no service exists yet that could recover, so
//! the caller emits whatever diagnostic the platform allows and halts.

use crate::{BootError, PhysAddr};

/// The register value a Multiboot-compliant loader leaves behind to
/// prove it followed the handoff convention.
pub const BOOT_MAGIC: u32 = 0x2BAD_B002;

/// A physical address that passed the entry gate.
///
/// This is the only value from which a [`BootInfo`](crate::BootInfo)
/// view can be constructed, which makes [`validate`] the single place
/// in the whole boot path where an untyped address becomes a typed
/// structure.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ValidatedAddress(PhysAddr);

impl ValidatedAddress {
    /// The validated start address of the information block.
    #[must_use]
    pub const fn as_phys(self) -> PhysAddr {
        self.0
    }
}

/// Gate the raw boot words.
///
/// The address is checked before the magic so a null info pointer
/// always reports as [`BootError::NullInfoPointer`], whatever garbage
/// the magic register holds.
///
/// # Errors
/// [`BootError::NullInfoPointer`] if `address` is zero,
/// [`BootError::BadMagic`] if `magic` is not [`BOOT_MAGIC`].
pub fn validate(magic: u32, address: u64) -> Result<ValidatedAddress, BootError> {
    if address == 0 {
        return Err(BootError::NullInfoPointer);
    }
    if magic != BOOT_MAGIC {
        return Err(BootError::BadMagic(magic));
    }
    Ok(ValidatedAddress(PhysAddr::from_u64(address)))
}
