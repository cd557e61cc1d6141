//! # Boot-Time Error Taxonomy
//!
//! Two severities, matching the two trust boundaries of the handoff:
//!
//! * [`BootError`] — the entry gate rejected the handoff outright.
//!   Fatal; no service exists yet that could recover, so the caller's
//!   only options are a diagnostic and a halt.
//! * [`ParseError`] — a single flag-gated field or record failed to
//!   parse. Local by design: a corrupt memory map must not prevent
//!   reading the command line, and one bad module entry must not
//!   discard the others.

/// Rejection of the two boot words before anything is dereferenced.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum BootError {
    /// The loader did not leave the Multiboot magic in the register,
    /// so neither boot word can be trusted.
    #[error("bootloader magic {0:#010x} is not the Multiboot handoff value")]
    BadMagic(u32),

    /// The information block address is zero.
    #[error("bootloader passed a null information block pointer")]
    NullInfoPointer,
}

/// Failure of a single flag-gated field or variable-length record.
///
/// These never abort unrelated fields; each accessor reports its own.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// A loader-supplied string is not NUL-terminated within the scan
    /// bound, or is not valid UTF-8.
    #[error("loader string is unterminated or not valid UTF-8")]
    MalformedString,

    /// A module record violates `start <= end`. Only this record is
    /// lost; iteration continues with the next one.
    #[error("module entry {index} has start above end")]
    MalformedModuleEntry {
        /// Position of the bad record within the module list.
        index: u32,
    },

    /// A memory map record's self-declared size would read past the
    /// advertised `mmap_length` span (or cannot hold the fixed
    /// fields). The walk stops at this record.
    #[error("memory map record extends past the advertised map length")]
    TruncatedMemoryMap,
}
