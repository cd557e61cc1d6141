//! # Early VGA Text-Mode Console
//!
//! Minimal diagnostic output for the stage of boot where nothing else
//! exists yet: no allocator, no interrupts, no driver model. The only
//! output channel the platform guarantees at that point is the legacy
//! text-mode buffer at physical `0xB8000`, so this crate writes there —
//! one cell word per character, scrolling in software.
//!
//! ## Components
//!
//! * [`screen`] — cell encoding, cursor movement, and scrolling over a
//!   borrowed cell array. Pure, and unit-tested on the host.
//! * [`vga_fmt`] — the memory-mapped sink: a [`core::fmt::Write`]
//!   implementation over the live buffer, used by [`console_print!`].
//! * [`ConsoleLogger`] — a [`log::Log`] implementation routing the
//!   standard logging macros to the sink, so the rest of the kernel
//!   logs with `info!`/`warn!`/`error!` from the first instruction on.
//!
//! ## Feature gating
//!
//! With the `enabled` feature off (for example on a headless target)
//! every output call compiles to a no-op and no buffer access remains.
//!
//! ## Concurrency contract
//!
//! This console serves the pre-interrupt, single-threaded boot path.
//! Cursor state lives in a static the way the logger registration does;
//! nothing here is safe to call once more than one context can run.

#![cfg_attr(not(test), no_std)]
#![allow(unsafe_code, clippy::inline_always)]

mod logger;
pub mod screen;

pub use logger::ConsoleLogger;

#[cfg(feature = "enabled")]
#[doc(hidden)]
pub mod vga_fmt {
    use crate::screen::{CELLS, Screen};
    use core::fmt::{self, Write};

    /// Physical address of the legacy text-mode buffer.
    const VGA_BUFFER: usize = 0xb8000;

    /// Cursor position between calls. Single-threaded boot context only.
    static mut CURSOR: usize = 0;

    /// Write a single byte to the text buffer.
    #[allow(static_mut_refs)]
    pub fn console_putc(byte: u8) {
        // SAFETY: the boot path is single-threaded and non-preemptible,
        // so the static cursor and the buffer have exactly one user.
        unsafe {
            let cells = &mut *(VGA_BUFFER as *mut [u16; CELLS]);
            let mut screen = Screen::new(cells, CURSOR);
            screen.put(byte);
            CURSOR = screen.cursor();
        }
    }

    /// Blank the screen and home the cursor. Useful right at entry,
    /// before the first diagnostic line.
    #[allow(static_mut_refs)]
    pub fn console_clear() {
        // SAFETY: see `console_putc`.
        unsafe {
            let cells = &mut *(VGA_BUFFER as *mut [u16; CELLS]);
            let mut screen = Screen::new(cells, CURSOR);
            screen.clear();
            CURSOR = screen.cursor();
        }
    }

    /// The text buffer as a format sink.
    pub struct VgaSink;

    impl Write for VgaSink {
        #[inline]
        fn write_str(&mut self, s: &str) -> fmt::Result {
            for byte in s.bytes() {
                console_putc(byte);
            }
            Ok(())
        }
    }

    #[doc(hidden)]
    pub fn console_write(args: fmt::Arguments) {
        // Ignore errors; this is best-effort diagnostic output.
        let _ = fmt::write(&mut VgaSink, args);
    }
}

#[cfg(not(feature = "enabled"))]
#[doc(hidden)]
pub mod vga_fmt {
    use core::fmt;

    #[doc(hidden)]
    #[inline(always)]
    pub fn console_write(_: fmt::Arguments) {
        // no-op when feature disabled
    }

    #[inline(always)]
    pub fn console_clear() {
        // no-op when feature disabled
    }
}

/// Print to the text-mode console without going through the logger.
#[macro_export]
macro_rules! console_print {
    ($($arg:tt)*) => {{
        // No allocation: `format_args!` builds a lightweight `Arguments`.
        $crate::vga_fmt::console_write(core::format_args!($($arg)*));
    }};
}
