//! urline - micro read-line engine for small and embedded devices.
//!
//! Feed bytes from your UART interrupt (or any byte source) into
//! [`Editor::insert_byte`]; the editor maintains the command line, drives an
//! ANSI terminal through a caller-supplied [`OutputSink`], and hands finished
//! lines to the executor callback as a bounded set of token slices.
//!
//! Nothing here allocates. Buffers are sized by const generics; the defaults
//! match a small serial console.

#![no_std]

#[cfg(any(test, feature = "hosted"))]
extern crate std;

pub mod editor;
pub mod escape;
pub mod history;
pub mod line;
pub mod term;
pub mod token;

pub use editor::{Echo, Editor, Error, Hooks};
pub use term::Terminal;
#[cfg(feature = "hosted")]
pub use term::{RawMode, StdoutSink};

// The sink trait lives next to the logger so both write the same way.
pub use urline_logger::OutputSink;

/// Default prompt, green when the terminal supports color.
pub const PROMPT_DEFAULT: &str = "\x1b[32mIRin >\x1b[0m ";
/// Printable width of [`PROMPT_DEFAULT`] (escapes excluded).
pub const PROMPT_WIDTH_DEFAULT: usize = 7;
/// Default line ending.
pub const ENDL_DEFAULT: &str = "\n";
