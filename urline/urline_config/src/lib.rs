#![no_std]

/// Prompt shown before the editable line. May contain colour escapes, so the
/// printable width is configured separately below.
pub const PROMPT: &str = "\x1b[32mIRin >\x1b[0m ";
/// Printable width of `PROMPT` (text only, escapes excluded).
pub const PROMPT_WIDTH: usize = 7;
/// Line ending sent to the terminal. One of "\n", "\r", "\r\n", "\n\r".
pub const ENDL: &str = "\r\n";

/// Command line buffer size. One byte is reserved for the terminator, so at
/// most `CMDLINE_CAP - 1` characters fit on a line.
pub const CMDLINE_CAP: usize = 61;
/// Maximum tokens per command line.
pub const TOKEN_CAP: usize = 8;
/// Maximum quoted tokens per command line.
pub const QUOTED_TOKEN_CAP: usize = 2;
/// History ring buffer size in bytes. Must not exceed 256.
pub const HISTORY_CAP: usize = 64;
/// Stack buffer used to batch repaint output. Must be at least 16.
pub const PRINT_BUFFER_CAP: usize = 40;

/// Upper bound for a single formatted log line.
pub const LOG_LINE_MAX: usize = 256;
