//! Terminal output facade.
//!
//! Wraps the caller-supplied [`OutputSink`] and produces the only escape
//! sequences this crate emits: `ESC[nC` / `ESC[nD` cursor moves, `ESC[K`
//! erase-to-end, `\r` and the configured line ending. Repaints are batched
//! through a small stack buffer before they reach the sink.

use core::fmt::Write as _;

use heapless::String;

pub use urline_logger::OutputSink;

/// Renders `ESC[nC` (right) or `ESC[nD` (left) into `seq`, with the
/// distance clamped to 999. Offset 0 renders nothing.
pub fn move_cursor_seq(seq: &mut String<16>, offset: i32) {
    let n = offset.unsigned_abs().min(999);
    if n == 0 {
        return;
    }
    let dir = if offset < 0 { 'D' } else { 'C' };
    let _ = write!(seq, "\x1b[{}{}", n, dir);
}

// Stack buffer that batches repaint bytes before they hit the sink.
struct Batch<const PBL: usize> {
    buf: [u8; PBL],
    used: usize,
}

impl<const PBL: usize> Batch<PBL> {
    fn new() -> Self {
        Self {
            buf: [0; PBL],
            used: 0,
        }
    }

    fn put<W: OutputSink>(&mut self, out: &mut W, byte: u8) {
        if self.used == PBL {
            self.drain(out);
        }
        self.buf[self.used] = byte;
        self.used += 1;
    }

    fn put_slice<W: OutputSink>(&mut self, out: &mut W, bytes: &[u8]) {
        for &b in bytes {
            self.put(out, b);
        }
    }

    fn drain<W: OutputSink>(&mut self, out: &mut W) {
        if self.used > 0 {
            out.write_bytes(&self.buf[..self.used]);
            self.used = 0;
        }
    }
}

/// Terminal handle owned by the editor.
pub struct Terminal<W: OutputSink> {
    out: W,
}

impl<W: OutputSink> Terminal<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Read access to the underlying sink.
    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Mutable access to the underlying sink, for direct writes.
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.out.write_str(s);
    }

    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.out.write_bytes(bytes);
    }

    #[inline]
    pub fn flush(&mut self) {
        self.out.flush();
    }

    /// Moves the terminal cursor `offset` columns (positive = right).
    pub fn move_cursor(&mut self, offset: i32) {
        if offset == 0 {
            return;
        }
        let mut seq = String::<16>::new();
        move_cursor_seq(&mut seq, offset);
        self.out.write_str(seq.as_str());
    }

    /// Repaints `line[start..]`, mapping 0x00 separators back to spaces and
    /// masking everything from `mask_from` on with `*`. Emits `ESC[K` after
    /// the text and finally repositions the terminal cursor at `cursor`.
    ///
    /// With `reset`, the cursor is first parked at column
    /// `prompt_width + start`: a single `\r` plus a right move by default,
    /// or a large left move then a right move when the terminal would treat
    /// `\r` as a line feed (`carriage-return` feature disabled). The left
    /// move spans `line_cap` columns past the prompt to be safe at any
    /// position.
    #[allow(unused_variables)]
    pub fn print_line<const PBL: usize>(
        &mut self,
        line: &[u8],
        cursor: usize,
        start: usize,
        reset: bool,
        prompt_width: usize,
        mask_from: Option<usize>,
        line_cap: usize,
    ) {
        debug_assert!(PBL >= 16);
        let mut batch = Batch::<PBL>::new();

        if reset {
            #[cfg(feature = "carriage-return")]
            {
                batch.put(&mut self.out, b'\r');
                let mut seq = String::<16>::new();
                move_cursor_seq(&mut seq, (prompt_width + start) as i32);
                batch.put_slice(&mut self.out, seq.as_bytes());
            }
            #[cfg(not(feature = "carriage-return"))]
            {
                let mut seq = String::<16>::new();
                move_cursor_seq(&mut seq, -((line_cap + prompt_width + 2) as i32));
                batch.put_slice(&mut self.out, seq.as_bytes());
                let mut seq = String::<16>::new();
                move_cursor_seq(&mut seq, (prompt_width + start) as i32);
                batch.put_slice(&mut self.out, seq.as_bytes());
            }
        }

        for (i, &b) in line.iter().enumerate().skip(start) {
            let mut ch = if b == 0 { b' ' } else { b };
            if mask_from.is_some_and(|m| i >= m) {
                ch = b'*';
            }
            batch.put(&mut self.out, ch);
        }

        batch.put_slice(&mut self.out, b"\x1b[K");
        let mut seq = String::<16>::new();
        move_cursor_seq(&mut seq, cursor as i32 - line.len() as i32);
        batch.put_slice(&mut self.out, seq.as_bytes());
        batch.drain(&mut self.out);
        self.out.flush();
    }
}

// ============================================================================
// Hosted platform pieces (stdout sink + terminal raw mode)
// ============================================================================

/// Sink writing straight to stdout.
#[cfg(feature = "hosted")]
pub struct StdoutSink;

#[cfg(feature = "hosted")]
impl OutputSink for StdoutSink {
    fn write_str(&mut self, s: &str) {
        use std::io::Write;
        let _ = std::io::stdout().write_all(s.as_bytes());
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        use std::io::Write;
        let _ = std::io::stdout().write_all(bytes);
    }

    fn flush(&mut self) {
        use std::io::Write;
        let _ = std::io::stdout().flush();
    }
}

/// Puts the terminal into raw mode (no canonical buffering, no echo) and
/// restores the original mode on drop.
///
/// # Panics
/// Panics if the terminal or console mode cannot be read or changed.
#[cfg(feature = "hosted")]
pub struct RawMode {
    #[cfg(not(windows))]
    original: termios::Termios,
    #[cfg(windows)]
    original_mode: u32,
}

#[cfg(feature = "hosted")]
impl RawMode {
    /// Enables raw mode. On Unix, `fd` is the terminal file descriptor
    /// (usually 0 for stdin); on Windows the argument is ignored.
    #[cfg(not(windows))]
    pub fn new(fd: i32) -> Self {
        use termios::*;
        let original = Termios::from_fd(fd).unwrap();
        let mut raw = original;
        raw.c_lflag &= !(ICANON | ECHO);
        tcsetattr(fd, TCSANOW, &raw).unwrap();
        RawMode { original }
    }

    #[cfg(windows)]
    pub fn new(_: i32) -> Self {
        use winapi::um::{
            consoleapi::{GetConsoleMode, SetConsoleMode},
            handleapi::INVALID_HANDLE_VALUE,
            processenv::GetStdHandle,
            winbase::STD_INPUT_HANDLE,
            wincon::{ENABLE_ECHO_INPUT, ENABLE_LINE_INPUT},
        };
        unsafe {
            let handle = GetStdHandle(STD_INPUT_HANDLE);
            assert!(handle != INVALID_HANDLE_VALUE);
            let mut mode = 0;
            assert!(GetConsoleMode(handle, &mut mode) != 0, "GetConsoleMode failed");
            let original_mode = mode;
            mode &= !(ENABLE_LINE_INPUT | ENABLE_ECHO_INPUT);
            assert!(SetConsoleMode(handle, mode) != 0, "SetConsoleMode failed");
            RawMode { original_mode }
        }
    }
}

#[cfg(feature = "hosted")]
impl Drop for RawMode {
    #[cfg(not(windows))]
    fn drop(&mut self) {
        use termios::*;
        let _ = tcsetattr(0, TCSANOW, &self.original);
    }

    #[cfg(windows)]
    fn drop(&mut self) {
        use winapi::um::consoleapi::SetConsoleMode;
        use winapi::um::processenv::GetStdHandle;
        use winapi::um::winbase::STD_INPUT_HANDLE;
        unsafe {
            let handle = GetStdHandle(STD_INPUT_HANDLE);
            SetConsoleMode(handle, self.original_mode);
        }
    }
}

// ==================================================
// ==================== TESTS =======================
// ==================================================
