//! The editor state machine.
//!
//! [`Editor::insert_byte`] is the single input entry point: it classifies
//! each byte as a control key, part of an escape sequence or a printable
//! insertion, updates the command line and issues the matching terminal
//! output. Completed lines are tokenized in place and handed to the
//! executor callback.
//!
//! Callbacks are plain function pointers and receive a [`Hooks`] view of
//! the editor (sink, prompt, echo mode, user data) instead of the editor
//! itself, so re-entering `insert_byte` from a callback is not expressible.

use heapless::Vec;

#[cfg(feature = "esc-seq")]
use crate::escape::{self, EscAction, EscState};
#[cfg(feature = "history")]
use crate::history::{HistDir, HistoryRing};
use crate::line::CmdLine;
use crate::term::{OutputSink, Terminal};
use crate::token::{self, QuoteLog};

// 7-bit ASCII control keys understood by the dispatcher.
const KEY_SOH: u8 = 0x01; // ^A  line start
const KEY_STX: u8 = 0x02; // ^B  cursor left
const KEY_ETX: u8 = 0x03; // ^C  interrupt
const KEY_EOT: u8 = 0x04; // ^D  delete forward
const KEY_ENQ: u8 = 0x05; // ^E  line end
const KEY_ACK: u8 = 0x06; // ^F  cursor right
const KEY_BS: u8 = 0x08; //  ^H  backspace
const KEY_HT: u8 = 0x09; //  Tab
const KEY_LF: u8 = 0x0A;
const KEY_VT: u8 = 0x0B; //  ^K  kill to end
const KEY_CR: u8 = 0x0D;
const KEY_SO: u8 = 0x0E; //  ^N  history down
const KEY_DLE: u8 = 0x10; // ^P  history up
const KEY_DC2: u8 = 0x12; // ^R  redraw line
const KEY_NAK: u8 = 0x15; // ^U  kill whole line
const KEY_ESC: u8 = 0x1B;
const KEY_DEL: u8 = 0x7F; // backspace on most terminals

#[cfg(feature = "quoting")]
const SPLIT_ERROR_MSG: &str = "ERROR:too many tokens or invalid quoting";
#[cfg(not(feature = "quoting"))]
const SPLIT_ERROR_MSG: &str = "ERROR:too many tokens";

/// Echo policy. The buffer always stores the real bytes; only the display
/// is affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Echo {
    /// Render typed bytes literally.
    On,
    /// Render nothing.
    Off,
    /// Render `*` until the next enter, then revert to `On`.
    Once,
}

/// Errors surfaced by the fallible entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The command line has no room for the requested insertion.
    Capacity,
}

/// Executor callback: receives the tokens of a completed line as read-only
/// byte slices into the command line. The return value is not consumed by
/// the editor.
pub type ExecuteFn<W, U> = fn(&mut Hooks<'_, W, U>, &[&[u8]]) -> i32;

/// Completion callback: receives the tokens left of the cursor (plus an
/// empty token when the cursor starts a new word) and returns candidate
/// strings. The candidate slice must outlive the call; command tables are
/// `'static` in practice.
pub type CompleteFn<W, U> = fn(&mut Hooks<'_, W, U>, &[&[u8]]) -> &'static [&'static str];

/// Ctrl+C callback.
pub type SigintFn<W, U> = fn(&mut Hooks<'_, W, U>);

/// What callbacks get to touch: the output sink, the prompt, the echo mode
/// and the caller's own state. Deliberately no way back into the editor's
/// input path.
pub struct Hooks<'e, W: OutputSink, U> {
    term: &'e mut Terminal<W>,
    prompt: &'e mut &'static str,
    prompt_width: &'e mut usize,
    echo: &'e mut Echo,
    user: &'e mut U,
}

impl<'e, W: OutputSink, U> Hooks<'e, W, U> {
    pub fn print(&mut self, s: &str) {
        self.term.write_str(s);
    }

    pub fn print_bytes(&mut self, bytes: &[u8]) {
        self.term.write_bytes(bytes);
    }

    pub fn user(&mut self) -> &mut U {
        self.user
    }

    /// Replaces the prompt; `width` is its printable width (escapes
    /// excluded).
    pub fn set_prompt(&mut self, prompt: &'static str, width: usize) {
        *self.prompt = prompt;
        *self.prompt_width = width;
    }

    /// Changes the echo policy, e.g. `Echo::Once` before reading a password.
    pub fn set_echo(&mut self, echo: Echo) {
        *self.echo = echo;
    }
}

/// The line-editor instance.
///
/// # Type Parameters
/// - `W`: output sink driving the terminal.
/// - `U`: caller state handed to callbacks through [`Hooks`].
/// - `CMD`: command line capacity (one byte reserved for the terminator).
/// - `TOK`: maximum tokens per line.
/// - `QTE`: maximum quoted spans per line.
/// - `HST`: history ring capacity in bytes, at most 256.
/// - `PBL`: repaint batch buffer size, at least 16.
pub struct Editor<
    W: OutputSink,
    U = (),
    const CMD: usize = 61,
    const TOK: usize = 8,
    const QTE: usize = 2,
    const HST: usize = 64,
    const PBL: usize = 40,
> {
    term: Terminal<W>,
    line: CmdLine<CMD>,
    quotes: QuoteLog<QTE>,
    #[cfg(feature = "history")]
    hist: HistoryRing<HST>,
    #[cfg(feature = "esc-seq")]
    esc: EscState,
    /// 0, or the CR/LF byte that just triggered a newline (for coalescing
    /// CRLF and LFCR pairs into one enter).
    last_endl: u8,
    echo: Echo,
    /// Column from which `*` masking applies under `Echo::Once`.
    password_from: Option<usize>,
    prompt: &'static str,
    prompt_width: usize,
    endl: &'static str,
    execute: Option<ExecuteFn<W, U>>,
    #[cfg(feature = "complete")]
    complete: Option<CompleteFn<W, U>>,
    #[cfg(feature = "ctrl-c")]
    sigint: Option<SigintFn<W, U>>,
    user: U,
}

impl<
        W: OutputSink,
        U,
        const CMD: usize,
        const TOK: usize,
        const QTE: usize,
        const HST: usize,
        const PBL: usize,
    > Editor<W, U, CMD, TOK, QTE, HST, PBL>
{
    /// Creates an editor writing to `sink`, with echo on and the default
    /// prompt. With the `init-prompt` feature the prompt is printed right
    /// away; otherwise the first prompt appears after the first enter.
    pub fn new(sink: W, user: U) -> Self {
        #[allow(unused_mut)]
        let mut ed = Self {
            term: Terminal::new(sink),
            line: CmdLine::new(),
            quotes: QuoteLog::new(),
            #[cfg(feature = "history")]
            hist: HistoryRing::new(),
            #[cfg(feature = "esc-seq")]
            esc: EscState::Inactive,
            last_endl: 0,
            echo: Echo::On,
            password_from: None,
            prompt: crate::PROMPT_DEFAULT,
            prompt_width: crate::PROMPT_WIDTH_DEFAULT,
            endl: crate::ENDL_DEFAULT,
            execute: None,
            #[cfg(feature = "complete")]
            complete: None,
            #[cfg(feature = "ctrl-c")]
            sigint: None,
            user,
        };
        #[cfg(feature = "init-prompt")]
        {
            let prompt = ed.prompt;
            ed.term.write_str(prompt);
            ed.term.flush();
        }
        ed
    }

    /// Installs the executor called on every completed non-empty line.
    pub fn set_execute(&mut self, execute: ExecuteFn<W, U>) {
        self.execute = Some(execute);
    }

    /// Installs the completion callback run on Tab. Without one, Tab does
    /// nothing.
    #[cfg(feature = "complete")]
    pub fn set_complete(&mut self, complete: CompleteFn<W, U>) {
        self.complete = Some(complete);
    }

    /// Installs the Ctrl+C callback.
    #[cfg(feature = "ctrl-c")]
    pub fn set_sigint(&mut self, sigint: SigintFn<W, U>) {
        self.sigint = Some(sigint);
    }

    /// Sets the echo policy. `Echo::Once` masks input with `*` until the
    /// next enter, then reverts to `Echo::On`.
    pub fn set_echo(&mut self, echo: Echo) {
        self.echo = echo;
    }

    /// Replaces the prompt string and its printable width.
    pub fn set_prompt(&mut self, prompt: &'static str, width: usize) {
        self.prompt = prompt;
        self.prompt_width = width;
    }

    /// Sets the line ending: "\n", "\r", "\r\n" or "\n\r".
    pub fn set_endl(&mut self, endl: &'static str) {
        self.endl = endl;
    }

    /// The current line, separators encoded as 0x00.
    pub fn line_bytes(&self) -> &[u8] {
        self.line.bytes()
    }

    pub fn cursor(&self) -> usize {
        self.line.cursor()
    }

    pub fn writer(&self) -> &W {
        self.term.writer()
    }

    pub fn writer_mut(&mut self) -> &mut W {
        self.term.writer_mut()
    }

    pub fn user(&self) -> &U {
        &self.user
    }

    pub fn user_mut(&mut self) -> &mut U {
        &mut self.user
    }

    /// Drains the sink, for interactive front ends that buffer output.
    pub fn flush(&mut self) {
        self.term.flush();
    }

    /// Inserts `text` at the cursor, shifting the tail right. Spaces are
    /// stored as 0x00 separators. Fails without side effects when the line
    /// would exceed its capacity.
    pub fn insert_text(&mut self, text: &[u8]) -> Result<(), Error> {
        let before = self.line.len();
        if !self.line.insert(text) {
            return Err(Error::Capacity);
        }
        if self.echo == Echo::Once && self.password_from.is_none() {
            self.password_from = Some(before);
        }
        Ok(())
    }

    /// Feeds one input byte through the dispatcher. Call this for every
    /// byte received from the terminal, e.g. from the UART RX interrupt.
    pub fn insert_byte(&mut self, byte: u8) {
        #[cfg(feature = "esc-seq")]
        if self.esc != EscState::Inactive {
            let (next, action) = escape::step(self.esc, byte);
            self.esc = next;
            self.apply_escape(action);
            return;
        }

        if byte == KEY_CR || byte == KEY_LF {
            let companion = if byte == KEY_CR { KEY_LF } else { KEY_CR };
            if self.last_endl == companion {
                // second half of a CRLF/LFCR pair, already handled
                self.last_endl = 0;
                return;
            }
            self.last_endl = byte;
            self.on_enter();
            return;
        }
        self.last_endl = 0;

        match byte {
            KEY_HT => {
                #[cfg(feature = "complete")]
                self.run_completion();
            }
            KEY_ESC => {
                #[cfg(feature = "esc-seq")]
                {
                    self.esc = EscState::Started;
                }
            }
            KEY_NAK => {
                let cursor = self.line.cursor();
                if cursor > 0 {
                    self.line.remove_before_cursor(cursor);
                }
                self.repaint(0, true);
            }
            KEY_VT => {
                if self.echo != Echo::Off {
                    self.term.write_str("\x1b[K");
                    self.term.flush();
                }
                self.line.kill_to_end();
            }
            KEY_ENQ => {
                let distance = self.line.len() - self.line.cursor();
                self.term.move_cursor(distance as i32);
                let end = self.line.len();
                self.line.set_cursor(end);
            }
            KEY_SOH => {
                self.term.move_cursor(-(self.line.cursor() as i32));
                self.line.set_cursor(0);
            }
            KEY_ACK => {
                if !self.line.at_end() {
                    self.term.move_cursor(1);
                    self.line.move_right();
                }
            }
            KEY_STX => {
                if self.line.cursor() > 0 {
                    self.term.move_cursor(-1);
                    self.line.move_left();
                }
            }
            KEY_DLE => {
                #[cfg(feature = "history")]
                self.hist_search(HistDir::Up);
            }
            KEY_SO => {
                #[cfg(feature = "history")]
                self.hist_search(HistDir::Down);
            }
            KEY_DEL | KEY_BS => {
                if self.line.cursor() > 0 {
                    self.line.remove_before_cursor(1);
                    if self.line.at_end() {
                        if self.echo != Echo::Off {
                            self.term.write_str("\x1b[D \x1b[D");
                            self.term.flush();
                        }
                    } else {
                        self.repaint(self.line.cursor(), true);
                    }
                }
            }
            KEY_EOT => {
                self.line.delete_at_cursor();
                self.repaint(self.line.cursor(), false);
            }
            KEY_DC2 => {
                self.term.write_str(self.endl);
                let prompt = self.prompt;
                self.term.write_str(prompt);
                self.repaint(0, false);
            }
            KEY_ETX => {
                #[cfg(feature = "ctrl-c")]
                if let Some(sigint) = self.sigint {
                    let mut hooks = Hooks {
                        term: &mut self.term,
                        prompt: &mut self.prompt,
                        prompt_width: &mut self.prompt_width,
                        echo: &mut self.echo,
                        user: &mut self.user,
                    };
                    sigint(&mut hooks);
                }
            }
            _ => {
                if (byte == b' ' && self.line.is_empty()) || byte < 0x20 {
                    return;
                }
                if self.insert_text(&[byte]).is_ok() {
                    if self.line.at_end() {
                        match self.echo {
                            Echo::Off => {}
                            Echo::Once
                                if self
                                    .password_from
                                    .is_some_and(|from| self.line.cursor() > from) =>
                            {
                                self.term.write_bytes(b"*");
                                self.term.flush();
                            }
                            _ => {
                                self.term.write_bytes(&[byte]);
                                self.term.flush();
                            }
                        }
                    } else {
                        self.repaint(self.line.cursor() - 1, false);
                    }
                }
            }
        }
    }

    #[cfg(feature = "esc-seq")]
    fn apply_escape(&mut self, action: EscAction) {
        match action {
            EscAction::None => {}
            EscAction::HistoryUp => {
                #[cfg(feature = "history")]
                self.hist_search(HistDir::Up);
            }
            EscAction::HistoryDown => {
                #[cfg(feature = "history")]
                self.hist_search(HistDir::Down);
            }
            EscAction::CursorRight => {
                if !self.line.at_end() {
                    self.term.move_cursor(1);
                    self.line.move_right();
                }
            }
            EscAction::CursorLeft => {
                if self.line.cursor() > 0 {
                    self.term.move_cursor(-1);
                    self.line.move_left();
                }
            }
            EscAction::Home => {
                self.term.move_cursor(-(self.line.cursor() as i32));
                self.line.set_cursor(0);
            }
            EscAction::End => {
                let distance = self.line.len() - self.line.cursor();
                self.term.move_cursor(distance as i32);
                let end = self.line.len();
                self.line.set_cursor(end);
            }
        }
    }

    #[cfg(feature = "history")]
    fn hist_search(&mut self, dir: HistDir) {
        if self.echo != Echo::On {
            return;
        }
        if let Some(len) = self.hist.navigate(dir, self.line.raw_mut()) {
            self.line.set_len(len);
            self.repaint(0, true);
        }
    }

    // Enter: save to history, tokenize, execute, reset the line.
    fn on_enter(&mut self) {
        self.term.write_str(self.endl);

        #[cfg(feature = "history")]
        if !self.line.is_empty() && self.echo == Echo::On {
            self.hist.push(self.line.bytes());
        }
        if self.echo == Echo::Once {
            self.echo = Echo::On;
            self.password_from = None;
        }

        let limit = self.line.len();
        match token::split::<TOK, QTE>(self.line.raw_mut(), limit, &mut self.quotes) {
            Err(_) => {
                self.term.write_str(SPLIT_ERROR_MSG);
                self.term.write_str(self.endl);
            }
            Ok(starts) => {
                if !starts.is_empty() {
                    if let Some(execute) = self.execute {
                        let buf = self.line.raw();
                        let mut args: Vec<&[u8], TOK> = Vec::new();
                        for &start in starts.iter() {
                            let _ = args.push(token::token_at(buf, start));
                        }
                        let mut hooks = Hooks {
                            term: &mut self.term,
                            prompt: &mut self.prompt,
                            prompt_width: &mut self.prompt_width,
                            echo: &mut self.echo,
                            user: &mut self.user,
                        };
                        let _ = execute(&mut hooks, &args);
                    }
                }
            }
        }
        self.quotes.clear();

        let prompt = self.prompt;
        self.term.write_str(prompt);
        self.term.flush();
        self.line.clear();
        #[cfg(feature = "history")]
        self.hist.reset_nav();
    }

    #[cfg(feature = "complete")]
    fn run_completion(&mut self) {
        let Some(complete) = self.complete else {
            return;
        };
        let limit = self.line.cursor();
        let starts = match token::split::<TOK, QTE>(self.line.raw_mut(), limit, &mut self.quotes) {
            Ok(starts) => starts,
            Err(_) => return,
        };

        let cursor = self.line.cursor();
        let new_token = cursor == 0 || self.line.byte(cursor - 1) == 0;

        let (candidates, tail_len) = {
            let buf = self.line.raw();
            let mut args: Vec<&[u8], TOK> = Vec::new();
            for &start in starts.iter() {
                let _ = args.push(token::token_at(buf, start));
            }
            if new_token {
                let _ = args.push(b"");
            }
            let tail_len = args.last().map_or(0, |tail| tail.len());
            let mut hooks = Hooks {
                term: &mut self.term,
                prompt: &mut self.prompt,
                prompt_width: &mut self.prompt_width,
                echo: &mut self.echo,
                user: &mut self.user,
            };
            (complete(&mut hooks, &args), tail_len)
        };
        token::restore(self.line.raw_mut(), &mut self.quotes);

        if candidates.is_empty() {
            return;
        }

        let mut pos = self.line.cursor();
        let insert_len = if candidates.len() == 1 {
            candidates[0].len()
        } else {
            let common = common_len(candidates);
            self.term.write_str(self.endl);
            for candidate in candidates {
                self.term.write_str(candidate);
                self.term.write_str(" ");
            }
            self.term.write_str(self.endl);
            let prompt = self.prompt;
            self.term.write_str(prompt);
            pos = 0;
            common
        };

        if insert_len > 0 {
            if insert_len > tail_len {
                let _ = self.insert_text(&candidates[0].as_bytes()[tail_len..insert_len]);
            }
            if candidates.len() == 1 {
                let _ = self.insert_text(b" ");
            }
        }
        self.repaint(pos, false);
    }

    fn repaint(&mut self, start: usize, reset: bool) {
        if self.echo == Echo::Off {
            return;
        }
        let mask_from = if self.echo == Echo::Once {
            self.password_from
        } else {
            None
        };
        self.term.print_line::<PBL>(
            self.line.bytes(),
            self.line.cursor(),
            start,
            reset,
            self.prompt_width,
            mask_from,
            CMD,
        );
    }
}

/// Length of the longest common prefix over all candidates.
#[cfg(feature = "complete")]
fn common_len(candidates: &[&str]) -> usize {
    let first = candidates[0].as_bytes();
    let mut len = first.len();
    for candidate in candidates[1..].iter() {
        let bytes = candidate.as_bytes();
        let mut i = 0;
        while i < len && i < bytes.len() && first[i] == bytes[i] {
            i += 1;
        }
        len = i;
    }
    len
}

// ==================================================
// ==================== TESTS =======================
// ==================================================

#[cfg(test)]
mod tests {
    use super::*;

    type Sink = heapless::String<1024>;

    #[derive(Default)]
    struct Rec {
        execs: usize,
        args: std::vec::Vec<std::vec::Vec<u8>>,
        sigints: usize,
    }

    type Ed = Editor<Sink, Rec>;

    fn record_exec(hooks: &mut Hooks<'_, Sink, Rec>, args: &[&[u8]]) -> i32 {
        let rec = hooks.user();
        rec.execs += 1;
        rec.args = args.iter().map(|a| a.to_vec()).collect();
        0
    }

    fn editor() -> Ed {
        let mut ed = Editor::new(Sink::new(), Rec::default());
        ed.set_execute(record_exec);
        ed.writer_mut().clear();
        ed
    }

    fn feed(ed: &mut Ed, bytes: &[u8]) {
        for &b in bytes {
            ed.insert_byte(b);
        }
    }

    // ============================================================================
    // Entering and executing lines
    // ============================================================================

    #[test]
    fn test_simple_execute() {
        let mut ed = editor();
        feed(&mut ed, b"hi\n");
        assert_eq!(ed.user().execs, 1);
        assert_eq!(ed.user().args, [b"hi".to_vec()]);
        assert!(ed.line.raw().iter().all(|&b| b == 0));
        assert_eq!(ed.cursor(), 0);
        assert_eq!(ed.line_bytes(), b"");
    }

    #[test]
    fn test_tokens_split_on_spaces() {
        let mut ed = editor();
        feed(&mut ed, b"set mode test\n");
        assert_eq!(
            ed.user().args,
            [b"set".to_vec(), b"mode".to_vec(), b"test".to_vec()]
        );
    }

    #[test]
    fn test_empty_line_does_not_execute() {
        let mut ed = editor();
        feed(&mut ed, b"\n\n");
        assert_eq!(ed.user().execs, 0);
    }

    #[test]
    fn test_crlf_and_lfcr_coalesce_to_one_enter() {
        let mut ed = editor();
        feed(&mut ed, b"a\r\n");
        assert_eq!(ed.user().execs, 1);
        feed(&mut ed, b"b\n\r");
        assert_eq!(ed.user().execs, 2);
        feed(&mut ed, b"c\r");
        assert_eq!(ed.user().execs, 3);
        assert_eq!(ed.user().args, [b"c".to_vec()]);
    }

    #[test]
    fn test_separate_enters_both_execute() {
        let mut ed = editor();
        feed(&mut ed, b"a\rb\r");
        assert_eq!(ed.user().execs, 2);
    }

    #[test]
    fn test_prompt_reprinted_after_enter() {
        let mut ed = editor();
        feed(&mut ed, b"hi\n");
        assert!(ed.writer().as_str().ends_with(crate::PROMPT_DEFAULT));
    }

    #[test]
    fn test_too_many_tokens_reports_error_and_skips_executor() {
        let mut ed = editor();
        feed(&mut ed, b"a b c d e f g h\n");
        assert_eq!(ed.user().execs, 0);
        assert!(ed.writer().as_str().contains("ERROR:too many tokens"));
        // the line is reset and editing continues
        feed(&mut ed, b"ok\n");
        assert_eq!(ed.user().execs, 1);
    }

    #[cfg(feature = "quoting")]
    #[test]
    fn test_quoted_token_execute() {
        let mut ed = editor();
        feed(&mut ed, b"set wifi 'Home Net' pw\n");
        assert_eq!(
            ed.user().args,
            [
                b"set".to_vec(),
                b"wifi".to_vec(),
                b"Home Net".to_vec(),
                b"pw".to_vec()
            ]
        );
    }

    #[cfg(feature = "quoting")]
    #[test]
    fn test_unterminated_quote_reports_error() {
        let mut ed = editor();
        feed(&mut ed, b"x 'bad\n");
        assert_eq!(ed.user().execs, 0);
        assert!(ed
            .writer()
            .as_str()
            .contains("ERROR:too many tokens or invalid quoting"));
    }

    // ============================================================================
    // Editing keys
    // ============================================================================

    #[test]
    fn test_backspace() {
        let mut ed = editor();
        feed(&mut ed, b"abc\x7f\x7f");
        assert_eq!(ed.line_bytes(), b"a");
        assert_eq!(ed.cursor(), 1);
    }

    #[test]
    fn test_backspace_at_column_zero_is_noop() {
        let mut ed = editor();
        feed(&mut ed, b"\x7f");
        assert_eq!(ed.line_bytes(), b"");
        assert_eq!(ed.writer().as_str(), "");
    }

    #[cfg(feature = "esc-seq")]
    #[test]
    fn test_arrow_left_then_insert() {
        let mut ed = editor();
        feed(&mut ed, b"abc\x1b[Dx");
        assert_eq!(ed.line_bytes(), b"abxc");
        assert_eq!(ed.cursor(), 3);
    }

    #[test]
    fn test_ctrl_u_kills_whole_line() {
        let mut ed = editor();
        feed(&mut ed, b"abcd\x15");
        assert_eq!(ed.line_bytes(), b"");
        assert_eq!(ed.cursor(), 0);
    }

    #[test]
    fn test_ctrl_k_kills_to_end() {
        let mut ed = editor();
        feed(&mut ed, b"abcd\x02\x02\x0b");
        assert_eq!(ed.line_bytes(), b"ab");
        assert_eq!(ed.cursor(), 2);
        assert!(ed.line.raw()[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_ctrl_a_and_ctrl_e_jump_to_ends() {
        let mut ed = editor();
        feed(&mut ed, b"abc\x01");
        assert_eq!(ed.cursor(), 0);
        feed(&mut ed, b"\x05");
        assert_eq!(ed.cursor(), 3);
    }

    #[test]
    fn test_ctrl_f_and_ctrl_b_step_within_bounds() {
        let mut ed = editor();
        feed(&mut ed, b"ab\x06"); // at end, no move
        assert_eq!(ed.cursor(), 2);
        feed(&mut ed, b"\x02\x02\x02"); // bounded at 0
        assert_eq!(ed.cursor(), 0);
        feed(&mut ed, b"\x06");
        assert_eq!(ed.cursor(), 1);
    }

    #[test]
    fn test_ctrl_d_deletes_forward_only() {
        let mut ed = editor();
        feed(&mut ed, b"abc\x01\x04");
        assert_eq!(ed.line_bytes(), b"bc");
        assert_eq!(ed.cursor(), 0);
        feed(&mut ed, b"\x05\x04"); // at end of line: nothing to delete
        assert_eq!(ed.line_bytes(), b"bc");
        assert_eq!(ed.cursor(), 2);
    }

    #[test]
    fn test_leading_spaces_are_stripped() {
        let mut ed = editor();
        feed(&mut ed, b"  a b");
        assert_eq!(ed.line_bytes(), b"a\0b");
    }

    #[test]
    fn test_other_control_bytes_ignored() {
        let mut ed = editor();
        feed(&mut ed, b"a\x07\x0c\x1fb");
        assert_eq!(ed.line_bytes(), b"ab");
    }

    #[test]
    fn test_line_overflow_drops_bytes() {
        let mut ed = editor();
        for _ in 0..70 {
            ed.insert_byte(b'a');
        }
        assert_eq!(ed.line_bytes().len(), 60);
        assert_eq!(ed.cursor(), 60);
    }

    #[test]
    fn test_insert_text_capacity_error() {
        let mut ed = editor();
        assert_eq!(ed.insert_text(&[b'x'; 61]), Err(Error::Capacity));
        assert!(ed.insert_text(b"ok").is_ok());
        assert_eq!(ed.line_bytes(), b"ok");
    }

    #[test]
    fn test_ctrl_r_redraws_line() {
        let mut ed = editor();
        feed(&mut ed, b"ab");
        ed.writer_mut().clear();
        ed.insert_byte(0x12);
        let out = ed.writer().as_str();
        assert!(out.contains(crate::PROMPT_DEFAULT));
        assert!(out.contains("ab"));
    }

    // ============================================================================
    // History
    // ============================================================================

    #[cfg(all(feature = "history", feature = "esc-seq"))]
    #[test]
    fn test_history_walk_with_arrows() {
        let mut ed = editor();
        feed(&mut ed, b"one\ntwo\n");

        feed(&mut ed, b"\x1b[A");
        assert_eq!(ed.line_bytes(), b"two");
        assert_eq!(ed.cursor(), 3);

        feed(&mut ed, b"\x1b[A");
        assert_eq!(ed.line_bytes(), b"one");

        feed(&mut ed, b"\x1b[B");
        assert_eq!(ed.line_bytes(), b"two");

        feed(&mut ed, b"\x1b[B");
        assert_eq!(ed.line_bytes(), b"");
    }

    #[cfg(feature = "history")]
    #[test]
    fn test_history_via_ctrl_p_and_ctrl_n() {
        let mut ed = editor();
        feed(&mut ed, b"one\n\x10");
        assert_eq!(ed.line_bytes(), b"one");
        feed(&mut ed, b"\x0e");
        assert_eq!(ed.line_bytes(), b"");
    }

    #[cfg(feature = "history")]
    #[test]
    fn test_history_restores_separators() {
        let mut ed = editor();
        feed(&mut ed, b"set mode\n\x10");
        assert_eq!(ed.line_bytes(), b"set\0mode");
    }

    #[cfg(feature = "history")]
    #[test]
    fn test_history_navigation_disabled_when_echo_off() {
        let mut ed = editor();
        feed(&mut ed, b"one\n");
        ed.set_echo(Echo::Off);
        feed(&mut ed, b"\x10");
        assert_eq!(ed.line_bytes(), b"");
    }

    // ============================================================================
    // Echo modes
    // ============================================================================

    #[test]
    fn test_echo_off_stores_but_prints_nothing() {
        let mut ed = editor();
        ed.set_echo(Echo::Off);
        feed(&mut ed, b"secret");
        assert_eq!(ed.line_bytes(), b"secret");
        assert_eq!(ed.writer().as_str(), "");
    }

    #[test]
    fn test_echo_once_masks_with_stars_and_reverts() {
        let mut ed = editor();
        ed.set_echo(Echo::Once);
        feed(&mut ed, b"pw");
        assert_eq!(ed.writer().as_str(), "**");
        assert_eq!(ed.line_bytes(), b"pw");

        feed(&mut ed, b"\n");
        assert_eq!(ed.user().args, [b"pw".to_vec()]);
        ed.writer_mut().clear();
        feed(&mut ed, b"x");
        assert_eq!(ed.writer().as_str(), "x");
    }

    #[cfg(feature = "history")]
    #[test]
    fn test_password_line_not_saved_to_history() {
        let mut ed = editor();
        ed.set_echo(Echo::Once);
        feed(&mut ed, b"pw\n\x10");
        assert_eq!(ed.line_bytes(), b"");
    }

    // ============================================================================
    // Ctrl+C
    // ============================================================================

    #[cfg(feature = "ctrl-c")]
    #[test]
    fn test_sigint_callback() {
        fn on_sigint(hooks: &mut Hooks<'_, Sink, Rec>) {
            hooks.user().sigints += 1;
            hooks.print("^C");
        }

        let mut ed = editor();
        ed.set_sigint(on_sigint);
        ed.insert_byte(0x03);
        assert_eq!(ed.user().sigints, 1);
        assert!(ed.writer().as_str().contains("^C"));
    }

    #[cfg(feature = "ctrl-c")]
    #[test]
    fn test_ctrl_c_without_callback_is_noop() {
        let mut ed = editor();
        ed.insert_byte(0x03);
        assert_eq!(ed.writer().as_str(), "");
    }

    // ============================================================================
    // Completion
    // ============================================================================

    #[cfg(feature = "complete")]
    fn compl_single(_: &mut Hooks<'_, Sink, Rec>, _: &[&[u8]]) -> &'static [&'static str] {
        &["hello"]
    }

    #[cfg(feature = "complete")]
    fn compl_multi(_: &mut Hooks<'_, Sink, Rec>, _: &[&[u8]]) -> &'static [&'static str] {
        &["hello", "help"]
    }

    #[cfg(feature = "complete")]
    fn compl_none(_: &mut Hooks<'_, Sink, Rec>, _: &[&[u8]]) -> &'static [&'static str] {
        &[]
    }

    #[cfg(feature = "complete")]
    fn compl_count(hooks: &mut Hooks<'_, Sink, Rec>, args: &[&[u8]]) -> &'static [&'static str] {
        let rec = hooks.user();
        rec.args = args.iter().map(|a| a.to_vec()).collect();
        &[]
    }

    #[cfg(feature = "complete")]
    #[test]
    fn test_single_candidate_completes_with_trailing_space() {
        let mut ed = editor();
        ed.set_complete(compl_single);
        feed(&mut ed, b"h\t");
        // extended by len("hello") - len("h") + 1, the +1 being the space
        assert_eq!(ed.line_bytes(), b"hello\0");
        assert_eq!(ed.cursor(), 6);
    }

    #[cfg(feature = "complete")]
    #[test]
    fn test_multiple_candidates_print_list_and_extend_common_prefix() {
        let mut ed = editor();
        ed.set_complete(compl_multi);
        feed(&mut ed, b"h\t");
        assert_eq!(ed.line_bytes(), b"hel");
        assert_eq!(ed.cursor(), 3);
        let out = ed.writer().as_str();
        assert!(out.contains("hello help "));
        assert!(out.contains(crate::PROMPT_DEFAULT));
    }

    #[cfg(feature = "complete")]
    #[test]
    fn test_no_candidates_changes_nothing() {
        let mut ed = editor();
        ed.set_complete(compl_none);
        feed(&mut ed, b"zz\t");
        assert_eq!(ed.line_bytes(), b"zz");
        assert_eq!(ed.cursor(), 2);
    }

    #[cfg(feature = "complete")]
    #[test]
    fn test_tab_without_completer_is_noop() {
        let mut ed = editor();
        feed(&mut ed, b"h\t");
        assert_eq!(ed.line_bytes(), b"h");
    }

    #[cfg(feature = "complete")]
    #[test]
    fn test_cursor_after_separator_appends_empty_token() {
        let mut ed = editor();
        ed.set_complete(compl_count);
        feed(&mut ed, b"set \t");
        assert_eq!(ed.user().args, [b"set".to_vec(), b"".to_vec()]);
    }

    #[cfg(feature = "complete")]
    #[test]
    fn test_tab_on_empty_line_passes_single_empty_token() {
        let mut ed = editor();
        ed.set_complete(compl_count);
        feed(&mut ed, b"\t");
        assert_eq!(ed.user().args, [b"".to_vec()]);
    }

    #[cfg(feature = "complete")]
    #[test]
    fn test_exact_match_still_appends_space() {
        let mut ed = editor();
        ed.set_complete(compl_single);
        feed(&mut ed, b"hello\t");
        assert_eq!(ed.line_bytes(), b"hello\0");
        assert_eq!(ed.cursor(), 6);
    }

    // ============================================================================
    // State invariants
    // ============================================================================

    #[test]
    fn test_state_stays_consistent_for_arbitrary_input() {
        let script: &[u8] =
            b"abc\x02x\x7f\x1b[Ad ef\x15gh\x0bij\x01\x04\x05kl\tmn\r\nop\x12q\x03 r\x06\x0e\x10s\n";
        let mut ed = editor();
        for &b in script {
            ed.insert_byte(b);
            assert!(ed.cursor() <= ed.line_bytes().len());
            assert!(ed.line_bytes().len() < 61);
            assert_eq!(ed.line.raw()[ed.line_bytes().len()], 0);
        }
    }

    // ============================================================================
    // Hooks from callbacks
    // ============================================================================

    #[test]
    fn test_executor_can_swap_prompt() {
        fn swap_prompt(hooks: &mut Hooks<'_, Sink, Rec>, _: &[&[u8]]) -> i32 {
            hooks.set_prompt("$ ", 2);
            0
        }

        let mut ed = editor();
        ed.set_execute(swap_prompt);
        feed(&mut ed, b"x\n");
        assert!(ed.writer().as_str().ends_with("$ "));
    }

    #[test]
    fn test_executor_can_request_password_echo() {
        fn ask_password(hooks: &mut Hooks<'_, Sink, Rec>, _: &[&[u8]]) -> i32 {
            hooks.set_echo(Echo::Once);
            0
        }

        let mut ed = editor();
        ed.set_execute(ask_password);
        feed(&mut ed, b"login\n");
        ed.writer_mut().clear();
        feed(&mut ed, b"pw");
        assert_eq!(ed.writer().as_str(), "**");
    }
}
