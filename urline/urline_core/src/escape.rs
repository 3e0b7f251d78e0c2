//! ANSI escape sequence decoder.
//!
//! A tagged state machine fed one byte at a time. The editor enters
//! [`EscState::Started`] when it sees ESC (0x1B); every following byte goes
//! through [`step`] until the state returns to [`EscState::Inactive`].
//! Unknown sequences terminate silently with no action.

/// Decoder state. `Inactive` means no sequence is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscState {
    #[default]
    Inactive,
    /// ESC seen, waiting for `[`.
    Started,
    /// `ESC [` seen, waiting for the final byte.
    Bracket,
    /// `ESC [ 7` seen, a `~` makes it Home.
    HomePending,
    /// `ESC [ 8` seen, a `~` makes it End.
    EndPending,
}

/// What a completed sequence asks the editor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscAction {
    None,
    HistoryUp,
    HistoryDown,
    CursorRight,
    CursorLeft,
    Home,
    End,
}

/// Advances the decoder by one byte.
pub fn step(state: EscState, byte: u8) -> (EscState, EscAction) {
    match state {
        EscState::Inactive => (EscState::Inactive, EscAction::None),
        EscState::Started => match byte {
            b'[' => (EscState::Bracket, EscAction::None),
            _ => (EscState::Inactive, EscAction::None),
        },
        EscState::Bracket => match byte {
            b'A' => (EscState::Inactive, EscAction::HistoryUp),
            b'B' => (EscState::Inactive, EscAction::HistoryDown),
            b'C' => (EscState::Inactive, EscAction::CursorRight),
            b'D' => (EscState::Inactive, EscAction::CursorLeft),
            b'7' => (EscState::HomePending, EscAction::None),
            b'8' => (EscState::EndPending, EscAction::None),
            _ => (EscState::Inactive, EscAction::None),
        },
        EscState::HomePending => match byte {
            b'~' => (EscState::Inactive, EscAction::Home),
            _ => (EscState::Inactive, EscAction::None),
        },
        EscState::EndPending => match byte {
            b'~' => (EscState::Inactive, EscAction::End),
            _ => (EscState::Inactive, EscAction::None),
        },
    }
}

// ==================================================
// ==================== TESTS =======================
// ==================================================
