use std::fmt;

/// Where the workflow stands. A failed submission reports `failed` to the
/// caller and lands back in `Reviewing`, so it never rests in a failed phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Reviewing,
    EditingReasons,
    Submitting,
    Success,
    PartialFailure,
    Closed,
}

/// Caller-facing commands, named for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Open,
    UpdateCandidate,
    RemoveCandidate,
    EditReasons,
    ConfirmEdits,
    DiscardEdits,
    Submit,
    RetryFailed,
    Acknowledge,
    Cancel,
}

impl Phase {
    /// The transition table: which commands each phase accepts.
    pub fn allows(self, command: Command) -> bool {
        use Command::*;
        match self {
            Phase::Idle | Phase::Closed => matches!(command, Open),
            Phase::Reviewing => matches!(command, UpdateCandidate | RemoveCandidate | EditReasons | Submit | Cancel),
            Phase::EditingReasons => matches!(command, ConfirmEdits | DiscardEdits | Cancel),
            Phase::Submitting => false,
            Phase::Success => matches!(command, Acknowledge),
            Phase::PartialFailure => matches!(command, RetryFailed | Acknowledge),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Idle => "idle",
            Phase::Reviewing => "reviewing",
            Phase::EditingReasons => "editing reasons",
            Phase::Submitting => "submitting",
            Phase::Success => "success",
            Phase::PartialFailure => "partial failure",
            Phase::Closed => "closed",
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Command::Open => "open",
            Command::UpdateCandidate => "update candidate",
            Command::RemoveCandidate => "remove candidate",
            Command::EditReasons => "edit reasons",
            Command::ConfirmEdits => "confirm edits",
            Command::DiscardEdits => "discard edits",
            Command::Submit => "submit",
            Command::RetryFailed => "retry failed",
            Command::Acknowledge => "acknowledge",
            Command::Cancel => "cancel",
        })
    }
}
