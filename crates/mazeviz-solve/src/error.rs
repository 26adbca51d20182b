use std::fmt;

/// Errors reported when starting a [`SolveSession`](crate::SolveSession).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    /// The grid lacks a Start, an End, or both. The session stays Idle.
    PreconditionNotMet { missing_start: bool, missing_end: bool },
    /// A run is already in progress; stop or reset it first.
    AlreadyRunning,
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreconditionNotMet {
                missing_start,
                missing_end,
            } => {
                let what = match (missing_start, missing_end) {
                    (true, true) => "start and end cells",
                    (true, false) => "a start cell",
                    _ => "an end cell",
                };
                write!(f, "cannot start solving: the grid has no {what}")
            }
            Self::AlreadyRunning => f.write_str("a solve session is already running"),
        }
    }
}

impl std::error::Error for SolveError {}
