use tracing::debug;

/// Phases of a single run. Runs only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    ResolvingIdentity,
    Disambiguating,
    Dispatching,
    /// Outcomes are grouped into matched, missing and failed sites.
    Normalizing,
    /// The outcome report is rendered: result tables, missing types, failures.
    Presenting,
    /// The release prompt runs over the reported results and the run is summarized.
    Reporting,
    Done,
    /// Carries the [`RunError::code`](tmdbtrack_core::error::RunError::code) that ended the run.
    Aborted(&'static str),
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::ResolvingIdentity => "ResolvingIdentity",
            Self::Disambiguating => "Disambiguating",
            Self::Dispatching => "Dispatching",
            Self::Normalizing => "Normalizing",
            Self::Presenting => "Presenting",
            Self::Reporting => "Reporting",
            Self::Done => "Done",
            Self::Aborted(_) => "Aborted",
        }
    }

    fn ordinal(&self) -> u8 {
        match self {
            Self::Init => 0,
            Self::ResolvingIdentity => 1,
            Self::Disambiguating => 2,
            Self::Dispatching => 3,
            Self::Normalizing => 4,
            Self::Presenting => 5,
            Self::Reporting => 6,
            Self::Done | Self::Aborted(_) => 7,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted(_))
    }

    /// Forward moves only. Any non-terminal state may abort.
    pub fn can_advance_to(&self, next: RunState) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            Self::Aborted(_) => true,
            _ => next.ordinal() > self.ordinal(),
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Aborted(reason) => write!(f, "Aborted({reason})"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Records the path a run takes through [`RunState`].
#[derive(Debug, Clone)]
pub struct RunTracker {
    history: Vec<RunState>,
}

impl Default for RunTracker {
    fn default() -> Self {
        Self {
            history: vec![RunState::Init],
        }
    }
}

impl RunTracker {
    pub fn current(&self) -> RunState {
        self.history.last().copied().unwrap_or(RunState::Init)
    }

    /// Move to `next`; backward or post-terminal moves are ignored and
    /// return `false`.
    pub fn advance(&mut self, next: RunState) -> bool {
        let current = self.current();
        if !current.can_advance_to(next) {
            debug!(from = %current, to = %next, "ignored run state transition");
            return false;
        }
        debug!(from = %current, to = %next, "run state");
        self.history.push(next);
        true
    }

    pub fn history(&self) -> &[RunState] {
        &self.history
    }
}
