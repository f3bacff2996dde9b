use std::fmt;

/// Identifies one load request. Only the most recent ticket is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Display for LoadTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "load #{}", self.generation)
    }
}

/// Orders overlapping loads: a newer request supersedes older ones, and a
/// completion arriving for a superseded ticket is dropped.
#[derive(Debug, Clone, Default)]
pub struct LoadCoordinator {
    generation: u64,
    pending: Option<LoadTicket>,
}

impl LoadCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        let ticket = LoadTicket {
            generation: self.generation,
        };
        if let Some(previous) = self.pending.replace(ticket) {
            log::debug!("{ticket} supersedes {previous}");
        }
        ticket
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.pending == Some(ticket)
    }

    /// Hand back `result` if `ticket` is still the pending request.
    pub fn complete<T>(&mut self, ticket: LoadTicket, result: T) -> Option<T> {
        if !self.is_current(ticket) {
            log::warn!("discarding stale {ticket}");
            return None;
        }
        self.pending = None;
        Some(result)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
