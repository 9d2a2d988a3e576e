use super::state::{FormDraft, Generation, MemberDetail, MemberId};
use crate::error::LookupResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket {
    generation: Generation,
    member: MemberId,
}

impl DetailTicket {
    pub fn member(&self) -> &MemberId {
        &self.member
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BindOutcome {
    Applied(MemberDetail),
    Failed(String),
    /// Superseded by a newer member selection; nothing was written.
    Stale,
}

/// Writes read-only fields derived from a member record into the draft.
#[derive(Debug, Default)]
pub struct DerivedFieldBinder {
    generation: Generation,
    resolved: Option<MemberDetail>,
}

impl DerivedFieldBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start resolving `member`. Readiness drops until the detail arrives.
    pub fn begin(&mut self, member: MemberId) -> DetailTicket {
        self.resolved = None;
        DetailTicket {
            generation: self.generation.bump(),
            member,
        }
    }

    /// Member selection cleared; invalidates anything in flight.
    pub fn reset(&mut self) {
        self.generation.bump();
        self.resolved = None;
    }

    pub fn apply(
        &mut self,
        ticket: DetailTicket,
        result: LookupResult<MemberDetail>,
        draft: &mut FormDraft,
    ) -> BindOutcome {
        if ticket.generation != self.generation {
            log::debug!("Dropping stale detail for member {}", ticket.member);
            return BindOutcome::Stale;
        }

        match result {
            Ok(detail) => {
                log::info!("Member {} resolved, path {}", ticket.member, detail.path);
                draft.path = detail.path.clone();
                self.resolved = Some(detail.clone());
                BindOutcome::Applied(detail)
            }
            Err(e) => {
                log::error!("Failed to load detail for member {}: {}", ticket.member, e);
                BindOutcome::Failed(e.to_string())
            }
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    pub fn resolved(&self) -> Option<&MemberDetail> {
        self.resolved.as_ref()
    }
}
