//! Center and member select controls.
//!
//! Every load is stamped with a [`Generation`]. Starting a newer load, or
//! clearing the control, moves the generation forward so any response still
//! in flight for the older request is dropped on arrival instead of applied.

use super::state::{CenterCode, Generation, MemberId, MemberSummary, SelectOption, SelectionState};
use crate::error::LookupResult;

pub const CHOOSE_CENTER: &str = "-- Choose a center --";
pub const CENTERS_LOADING: &str = "Loading centers...";
pub const CENTERS_FAILED: &str = "Failed to load centers";
pub const CHOOSE_CENTER_FIRST: &str = "-- Choose a center first --";
pub const CHOOSE_MEMBER: &str = "-- Choose a member --";
pub const MEMBERS_FAILED: &str = "Failed to load members";
pub const NO_MEMBERS: &str = "No members in this center";

/// Issued when a center-list load starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CentersTicket {
    generation: Generation,
}

/// Issued when a members-of-center load starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembersTicket {
    generation: Generation,
    center: CenterCode,
}

impl MembersTicket {
    pub fn center(&self) -> &CenterCode {
        &self.center
    }
}

#[derive(Debug, Default)]
pub struct SelectionController {
    centers: SelectionState<CenterCode>,
    members: SelectionState<MemberSummary>,
    selected_center: Option<CenterCode>,
    selected_member: Option<MemberId>,
    centers_generation: Generation,
    members_generation: Generation,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn centers(&self) -> &SelectionState<CenterCode> {
        &self.centers
    }

    pub fn members(&self) -> &SelectionState<MemberSummary> {
        &self.members
    }

    pub fn selected_center(&self) -> Option<&CenterCode> {
        self.selected_center.as_ref()
    }

    pub fn selected_member(&self) -> Option<&MemberId> {
        self.selected_member.as_ref()
    }

    /// Initial mount: same as a reload.
    pub fn mount(&mut self) -> Option<CentersTicket> {
        self.reload_centers()
    }

    /// Operator re-opened the center control. No-op while a load is pending.
    pub fn reload_centers(&mut self) -> Option<CentersTicket> {
        if self.centers.is_loading() {
            log::debug!("Center list already loading, ignoring reload");
            return None;
        }

        self.centers = SelectionState::Loading;
        Some(CentersTicket {
            generation: self.centers_generation.bump(),
        })
    }

    /// Returns `false` when the response was stale and discarded.
    pub fn apply_centers(&mut self, ticket: CentersTicket, result: LookupResult<Vec<CenterCode>>) -> bool {
        if ticket.generation != self.centers_generation {
            log::debug!("Dropping stale center list response");
            return false;
        }

        match result {
            Ok(centers) => {
                log::info!("Loaded {} centers", centers.len());
                let selection_gone = self
                    .selected_center
                    .as_ref()
                    .is_some_and(|selected| !centers.contains(selected));
                self.centers = SelectionState::Populated(centers);

                if selection_gone {
                    log::info!("Selected center no longer listed, clearing member list");
                    self.select_center(None);
                }
            }
            Err(e) => {
                log::error!("Failed to load centers: {}", e);
                self.centers = SelectionState::Failed(e.to_string());
            }
        }

        true
    }

    /// Center selection changed. The member list is cleared synchronously and
    /// a ticket is returned when a members lookup must be issued.
    ///
    /// Once the center list is populated, a center missing from it is
    /// treated as clearing the selection.
    pub fn select_center(&mut self, center: Option<CenterCode>) -> Option<MembersTicket> {
        let generation = self.members_generation.bump();
        self.selected_member = None;

        let center = center.filter(|code| match &self.centers {
            SelectionState::Populated(listed) if !listed.contains(code) => {
                log::warn!("Center {} is not listed, clearing selection", code);
                false
            }
            _ => true,
        });

        match center {
            Some(center) => {
                self.selected_center = Some(center.clone());
                self.members = SelectionState::Loading;
                Some(MembersTicket { generation, center })
            }
            None => {
                self.selected_center = None;
                self.members = SelectionState::Empty;
                None
            }
        }
    }

    pub fn apply_members(&mut self, ticket: MembersTicket, result: LookupResult<Vec<MemberSummary>>) -> bool {
        if ticket.generation != self.members_generation {
            log::debug!("Dropping stale member list for center {}", ticket.center);
            return false;
        }

        match result {
            Ok(members) => {
                log::info!("Loaded {} members for center {}", members.len(), ticket.center);
                self.members = SelectionState::Populated(members);
            }
            Err(e) => {
                log::error!("Failed to load members for center {}: {}", ticket.center, e);
                self.members = SelectionState::Failed(e.to_string());
            }
        }

        true
    }

    /// Record the chosen member. Returns `false` when the id is not one of
    /// the currently listed members (the choice is then treated as a reset).
    pub fn select_member(&mut self, member: Option<MemberId>) -> bool {
        let listed = member
            .as_ref()
            .is_some_and(|id| self.members.items().iter().any(|m| &m.id == id));

        self.selected_member = if listed { member } else { None };
        listed
    }

    pub fn center_options(&self) -> Vec<SelectOption> {
        match &self.centers {
            SelectionState::Empty => Vec::new(),
            SelectionState::Loading => vec![SelectOption::placeholder(CENTERS_LOADING)],
            SelectionState::Failed(_) => vec![SelectOption::placeholder(CENTERS_FAILED)],
            SelectionState::Populated(centers) => std::iter::once(SelectOption::placeholder(CHOOSE_CENTER))
                .chain(centers.iter().map(|c| SelectOption::item(c.as_str(), c.as_str())))
                .collect(),
        }
    }

    pub fn member_options(&self) -> Vec<SelectOption> {
        match (&self.members, &self.selected_center) {
            (SelectionState::Empty, _) | (_, None) => vec![SelectOption::placeholder(CHOOSE_CENTER_FIRST)],
            (SelectionState::Loading, Some(center)) => {
                vec![SelectOption::placeholder(format!("Loading members of center {}...", center))]
            }
            (SelectionState::Failed(_), Some(_)) => vec![SelectOption::placeholder(MEMBERS_FAILED)],
            (SelectionState::Populated(members), Some(_)) if members.is_empty() => {
                vec![SelectOption::placeholder(NO_MEMBERS)]
            }
            (SelectionState::Populated(members), Some(_)) => std::iter::once(SelectOption::placeholder(CHOOSE_MEMBER))
                .chain(members.iter().map(|m| SelectOption::item(m.id.as_str(), m.display_label.as_str())))
                .collect(),
        }
    }
}
