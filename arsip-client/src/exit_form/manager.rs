use super::binder::{BindOutcome, DerivedFieldBinder, DetailTicket};
use super::client::{ExitRegistrar, ExitSubmission, LookupClient};
use super::dialog::Notifier;
use super::selection::{CentersTicket, MembersTicket, SelectionController};
use super::state::{CenterCode, FormDraft, MemberDetail, MemberId, MemberSummary, SelectOption, SelectionState};
use super::submission::{SubmissionWorkflow, SubmitOutcome, SubmitPhase};
use super::view::{submit_action, SubmitActionState};
use super::ExitFormAction;
use crate::error::LookupResult;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Result of a spawned network call, tagged with the request it answers.
#[derive(Debug)]
enum Completion {
    Centers(CentersTicket, LookupResult<Vec<CenterCode>>),
    Members(MembersTicket, LookupResult<Vec<MemberSummary>>),
    Detail(DetailTicket, LookupResult<MemberDetail>),
    Submitted(SubmitOutcome),
}

/// Owns the whole exit form: both select controls, the draft, the derived
/// field binder and the submit workflow.
///
/// Operator events are queued with [`dispatch`](Self::dispatch) and applied
/// by [`update`](Self::update). Network calls run as tokio tasks and report
/// back through a channel, so every state mutation happens on the caller's
/// side, one event at a time. Must be driven from inside a tokio runtime.
pub struct ExitFormManager {
    // Form state - single source of truth
    selection: SelectionController,
    binder: DerivedFieldBinder,
    draft: FormDraft,
    workflow: SubmissionWorkflow,
    last_outcome: Option<SubmitOutcome>,

    // Collaborators
    lookup: Arc<dyn LookupClient>,
    registrar: Arc<dyn ExitRegistrar>,
    notifier: Arc<dyn Notifier>,

    // Event queue and completion channel
    pending_actions: VecDeque<ExitFormAction>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl ExitFormManager {
    pub fn new(
        lookup: Arc<dyn LookupClient>,
        registrar: Arc<dyn ExitRegistrar>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        Self {
            selection: SelectionController::new(),
            binder: DerivedFieldBinder::new(),
            draft: FormDraft::new(),
            workflow: SubmissionWorkflow::new(),
            last_outcome: None,
            lookup,
            registrar,
            notifier,
            pending_actions: VecDeque::new(),
            completions_tx,
            completions_rx,
            in_flight: 0,
        }
    }

    /// Convenience for a backend that serves both the reads and the write.
    pub fn with_backend<B>(backend: Arc<B>, notifier: Arc<dyn Notifier>) -> Self
    where
        B: LookupClient + ExitRegistrar + 'static,
    {
        let lookup: Arc<dyn LookupClient> = backend.clone();
        let registrar: Arc<dyn ExitRegistrar> = backend;
        Self::new(lookup, registrar, notifier)
    }

    /// Queue an operator event; nothing changes until `update`.
    pub fn dispatch(&mut self, action: ExitFormAction) {
        if action.requires_network() {
            log::debug!("Dispatching action: {} (network)", action.description());
        } else {
            log::debug!("Dispatching action: {}", action.description());
        }
        self.pending_actions.push_back(action);
    }

    /// Apply queued actions, then any completions that have already arrived.
    pub fn update(&mut self) {
        while let Some(action) = self.pending_actions.pop_front() {
            self.handle_action(action);
        }

        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply_completion(completion);
        }
    }

    /// Wait for one in-flight call to finish and apply it. Returns `false`
    /// immediately when nothing is in flight.
    pub async fn next_completion(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }

        match self.completions_rx.recv().await {
            Some(completion) => {
                self.apply_completion(completion);
                true
            }
            None => false,
        }
    }

    /// Drive the form until no action is queued and no call is in flight.
    ///
    /// A call that never answers keeps this pending forever.
    pub async fn settle(&mut self) {
        self.update();
        while self.next_completion().await {
            self.update();
        }
    }

    pub fn has_pending_work(&self) -> bool {
        !self.pending_actions.is_empty() || self.in_flight > 0
    }

    // === Read-only views ===

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn centers(&self) -> &SelectionState<CenterCode> {
        self.selection.centers()
    }

    pub fn members(&self) -> &SelectionState<MemberSummary> {
        self.selection.members()
    }

    pub fn center_options(&self) -> Vec<SelectOption> {
        self.selection.center_options()
    }

    pub fn member_options(&self) -> Vec<SelectOption> {
        self.selection.member_options()
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn resolved_member(&self) -> Option<&MemberDetail> {
        self.binder.resolved()
    }

    pub fn submit_action(&self) -> SubmitActionState {
        submit_action(self.binder.is_resolved())
    }

    pub fn submit_phase(&self) -> SubmitPhase {
        self.workflow.phase()
    }

    pub fn last_submit_outcome(&self) -> Option<&SubmitOutcome> {
        self.last_outcome.as_ref()
    }
}

// Action handlers
impl ExitFormManager {
    fn handle_action(&mut self, action: ExitFormAction) {
        match action {
            ExitFormAction::Mount => {
                if let Some(ticket) = self.selection.mount() {
                    self.spawn_centers(ticket);
                }
            }
            ExitFormAction::ActivateCenter => {
                if let Some(ticket) = self.selection.reload_centers() {
                    self.spawn_centers(ticket);
                }
            }
            ExitFormAction::SelectCenter(center) => {
                self.binder.reset();
                if let Some(ticket) = self.selection.select_center(center) {
                    self.spawn_members(ticket);
                }
            }
            ExitFormAction::SelectMember(member) => self.handle_select_member(member),
            ExitFormAction::SetExitDate(exit_date) => {
                self.draft.exit_date = exit_date;
            }
            ExitFormAction::SetNotes(notes) => {
                self.draft.notes = notes;
            }
            ExitFormAction::Attach(attachment) => {
                log::info!("Attached {} ({} bytes)", attachment.file_name, attachment.bytes.len());
                self.draft.attachment = Some(attachment);
            }
            ExitFormAction::ClearAttachment => {
                self.draft.attachment = None;
            }
            ExitFormAction::Submit => self.handle_submit(),
            ExitFormAction::Reset => self.handle_reset(),
        }
    }

    fn handle_select_member(&mut self, member: Option<MemberId>) {
        match member {
            Some(id) if self.selection.select_member(Some(id.clone())) => {
                let ticket = self.binder.begin(id);
                self.spawn_detail(ticket);
            }
            Some(id) => {
                log::warn!("Member {} is not listed for the selected center", id);
                self.binder.reset();
            }
            None => {
                self.selection.select_member(None);
                self.binder.reset();
            }
        }
    }

    fn handle_submit(&mut self) {
        if !self.submit_action().enabled {
            log::warn!("Submit ignored, no member resolved");
            return;
        }

        let Some(run) = self.workflow.try_start() else {
            return;
        };

        let submission = ExitSubmission::from_draft(
            &self.draft,
            self.selection.selected_center(),
            self.selection.selected_member(),
        );
        let notifier = Arc::clone(&self.notifier);
        let registrar = Arc::clone(&self.registrar);

        self.spawn(async move {
            let outcome = run.execute(submission, notifier.as_ref(), registrar.as_ref()).await;
            Completion::Submitted(outcome)
        });
    }

    fn handle_reset(&mut self) {
        if self.workflow.is_busy() {
            log::warn!("Reset ignored while a submission is in progress");
            return;
        }

        self.draft.clear();
        self.selection.select_member(None);
        self.binder.reset();
        self.last_outcome = None;
        log::info!("Exit form reset");
    }
}

// Network calls and their completions
impl ExitFormManager {
    fn spawn<F>(&mut self, call: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            // The receiver lives as long as the manager; a send error only
            // means the form was dropped.
            let _ = tx.send(call.await);
        });
    }

    fn spawn_centers(&mut self, ticket: CentersTicket) {
        let lookup = Arc::clone(&self.lookup);
        self.spawn(async move {
            let result = lookup.fetch_centers().await;
            Completion::Centers(ticket, result)
        });
    }

    fn spawn_members(&mut self, ticket: MembersTicket) {
        let lookup = Arc::clone(&self.lookup);
        self.spawn(async move {
            let result = lookup.fetch_members(ticket.center()).await;
            Completion::Members(ticket, result)
        });
    }

    fn spawn_detail(&mut self, ticket: DetailTicket) {
        let lookup = Arc::clone(&self.lookup);
        self.spawn(async move {
            let result = lookup.fetch_member_detail(ticket.member()).await;
            Completion::Detail(ticket, result)
        });
    }

    fn apply_completion(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match completion {
            Completion::Centers(ticket, result) => {
                let selected_before = self.selection.selected_center().cloned();
                self.selection.apply_centers(ticket, result);
                if selected_before.is_some() && self.selection.selected_center().is_none() {
                    self.binder.reset();
                }
            }
            Completion::Members(ticket, result) => {
                self.selection.apply_members(ticket, result);
            }
            Completion::Detail(ticket, result) => {
                if let BindOutcome::Applied(detail) = self.binder.apply(ticket, result, &mut self.draft) {
                    log::debug!("Submit action shown for member {}", detail.id);
                }
            }
            Completion::Submitted(outcome) => {
                log::info!("Submission finished: {:?}", outcome);
                self.last_outcome = Some(outcome);
            }
        }
    }
}
