use super::client::{ExitRegistrar, ExitSubmission, SubmitReceipt};
use super::dialog::{ConfirmPrompt, Notice, NoticeLevel, Notifier};
use crate::error::{SubmitError, ValidationError};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Validating,
    Confirming,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Another run was already in progress.
    Ignored,
    Invalid(ValidationError),
    Declined,
    Succeeded(SubmitReceipt),
    Failed(SubmitError),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Succeeded(_))
    }
}

pub fn validate(submission: &ExitSubmission) -> Result<(), ValidationError> {
    if submission.exit_date.trim().is_empty() {
        return Err(ValidationError::MissingExitDate);
    }
    Ok(())
}

/// Guarded confirm-then-submit state machine.
///
/// Cloning shares the phase, so clones guard the same form: at most one run
/// exists at a time, from validation until its outcome is reported.
#[derive(Debug, Clone)]
pub struct SubmissionWorkflow {
    phase: Arc<Mutex<SubmitPhase>>,
}

impl Default for SubmissionWorkflow {
    fn default() -> Self {
        Self {
            phase: Arc::new(Mutex::new(SubmitPhase::Idle)),
        }
    }
}

impl SubmissionWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SubmitPhase {
        *self.phase.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_busy(&self) -> bool {
        self.phase() != SubmitPhase::Idle
    }

    /// Claim the workflow. `None` while another run holds it.
    pub fn try_start(&self) -> Option<SubmitRun> {
        let mut phase = self.phase.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if *phase != SubmitPhase::Idle {
            log::warn!("Submit ignored, workflow is {:?}", *phase);
            return None;
        }

        *phase = SubmitPhase::Validating;
        Some(SubmitRun {
            phase: Arc::clone(&self.phase),
        })
    }

    pub async fn submit(
        &self,
        submission: ExitSubmission,
        notifier: &dyn Notifier,
        registrar: &dyn ExitRegistrar,
    ) -> SubmitOutcome {
        match self.try_start() {
            Some(run) => run.execute(submission, notifier, registrar).await,
            None => SubmitOutcome::Ignored,
        }
    }
}

/// Exclusive handle on one submission; the workflow returns to `Idle` when
/// it is dropped.
#[derive(Debug)]
pub struct SubmitRun {
    phase: Arc<Mutex<SubmitPhase>>,
}

impl SubmitRun {
    fn enter(&self, next: SubmitPhase) {
        *self.phase.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = next;
    }

    pub async fn execute(
        self,
        submission: ExitSubmission,
        notifier: &dyn Notifier,
        registrar: &dyn ExitRegistrar,
    ) -> SubmitOutcome {
        self.enter(SubmitPhase::Validating);
        if let Err(e) = validate(&submission) {
            log::warn!("Submit blocked: {}", e);
            notifier.notify(Notice::new(
                NoticeLevel::Warning,
                "Incomplete form",
                "Fill in the exit date before saving.",
            ));
            return SubmitOutcome::Invalid(e);
        }

        self.enter(SubmitPhase::Confirming);
        if !notifier.confirm(&ConfirmPrompt::save_exit_record()).await {
            log::info!("Operator declined to save the exit record");
            return SubmitOutcome::Declined;
        }

        self.enter(SubmitPhase::Submitting);
        log::info!(
            "Registering exit for member {}",
            submission.member.as_ref().map(|m| m.as_str()).unwrap_or("<none>")
        );

        match registrar.register_exit(&submission).await {
            Ok(receipt) => {
                self.enter(SubmitPhase::Succeeded);
                let message = receipt
                    .message
                    .clone()
                    .unwrap_or_else(|| "Exit record saved.".to_string());
                notifier.notify(Notice::new(NoticeLevel::Success, "Saved", message));
                SubmitOutcome::Succeeded(receipt)
            }
            Err(e) => {
                self.enter(SubmitPhase::Failed);
                log::error!("Exit registration failed: {}", e);
                notifier.notify(Notice::new(
                    NoticeLevel::Error,
                    "Save failed",
                    format!("The exit record was not saved: {}", e),
                ));
                SubmitOutcome::Failed(e)
            }
        }
    }
}

impl Drop for SubmitRun {
    fn drop(&mut self) {
        self.enter(SubmitPhase::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_form::state::{Attachment, CenterCode, FormDraft, MemberId};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    #[derive(Default)]
    struct ScriptedNotifier {
        answer: bool,
        confirms: AtomicUsize,
        notices: Mutex<Vec<Notice>>,
    }

    impl ScriptedNotifier {
        fn answering(answer: bool) -> Self {
            Self {
                answer,
                ..Self::default()
            }
        }

        fn levels(&self) -> Vec<NoticeLevel> {
            self.notices.lock().unwrap().iter().map(|n| n.level).collect()
        }
    }

    #[async_trait]
    impl Notifier for ScriptedNotifier {
        async fn confirm(&self, _prompt: &ConfirmPrompt) -> bool {
            self.confirms.fetch_add(1, Ordering::SeqCst);
            self.answer
        }

        fn notify(&self, notice: Notice) {
            self.notices.lock().unwrap().push(notice);
        }
    }

    #[derive(Default)]
    struct RecordingRegistrar {
        fail: bool,
        gate: Option<Arc<Notify>>,
        posted: Mutex<Vec<ExitSubmission>>,
    }

    #[async_trait]
    impl ExitRegistrar for RecordingRegistrar {
        async fn register_exit(&self, submission: &ExitSubmission) -> Result<SubmitReceipt, SubmitError> {
            self.posted.lock().unwrap().push(submission.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail {
                return Err(SubmitError::Server {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(SubmitReceipt::from_body(r#"{"message":"ok"}"#))
        }
    }

    fn submission(exit_date: &str) -> ExitSubmission {
        let draft = FormDraft {
            exit_date: exit_date.to_string(),
            notes: "pindah domisili".to_string(),
            attachment: Some(Attachment::new("surat.pdf", b"%PDF-1.4".to_vec())),
            path: "/archive/2023/M42".to_string(),
        };
        ExitSubmission::from_draft(&draft, Some(&CenterCode::new("C001")), Some(&MemberId::new("M42")))
    }

    #[tokio::test]
    async fn empty_exit_date_warns_without_posting() {
        let workflow = SubmissionWorkflow::new();
        let notifier = ScriptedNotifier::answering(true);
        let registrar = RecordingRegistrar::default();

        let outcome = workflow.submit(submission("  "), &notifier, &registrar).await;

        assert_eq!(outcome, SubmitOutcome::Invalid(ValidationError::MissingExitDate));
        assert_eq!(notifier.levels(), vec![NoticeLevel::Warning]);
        assert_eq!(notifier.confirms.load(Ordering::SeqCst), 0);
        assert!(registrar.posted.lock().unwrap().is_empty());
        assert_eq!(workflow.phase(), SubmitPhase::Idle);
    }

    #[tokio::test]
    async fn declining_confirmation_posts_nothing() {
        let workflow = SubmissionWorkflow::new();
        let notifier = ScriptedNotifier::answering(false);
        let registrar = RecordingRegistrar::default();

        let outcome = workflow.submit(submission("2024-01-31"), &notifier, &registrar).await;

        assert_eq!(outcome, SubmitOutcome::Declined);
        assert!(registrar.posted.lock().unwrap().is_empty());
        assert!(notifier.levels().is_empty());
        assert_eq!(workflow.phase(), SubmitPhase::Idle);
    }

    #[tokio::test]
    async fn confirmed_submit_posts_once_and_reports_success() {
        let workflow = SubmissionWorkflow::new();
        let notifier = ScriptedNotifier::answering(true);
        let registrar = RecordingRegistrar::default();

        let outcome = workflow.submit(submission("2024-01-31"), &notifier, &registrar).await;

        assert!(outcome.is_success());
        let posted = registrar.posted.lock().unwrap();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].attachment.as_ref().map(|a| a.file_name.as_str()), Some("surat.pdf"));
        assert_eq!(notifier.levels(), vec![NoticeLevel::Success]);
    }

    #[tokio::test]
    async fn server_failure_reports_error_and_returns_to_idle() {
        let workflow = SubmissionWorkflow::new();
        let notifier = ScriptedNotifier::answering(true);
        let registrar = RecordingRegistrar {
            fail: true,
            ..RecordingRegistrar::default()
        };

        let outcome = workflow.submit(submission("2024-01-31"), &notifier, &registrar).await;

        assert!(matches!(outcome, SubmitOutcome::Failed(SubmitError::Server { status: 500, .. })));
        assert_eq!(notifier.levels(), vec![NoticeLevel::Error]);
        assert_eq!(workflow.phase(), SubmitPhase::Idle);
    }

    #[tokio::test]
    async fn rapid_second_trigger_is_ignored_while_in_flight() {
        let workflow = SubmissionWorkflow::new();
        let notifier = ScriptedNotifier::answering(true);
        let gate = Arc::new(Notify::new());
        let registrar = RecordingRegistrar {
            gate: Some(Arc::clone(&gate)),
            ..RecordingRegistrar::default()
        };

        let first = workflow.submit(submission("2024-01-31"), &notifier, &registrar);
        let second = async {
            tokio::task::yield_now().await;
            assert_eq!(workflow.phase(), SubmitPhase::Submitting);
            let outcome = workflow.submit(submission("2024-01-31"), &notifier, &registrar).await;
            gate.notify_one();
            outcome
        };

        let (first, second) = tokio::join!(first, second);

        assert!(first.is_success());
        assert_eq!(second, SubmitOutcome::Ignored);
        assert_eq!(registrar.posted.lock().unwrap().len(), 1);
        assert_eq!(notifier.confirms.load(Ordering::SeqCst), 1);
    }
}
