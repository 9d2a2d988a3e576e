pub mod actions;
pub mod binder;
pub mod client;
pub mod dialog;
pub mod manager;
pub mod selection;
pub mod state;
pub mod submission;
pub mod view;


pub use actions::ExitFormAction;
pub use client::{ExitRegistrar, ExitSubmission, LookupClient, SubmitReceipt};
pub use dialog::{ConfirmPrompt, Notice, NoticeLevel, Notifier};
pub use manager::ExitFormManager;
pub use state::{
    Attachment, CenterCode, FormDraft, MemberDetail, MemberId, MemberSummary, SelectOption,
    SelectionState,
};
pub use submission::{SubmissionWorkflow, SubmitOutcome, SubmitPhase};
pub use view::SubmitActionState;

// Re-export for convenience
pub mod prelude {
    pub use super::actions::ExitFormAction;
    pub use super::client::{ExitRegistrar, LookupClient};
    pub use super::dialog::{ConfirmPrompt, Notice, NoticeLevel, Notifier};
    pub use super::manager::ExitFormManager;
    pub use super::state::{Attachment, CenterCode, MemberId, SelectionState};
    pub use super::submission::SubmitOutcome;
}
