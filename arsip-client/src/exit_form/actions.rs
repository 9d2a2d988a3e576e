use super::state::{Attachment, CenterCode, MemberId};

/// Operator events on the exit form.
#[derive(Debug, Clone)]
pub enum ExitFormAction {
    // Selection controls
    Mount,
    ActivateCenter,
    SelectCenter(Option<CenterCode>),
    SelectMember(Option<MemberId>),

    // Operator-entered fields
    SetExitDate(String),
    SetNotes(String),
    Attach(Attachment),
    ClearAttachment,

    // Form control
    Submit,
    Reset,
}

impl ExitFormAction {
    pub fn description(&self) -> &'static str {
        match self {
            ExitFormAction::Mount => "Mounting exit form",
            ExitFormAction::ActivateCenter => "Refreshing center list",
            ExitFormAction::SelectCenter(Some(_)) => "Selecting center",
            ExitFormAction::SelectCenter(None) => "Clearing center",
            ExitFormAction::SelectMember(Some(_)) => "Selecting member",
            ExitFormAction::SelectMember(None) => "Clearing member",
            ExitFormAction::SetExitDate(_) => "Updating exit date",
            ExitFormAction::SetNotes(_) => "Updating notes",
            ExitFormAction::Attach(_) => "Attaching file",
            ExitFormAction::ClearAttachment => "Removing attachment",
            ExitFormAction::Submit => "Submitting exit record",
            ExitFormAction::Reset => "Resetting form",
        }
    }

    pub fn requires_network(&self) -> bool {
        match self {
            ExitFormAction::Mount
            | ExitFormAction::ActivateCenter
            | ExitFormAction::SelectCenter(Some(_))
            | ExitFormAction::SelectMember(Some(_))
            | ExitFormAction::Submit => true,

            ExitFormAction::SelectCenter(None)
            | ExitFormAction::SelectMember(None)
            | ExitFormAction::SetExitDate(_)
            | ExitFormAction::SetNotes(_)
            | ExitFormAction::Attach(_)
            | ExitFormAction::ClearAttachment
            | ExitFormAction::Reset => false,
        }
    }
}
