use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

impl ConfirmPrompt {
    pub fn save_exit_record() -> Self {
        Self {
            title: "Save exit record?".to_string(),
            message: "The member exit will be registered and cannot be undone.".to_string(),
            confirm_label: "Yes, save".to_string(),
            cancel_label: "Cancel".to_string(),
        }
    }
}

/// Confirmation and alert surface provided by the host page.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Blocking-style yes/no; `true` means the operator confirmed.
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool;

    fn notify(&self, notice: Notice);
}
