use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque center identifier issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CenterCode(String);

impl CenterCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CenterCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CenterCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// Member identifier, e.g. `123456_BUDI_SANTOSO` (folder name in the archive).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split `NNNNNN_NAME_PARTS` into the member number and a readable name.
    pub fn number_and_name(&self) -> Option<(&str, String)> {
        let (number, name) = self.0.split_once('_')?;
        if number.len() != 6 || !number.chars().all(|c| c.is_ascii_digit()) || name.is_empty() {
            return None;
        }
        Some((number, name.replace('_', " ")))
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSummary {
    pub id: MemberId,
    pub center_code: CenterCode,
    pub display_label: String,
}

impl MemberSummary {
    pub fn new(id: MemberId, center_code: CenterCode) -> Self {
        let display_label = match id.number_and_name() {
            Some((number, name)) => format!("{} - {}", number, name),
            None => id.to_string(),
        };

        Self {
            id,
            center_code,
            display_label,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberDetail {
    pub id: MemberId,
    pub path: String,
    /// Remaining read-only columns returned by the backend.
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Population state of one selection control.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionState<T> {
    Empty,
    Loading,
    Populated(Vec<T>),
    Failed(String),
}

impl<T> Default for SelectionState<T> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<T> SelectionState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, SelectionState::Loading)
    }

    pub fn items(&self) -> &[T] {
        match self {
            SelectionState::Populated(items) => items,
            _ => &[],
        }
    }
}

/// Monotonic request stamp; only a response carrying the current value is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    pub fn bump(&mut self) -> Generation {
        self.0 += 1;
        *self
    }
}

/// One rendered entry of a select control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// `None` for placeholders.
    pub value: Option<String>,
    pub label: String,
    /// Selectable but does nothing when chosen.
    pub inert: bool,
}

impl SelectOption {
    pub fn placeholder(label: impl Into<String>) -> Self {
        Self {
            value: None,
            label: label.into(),
            inert: true,
        }
    }

    pub fn item(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            label: label.into(),
            inert: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_for_file_name(&file_name).to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }
}

fn mime_for_file_name(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        _ => "application/octet-stream",
    }
}

/// Operator-entered fields plus the derived `path`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub exit_date: String,
    pub notes: String,
    pub attachment: Option<Attachment>,
    pub path: String,
}

impl FormDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
