use super::state::{Attachment, CenterCode, FormDraft, MemberDetail, MemberId, MemberSummary};
use crate::error::{LookupError, LookupResult, SubmitError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// The three read calls behind the cascading selects.
///
/// Each call is a single round-trip with no retries; callers decide whether a
/// result is still wanted when it arrives.
#[async_trait]
pub trait LookupClient: Send + Sync {
    async fn fetch_centers(&self) -> LookupResult<Vec<CenterCode>>;

    async fn fetch_members(&self, center: &CenterCode) -> LookupResult<Vec<MemberSummary>>;

    async fn fetch_member_detail(&self, id: &MemberId) -> LookupResult<MemberDetail>;
}

/// The write call registering a member exit.
#[async_trait]
pub trait ExitRegistrar: Send + Sync {
    async fn register_exit(&self, submission: &ExitSubmission) -> Result<SubmitReceipt, SubmitError>;
}

// Wire types for the `{ "data": [...] }` envelopes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRow {
    #[serde(rename = "ID_NAMA_ANGGOTA")]
    pub id_nama_anggota: String,
    #[serde(rename = "NOMOR_CENTER")]
    pub nomor_center: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDetailRow {
    #[serde(rename = "PATH")]
    pub path: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

pub fn centers_from_envelope(envelope: DataEnvelope<String>) -> Vec<CenterCode> {
    envelope.data.into_iter().map(CenterCode::new).collect()
}

/// The backend lists one row per archived file, so a member with several
/// documents repeats and loose files under a center carry a blank id. Blank
/// ids are dropped and repeats collapse to their first occurrence.
pub fn members_from_envelope(envelope: DataEnvelope<MemberRow>) -> Vec<MemberSummary> {
    let mut seen = HashSet::new();
    envelope
        .data
        .into_iter()
        .filter(|row| !row.id_nama_anggota.trim().is_empty())
        .filter(|row| seen.insert(row.id_nama_anggota.clone()))
        .map(|row| MemberSummary::new(MemberId::new(row.id_nama_anggota), CenterCode::new(row.nomor_center)))
        .collect()
}

/// Exactly one row is expected; zero or several is treated as a decode failure.
pub fn detail_from_envelope(
    id: &MemberId,
    envelope: DataEnvelope<MemberDetailRow>,
) -> LookupResult<MemberDetail> {
    let count = envelope.data.len();
    let mut rows = envelope.data.into_iter();

    match (rows.next(), count) {
        (Some(row), 1) => Ok(MemberDetail {
            id: id.clone(),
            path: row.path,
            extra: row.extra,
        }),
        _ => Err(LookupError::Decode(format!(
            "expected exactly one record for member {}, got {}",
            id, count
        ))),
    }
}

/// Snapshot of the form taken when a submit run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitSubmission {
    pub center: Option<CenterCode>,
    pub member: Option<MemberId>,
    pub exit_date: String,
    pub notes: String,
    pub path: String,
    pub attachment: Option<Attachment>,
}

impl ExitSubmission {
    pub fn from_draft(draft: &FormDraft, center: Option<&CenterCode>, member: Option<&MemberId>) -> Self {
        Self {
            center: center.cloned(),
            member: member.cloned(),
            exit_date: draft.exit_date.trim().to_string(),
            notes: draft.notes.clone(),
            path: draft.path.clone(),
            attachment: draft.attachment.clone(),
        }
    }

    /// Text fields in the order they are written to the multipart body.
    /// Notes and path are always sent, empty or not.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();

        if let Some(center) = &self.center {
            fields.push(("NOMOR_CENTER", center.to_string()));
        }
        if let Some(member) = &self.member {
            fields.push(("ID_NAMA_ANGGOTA", member.to_string()));
        }
        fields.push(("TANGGAL_KELUAR", self.exit_date.clone()));
        fields.push(("KETERANGAN", self.notes.clone()));
        fields.push(("PATH", self.path.clone()));

        fields
    }
}

pub const FILE_FIELD: &str = "FILE";

/// Whatever the backend answered on success.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReceipt {
    pub message: Option<String>,
    pub body: serde_json::Value,
}

impl SubmitReceipt {
    pub fn from_body(text: &str) -> Self {
        let body = serde_json::from_str::<serde_json::Value>(text)
            .unwrap_or_else(|_| serde_json::Value::String(text.to_string()));

        let message = body
            .get("message")
            .and_then(|m| m.as_str())
            .map(|m| m.to_string());

        Self { message, body }
    }
}
