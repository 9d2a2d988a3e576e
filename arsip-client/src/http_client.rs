//! reqwest transport for the archive backend.

use crate::config::ApiConfig;
use crate::error::{ConfigError, LookupError, LookupResult, SubmitError};
use crate::exit_form::client::{
    centers_from_envelope, detail_from_envelope, members_from_envelope, DataEnvelope, ExitRegistrar,
    ExitSubmission, LookupClient, MemberDetailRow, MemberRow, SubmitReceipt, FILE_FIELD,
};
use crate::exit_form::state::{CenterCode, MemberDetail, MemberId, MemberSummary};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

const CENTERS: &[&str] = &["api", "data_center"];
const MEMBER_DETAIL: &[&str] = &["api", "anggota"];
const EXIT_REGISTRATION: &[&str] = &["api", "anggota_keluar"];

#[derive(Debug, Clone)]
pub struct ArsipHttpClient {
    base_url: Url,
    client: Client,
}

impl ArsipHttpClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: config.parsed_base_url()?,
            client: Client::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append percent-encoded path segments to the base URL.
    fn endpoint(&self, prefix: &[&str], tail: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        // `parsed_base_url` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(prefix);
            if let Some(segment) = tail {
                path.push(segment);
            }
        }
        url
    }

    async fn get_data<T: DeserializeOwned>(&self, url: Url) -> LookupResult<DataEnvelope<T>> {
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| LookupError::Network(format!("GET {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(LookupError::Network(format!(
                "GET {} returned {}",
                url,
                response.status()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LookupError::Network(format!("Reading {} failed: {}", url, e)))?;

        serde_json::from_slice(&body)
            .map_err(|e| LookupError::Decode(format!("Unexpected payload from {}: {}", url, e)))
    }

    fn multipart_body(submission: &ExitSubmission) -> Result<Form, SubmitError> {
        let mut form = Form::new();
        for (name, value) in submission.text_fields() {
            form = form.text(name, value);
        }

        if let Some(attachment) = &submission.attachment {
            let part = Part::bytes(attachment.bytes.clone())
                .file_name(attachment.file_name.clone())
                .mime_str(&attachment.mime_type)
                .map_err(|e| SubmitError::Network(format!("Invalid attachment type: {}", e)))?;
            form = form.part(FILE_FIELD, part);
        }

        Ok(form)
    }
}

#[async_trait]
impl LookupClient for ArsipHttpClient {
    async fn fetch_centers(&self) -> LookupResult<Vec<CenterCode>> {
        let envelope = self.get_data::<String>(self.endpoint(CENTERS, None)).await?;
        Ok(centers_from_envelope(envelope))
    }

    async fn fetch_members(&self, center: &CenterCode) -> LookupResult<Vec<MemberSummary>> {
        let url = self.endpoint(CENTERS, Some(center.as_str()));
        let envelope = self.get_data::<MemberRow>(url).await?;
        Ok(members_from_envelope(envelope))
    }

    async fn fetch_member_detail(&self, id: &MemberId) -> LookupResult<MemberDetail> {
        let url = self.endpoint(MEMBER_DETAIL, Some(id.as_str()));
        let envelope = self.get_data::<MemberDetailRow>(url).await?;
        detail_from_envelope(id, envelope)
    }
}

#[async_trait]
impl ExitRegistrar for ArsipHttpClient {
    async fn register_exit(&self, submission: &ExitSubmission) -> Result<SubmitReceipt, SubmitError> {
        let url = self.endpoint(EXIT_REGISTRATION, None);
        let form = Self::multipart_body(submission)?;
        log::debug!("POST {} (multipart)", url);

        let response = self
            .client
            .post(url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| SubmitError::Network(format!("POST {} failed: {}", url, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::Network(format!("Reading {} failed: {}", url, e)))?;

        if !status.is_success() {
            return Err(SubmitError::Server {
                status: status.as_u16(),
                body,
            });
        }

        Ok(SubmitReceipt::from_body(&body))
    }
}
