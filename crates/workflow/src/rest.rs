//! REST implementation of the directory traits over `reqwest`.
//!
//! Error mapping mirrors the server's responses: 400 bodies carry a
//! field-scoped message, 404 a plain message, anything else becomes
//! [`ClientError::Server`]. Reads are retried once on a transport error;
//! writes are never retried because a timed-out create may still have
//! committed.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use spectrum_types::{
    CaseSummary, CategoryGroup, Complainant, ComplainantInput, ComplainantSummary, Complaint,
    ComplaintInput, ErrorBody, PatientSummary,
};
use uuid::Uuid;

use crate::directories::{
    CaseDirectory, CategoryDirectory, ComplainantDirectory, ComplaintApi, PatientDirectory,
};
use crate::error::ClientError;

/// Directory client speaking to the REST interface at a fixed base URL.
#[derive(Debug, Clone)]
pub struct RestDirectory {
    base_url: String,
    http: reqwest::Client,
}

impl RestDirectory {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET with one retry on a transport error.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        match self.get_once(path, query).await {
            Err(ClientError::Network(first)) => {
                tracing::debug!(path, error = %first, "read failed, retrying once");
                self.get_once(path, query).await
            }
            other => other,
        }
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(map_transport)?;
        decode(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(map_transport)?;
        decode(response).await
    }
}

fn map_transport(err: reqwest::Error) -> ClientError {
    ClientError::Network(err.to_string())
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return response.json().await.map_err(map_transport);
    }

    let body: Option<ErrorBody> = response.json().await.ok();
    let message = body
        .as_ref()
        .map(|b| b.message.clone())
        .unwrap_or_else(|| format!("unexpected status {status}"));
    match status {
        StatusCode::BAD_REQUEST => Err(ClientError::Validation {
            field: body.and_then(|b| b.field),
            message,
        }),
        StatusCode::NOT_FOUND => Err(ClientError::NotFound(message)),
        other => Err(ClientError::Server(other.as_u16())),
    }
}

impl CategoryDirectory for RestDirectory {
    async fn list_categories(&self) -> Result<Vec<CategoryGroup>, ClientError> {
        self.get_json("/complaint-categories", &[]).await
    }
}

impl PatientDirectory for RestDirectory {
    async fn search_patients(&self, query: &str) -> Result<Vec<PatientSummary>, ClientError> {
        self.get_json("/patients", &[("q", query.to_owned())]).await
    }
}

impl CaseDirectory for RestDirectory {
    async fn cases_for_patient(&self, patient_id: Uuid) -> Result<Vec<CaseSummary>, ClientError> {
        self.get_json("/cases", &[("patient_id", patient_id.to_string())])
            .await
    }
}

impl ComplainantDirectory for RestDirectory {
    async fn search_complainants(
        &self,
        query: &str,
    ) -> Result<Vec<ComplainantSummary>, ClientError> {
        self.get_json("/complainants", &[("q", query.to_owned())])
            .await
    }

    async fn create_complainant(
        &self,
        input: &ComplainantInput,
    ) -> Result<Complainant, ClientError> {
        self.post_json("/complainants", input).await
    }
}

impl ComplaintApi for RestDirectory {
    async fn create_complaint(&self, input: &ComplaintInput) -> Result<Complaint, ClientError> {
        self.post_json("/complaints", input).await
    }

    async fn fetch_complaint(&self, id: Uuid) -> Result<Complaint, ClientError> {
        self.get_json(&format!("/complaints/{id}"), &[]).await
    }
}
