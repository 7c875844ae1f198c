//! VIPS HTTP client.
//!
//! Every operation returns an [`ApiResponse`]: a success flag plus the JSON
//! body VIPS sent back. Transport and decoding failures never surface as
//! `Err`; they become an unsuccessful response whose body carries
//! `{"error": {"message": ...}}`, so callers handle one shape.

use chrono::NaiveDate;
use secrecy::ExposeSecret;
use serde_json::{Value, json};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::VipsConfig;
use crate::error::VipsError;
use crate::vips::status::{is_record_not_found, is_success};

/// Outcome of a VIPS call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub is_success: bool,
    pub data: Value,
}

impl ApiResponse {
    fn failed(error: VipsError) -> Self {
        Self {
            is_success: false,
            data: json!({ "error": { "message": error.to_string() } }),
        }
    }
}

/// Fields of a review application. Unset fields are sent as `null`.
#[derive(Debug, Clone, Default)]
pub struct ApplicationFields {
    pub email: Option<String>,
    pub fax: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub form_date: Option<String>,
    pub phone: Option<String>,
    pub presentation_type: Option<String>,
    pub applicant_role: Option<String>,
    /// Defaults to `"N"`.
    pub manual_entry: Option<String>,
    /// Defaults to `"PERS"`.
    pub notice_subject_type: Option<String>,
}

impl ApplicationFields {
    /// JSON body for the application create call.
    pub fn payload(&self) -> Value {
        json!({
            "applicationInfo": {
                "email": self.email,
                "faxNo": self.fax,
                "firstGivenNm": self.first_name,
                "formData": self.form_date,
                "manualEntryYN": self.manual_entry.as_deref().unwrap_or("N"),
                "noticeSubjectCd": self.notice_subject_type.as_deref().unwrap_or("PERS"),
                "phoneNo": self.phone,
                "presentationTypeCd": self.presentation_type,
                "reviewRoleTypeCd": self.applicant_role,
                "secondGivenNm": self.middle_name,
                "surnameNm": self.last_name,
            }
        })
    }
}

/// Join path segments with `/`, in order, without escaping.
pub fn build_endpoint<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|segment| segment.as_ref())
        .collect::<Vec<&str>>()
        .join("/")
}

/// A fresh correlation id for log tracing.
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Client for the VIPS API.
#[derive(Debug, Clone)]
pub struct VipsClient {
    config: VipsConfig,
    http: reqwest::Client,
}

impl VipsClient {
    pub fn new(config: VipsConfig) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Use a preconfigured HTTP client (timeouts, proxies, TLS roots).
    pub fn with_http_client(config: VipsConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    pub fn root_url(&self) -> &str {
        &self.config.root_url
    }

    /// Prohibition status. "Record not found" counts as a successful lookup.
    pub async fn status_get(&self, prohibition_id: &str, correlation_id: &str) -> ApiResponse {
        let endpoint = build_endpoint(&[self.root_url(), prohibition_id, "status", correlation_id]);
        let response = self.get(&endpoint, correlation_id).await;
        ApiResponse {
            is_success: is_success(&response.data) || is_record_not_found(&response.data),
            data: response.data,
        }
    }

    pub async fn payment_get(&self, prohibition_id: &str, correlation_id: &str) -> ApiResponse {
        let endpoint = build_endpoint(&[
            self.root_url(),
            prohibition_id,
            "payment",
            "status",
            correlation_id,
        ]);
        self.get(&endpoint, correlation_id).await
    }

    pub async fn disclosure_get(&self, document_id: &str, correlation_id: &str) -> ApiResponse {
        let endpoint =
            build_endpoint(&[self.root_url(), document_id, "disclosure", correlation_id]);
        self.get(&endpoint, correlation_id).await
    }

    pub async fn application_get(&self, guid: &str, correlation_id: &str) -> ApiResponse {
        let endpoint = build_endpoint(&[self.root_url(), guid, "application", correlation_id]);
        self.get(&endpoint, correlation_id).await
    }

    /// VIPS has no update endpoint yet; this re-reads the application.
    pub async fn application_update(&self, guid: &str, correlation_id: &str) -> ApiResponse {
        self.application_get(guid, correlation_id).await
    }

    pub async fn application_create(
        &self,
        form_type: &str,
        prohibition_id: &str,
        fields: &ApplicationFields,
        correlation_id: &str,
    ) -> ApiResponse {
        let endpoint = build_endpoint(&[
            self.root_url(),
            form_type,
            prohibition_id,
            "application",
            correlation_id,
        ]);
        self.create(&endpoint, &fields.payload(), correlation_id).await
    }

    /// Review time slots available on `review_date`.
    pub async fn schedule_get(
        &self,
        notice_type_code: &str,
        review_type_code: &str,
        review_date: NaiveDate,
        correlation_id: &str,
    ) -> ApiResponse {
        let review_date = review_date.format("%Y-%m-%d").to_string();
        let endpoint = build_endpoint(&[
            self.root_url(),
            notice_type_code,
            review_type_code,
            review_date.as_str(),
            "review",
            "availableTimeSlot",
            correlation_id,
        ]);
        self.get(&endpoint, correlation_id).await
    }

    pub async fn health_get(&self) -> ApiResponse {
        let endpoint = build_endpoint(&[self.root_url(), "api", "utility", "ping"]);
        self.get(&endpoint, &generate_correlation_id()).await
    }

    async fn get(&self, endpoint: &str, correlation_id: &str) -> ApiResponse {
        debug!(endpoint = %endpoint, "VIPS GET");
        let request = self.http.get(endpoint);
        match self.send(request, endpoint, correlation_id).await {
            // VIPS answers both "found" and "not found" with a JSON body
            Ok(data) => ApiResponse {
                is_success: data.get("resp").is_some(),
                data,
            },
            Err(e) => ApiResponse::failed(e),
        }
    }

    async fn create(&self, endpoint: &str, payload: &Value, correlation_id: &str) -> ApiResponse {
        debug!(endpoint = %endpoint, "VIPS POST");
        let request = self.http.post(endpoint).json(payload);
        match self.send(request, endpoint, correlation_id).await {
            Ok(data) => ApiResponse {
                is_success: true,
                data,
            },
            Err(e) => ApiResponse::failed(e),
        }
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &str,
        correlation_id: &str,
    ) -> Result<Value, VipsError> {
        let response = request
            .basic_auth(
                &self.config.username,
                Some(self.config.password.expose_secret()),
            )
            .send()
            .await
            .map_err(|e| {
                warn!(correlation_id = %correlation_id, "No response from the VIPS API: {e}");
                VipsError::Unreachable {
                    endpoint: endpoint.to_string(),
                    reason: e.to_string(),
                }
            })?;

        let status = response.status();
        let data: Value = response.json().await.map_err(|e| {
            warn!(
                correlation_id = %correlation_id,
                status = %status,
                "VIPS API returned a non-JSON body: {e}"
            );
            VipsError::InvalidResponse {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            }
        })?;

        info!(
            correlation_id = %correlation_id,
            status = %status,
            "VIPS API response: {data}"
        );
        Ok(data)
    }
}
