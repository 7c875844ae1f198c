//! Typed, lenient views over VIPS response bodies.
//!
//! VIPS omits fields inconsistently, so every accessor here treats a missing
//! key as "no match" instead of failing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

use crate::lenient;

/// Error message VIPS returns when a prohibition is unknown.
pub const RECORD_NOT_FOUND: &str = "Record not found";

/// Prohibition type, from `noticeTypeCd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProhibitionType {
    /// Immediate roadside prohibition.
    Irp,
    /// Administrative driving prohibition.
    Adp,
    /// Unlicensed driver prohibition.
    Ul,
}

impl ProhibitionType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "IRP" => Some(Self::Irp),
            "ADP" => Some(Self::Adp),
            "UL" => Some(Self::Ul),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Irp => "IRP",
            Self::Adp => "ADP",
            Self::Ul => "UL",
        }
    }
}

/// The `data.status` object of a prohibition status lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProhibitionStatus {
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub surname_nm: Option<String>,
    /// VIPS datetime the prohibition took effect.
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub effective_dt: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub notice_type_cd: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub notice_served_dt: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub driver_licence_seized_yn: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub review_created_yn: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub review_form_submitted_yn: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub application_id: Option<String>,
}

impl ProhibitionStatus {
    /// Extract the status from a VIPS body.
    ///
    /// Accepts a full response (`{"resp": ..., "data": {"status": {...}}}`)
    /// or a bare status object. Error and not-found bodies yield `None`.
    /// Fields of an unexpected type read as `None`.
    pub fn from_body(body: &Value) -> Option<Self> {
        let status = status_object(body)?;
        Some(Self::deserialize(status).unwrap_or_default())
    }

    pub fn prohibition_type(&self) -> Option<ProhibitionType> {
        self.notice_type_cd.as_deref().and_then(ProhibitionType::from_code)
    }

    pub fn is_licence_seized(&self) -> bool {
        is_yes(self.driver_licence_seized_yn.as_deref())
    }

    pub fn is_review_created(&self) -> bool {
        is_yes(self.review_created_yn.as_deref())
    }
}

fn is_yes(flag: Option<&str>) -> bool {
    flag == Some("Y")
}

/// True if the body is a successful lookup (`resp == "success"`).
pub fn is_success(body: &Value) -> bool {
    body.get("resp").and_then(Value::as_str) == Some("success")
}

/// True if the body is VIPS' "Record not found" error.
pub fn is_record_not_found(body: &Value) -> bool {
    body.pointer("/error/message").and_then(Value::as_str) == Some(RECORD_NOT_FOUND)
}

/// True if the body describes a prohibition VIPS knows about.
pub fn is_found(body: &Value) -> bool {
    status_object(body).is_some()
}

/// The status object of a found record, located by shape alone.
fn status_object(body: &Value) -> Option<&Value> {
    let object = body.as_object()?;

    let status = if let Some(data) = object.get("data") {
        data.get("status")?
    } else if object.contains_key("error") || object.contains_key("resp") || object.is_empty() {
        return None;
    } else {
        body
    };

    status.is_object().then_some(status)
}

/// Decompose to NFKD and drop everything outside ASCII.
///
/// `"Coté"` becomes `"Cote"`; characters with no ASCII base are removed.
pub fn remove_accents(input: &str) -> String {
    input.nfkd().filter(char::is_ascii).collect()
}

/// Case- and accent-insensitive name comparison.
pub fn names_match(a: &str, b: &str) -> bool {
    remove_accents(a).to_uppercase() == remove_accents(b).to_uppercase()
}

/// Compare a user-supplied last name with the surname on a VIPS status body.
pub fn is_last_name_match(vips_body: &Value, last_name: &str) -> bool {
    ProhibitionStatus::from_body(vips_body)
        .and_then(|status| status.surname_nm)
        .is_some_and(|surname| {
            tracing::debug!(vips = %surname, submitted = %last_name, "Comparing last names");
            names_match(&surname, last_name)
        })
}

/// Inspect a payment status body.
///
/// Returns `(valid_response, is_paid)`: the body is valid when it carries a
/// `resp` key and paid when it holds `data.transactionInfo`.
pub fn has_been_paid(payment_body: &Value) -> (bool, bool) {
    let valid_response = payment_body.get("resp").is_some();
    let is_paid = payment_body.pointer("/data/transactionInfo").is_some();
    (valid_response, is_paid)
}
