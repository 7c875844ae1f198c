//! Event records consumed from the form-submission queue.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::lenient;
use crate::vips::status::{self, ProhibitionStatus};

/// A queued event: the submitted form plus the last VIPS response fetched
/// for it.
///
/// Every field is optional or defaulted. Null or mistyped values read as
/// absent, and unknown keys are kept in the `extra` maps so an event
/// re-serializes without losing anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, deserialize_with = "lenient::string_or_default")]
    pub event_type: String,
    #[serde(default, deserialize_with = "lenient::record_or_default")]
    pub form_submission: FormSubmission,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSubmission {
    #[serde(default, deserialize_with = "lenient::record_or_default")]
    pub form: ReviewForm,
    /// Full VIPS response or its bare `data.status` object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vips_response: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewForm {
    #[serde(
        rename = "identification-information",
        default,
        deserialize_with = "lenient::optional_record",
        skip_serializing_if = "Option::is_none"
    )]
    pub identification_information: Option<IdentificationInformation>,
    #[serde(
        rename = "prohibition-information",
        default,
        deserialize_with = "lenient::optional_record",
        skip_serializing_if = "Option::is_none"
    )]
    pub prohibition_information: Option<ProhibitionInformation>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentificationInformation {
    #[serde(
        rename = "driver-last-name",
        default,
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub driver_last_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProhibitionInformation {
    /// `YYYY-MM-DD`
    #[serde(
        rename = "date-of-service",
        default,
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_of_service: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Last name the applicant typed into the form.
    pub fn last_name(&self) -> Option<&str> {
        self.form_submission
            .form
            .identification_information
            .as_ref()
            .and_then(|i| i.driver_last_name.as_deref())
    }

    /// Service date from the form; unparseable dates count as absent.
    pub fn date_of_service(&self) -> Option<NaiveDate> {
        self.form_submission
            .form
            .prohibition_information
            .as_ref()
            .and_then(|p| p.date_of_service.as_deref())
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
    }

    pub fn vips_response(&self) -> Option<&Value> {
        self.form_submission.vips_response.as_ref()
    }

    /// Status from the cached VIPS response, if it describes a found record.
    pub fn vips_status(&self) -> Option<ProhibitionStatus> {
        self.vips_response().and_then(ProhibitionStatus::from_body)
    }

    pub fn exists_in_vips(&self) -> bool {
        self.vips_response().is_some_and(status::is_found)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_form_submission() {
        let raw = json!({
            "event_type": "prohibition_review",
            "form_submission": {
                "form": {
                    "identification-information": {"driver-last-name": "Gordon", "driver-first-name": "Lee"},
                    "prohibition-information": {"date-of-service": "2020-02-03", "control-prohibition-number": "21900040"}
                },
                "vips_response": {"resp": "success", "data": {"status": {"surnameNm": "Gordon"}}}
            }
        })
        .to_string();

        let event = Event::from_json(&raw).unwrap();
        assert_eq!(event.event_type, "prohibition_review");
        assert_eq!(event.last_name(), Some("Gordon"));
        assert_eq!(event.date_of_service(), NaiveDate::from_ymd_opt(2020, 2, 3));
        assert!(event.exists_in_vips());
    }

    #[test]
    fn tolerates_missing_sections() {
        let event = Event::from_json(r#"{"event_type": "x"}"#).unwrap();
        assert_eq!(event.last_name(), None);
        assert_eq!(event.date_of_service(), None);
        assert!(event.vips_status().is_none());
        assert!(!event.exists_in_vips());
    }

    #[test]
    fn bad_service_date_counts_as_absent() {
        let event: Event = serde_json::from_value(json!({
            "form_submission": {"form": {"prohibition-information": {"date-of-service": "03/02/2020"}}}
        }))
        .unwrap();
        assert_eq!(event.date_of_service(), None);
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let raw = json!({
            "event_type": "a",
            "received": "2020-02-03T10:00:00Z",
            "form_submission": {
                "form": {"review-information": {"hearing-request-type": "ORAL"}},
                "submitted_at": 12
            }
        });
        let event: Event = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&event).unwrap(), raw);
    }

    #[test]
    fn null_and_mistyped_fields_read_as_absent() {
        let raw = json!({
            "event_type": null,
            "form_submission": {
                "form": {
                    "identification-information": {"driver-last-name": 42},
                    "prohibition-information": {"date-of-service": ["2020-02-03"]}
                },
                "vips_response": null
            }
        })
        .to_string();

        let event = Event::from_json(&raw).unwrap();
        assert_eq!(event.event_type, "");
        assert_eq!(event.last_name(), None);
        assert_eq!(event.date_of_service(), None);
        assert!(!event.exists_in_vips());
    }

    #[test]
    fn mistyped_sections_read_as_absent() {
        let event: Event = serde_json::from_value(json!({
            "event_type": 7,
            "form_submission": {
                "form": {
                    "identification-information": "Gordon",
                    "prohibition-information": {"date-of-service": "2020-02-03"}
                }
            }
        }))
        .unwrap();
        assert_eq!(event.event_type, "");
        assert_eq!(event.last_name(), None);
        assert_eq!(event.date_of_service(), NaiveDate::from_ymd_opt(2020, 2, 3));

        let event: Event = serde_json::from_value(json!({"form_submission": null})).unwrap();
        assert_eq!(event.form_submission, FormSubmission::default());
    }
}
