//! Workflow helpers composed from several VIPS calls.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::Result;
use crate::vips::client::{VipsClient, generate_correlation_id};
use crate::vips::datetime::to_datetime;
use crate::vips::status::{ProhibitionStatus, is_last_name_match};

/// Placeholder fee until VIPS reports the amount owing.
pub const REVIEW_FEE: Decimal = dec!(0.02);

/// Details shown on a review fee invoice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceDetails {
    pub amount: Decimal,
    pub prohibition_period: String,
    /// Service date, e.g. `Jan 2, 2019`.
    pub service_date: String,
    pub notice_type_code: String,
    pub oral_or_written: String,
}

/// Build invoice details from the prohibition's current status.
///
/// Returns `Ok(None)` when the lookup fails or the prohibition is not in
/// VIPS; an unparseable effective date is an error.
pub async fn get_invoice_details(
    client: &VipsClient,
    prohibition_number: &str,
) -> Result<Option<InvoiceDetails>> {
    let correlation_id = generate_correlation_id();
    let response = client.status_get(prohibition_number, &correlation_id).await;
    if !response.is_success {
        return Ok(None);
    }

    let Some(status) = ProhibitionStatus::from_body(&response.data) else {
        return Ok(None);
    };
    let (Some(effective_dt), Some(notice_type_code)) = (status.effective_dt, status.notice_type_cd)
    else {
        return Ok(None);
    };

    let service_date = to_datetime(&effective_dt)?;
    Ok(Some(InvoiceDetails {
        amount: REVIEW_FEE,
        // VIPS does not report the period or service method yet
        prohibition_period: "[Prohib. Period]".to_string(),
        service_date: service_date.format("%b %-d, %Y").to_string(),
        notice_type_code,
        oral_or_written: "[oral / written]".to_string(),
    }))
}

/// Decide whether an applicant can pay for their review.
///
/// Returns `(lookups_succeeded, ready_for_payment)`. The applicant is ready
/// when their last name matches, the review has been created and VIPS has
/// no payment on record.
pub async fn is_application_ready_for_payment(
    client: &VipsClient,
    prohibition_number: &str,
    last_name: &str,
) -> (bool, bool) {
    let correlation_id = generate_correlation_id();
    let status = client.status_get(prohibition_number, &correlation_id).await;

    if !is_last_name_match(&status.data, last_name) {
        return (status.is_success, false);
    }
    info!(correlation_id = %correlation_id, "Last name matches");

    let payment = client.payment_get(prohibition_number, &correlation_id).await;
    let is_form_submitted = ProhibitionStatus::from_body(&status.data)
        .is_some_and(|s| s.is_review_created());
    let is_not_paid = payment.data.get("resp").and_then(Value::as_str) == Some("fail");

    (
        status.is_success && payment.is_success,
        is_form_submitted && is_not_paid,
    )
}
