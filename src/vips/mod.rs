//! VIPS integration.
//!
//! - `client` — authenticated HTTP calls, `(success, body)` outcomes
//! - `datetime` — the VIPS datetime string layout
//! - `status` — lenient typed views over response bodies
//! - `service` — invoice and payment-readiness workflows

pub mod client;
pub mod datetime;
pub mod service;
pub mod status;

pub use client::{ApiResponse, ApplicationFields, VipsClient, build_endpoint, generate_correlation_id};
pub use status::{ProhibitionStatus, ProhibitionType};
