use napi::Result as NapiResult;
use napi_derive::napi;

use desking_core::deal::parse;
use desking_core::{DeskingError, DeskingProfile};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Engine rejections carry the JSON error response so callers can read
/// `kind` and `field` without parsing prose.
fn to_desking_error(e: DeskingError) -> napi::Error {
    match serde_json::to_string(&e.to_response()) {
        Ok(body) => napi::Error::from_reason(body),
        Err(_) => to_napi_error(e),
    }
}

fn profile_from(profile_json: Option<String>) -> NapiResult<DeskingProfile> {
    let profile = match profile_json {
        Some(json) => serde_json::from_str(&json).map_err(to_napi_error)?,
        None => DeskingProfile::default(),
    };
    profile.validate().map_err(to_desking_error)?;
    Ok(profile)
}

fn deal_from(input_json: &str, profile: &DeskingProfile) -> NapiResult<desking_core::DealInputs> {
    let value: serde_json::Value = serde_json::from_str(input_json)
        .map_err(|e| to_desking_error(DeskingError::from(e)))?;
    parse::deal_from_value(&value, profile).map_err(to_desking_error)
}

// ---------------------------------------------------------------------------
// Desking
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_deal(input_json: String, profile_json: Option<String>) -> NapiResult<String> {
    let profile = profile_from(profile_json)?;
    let deal = deal_from(&input_json, &profile)?;
    let output = desking_core::calculate(&deal).map_err(to_desking_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String, profile_json: Option<String>) -> NapiResult<String> {
    let profile = profile_from(profile_json)?;
    let deal = deal_from(&input_json, &profile)?;
    let output =
        desking_core::schedule::build_deal_schedule(&deal).map_err(to_desking_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn payment_grid(input_json: String) -> NapiResult<String> {
    let input: desking_core::grid::PaymentGridInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = desking_core::grid::build_payment_grid(&input).map_err(to_desking_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[napi]
pub fn default_profile() -> NapiResult<String> {
    serde_json::to_string(&DeskingProfile::default()).map_err(to_napi_error)
}
