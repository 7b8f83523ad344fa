use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn project_schedule(input_json: String) -> NapiResult<String> {
    let terms: piti_core::amortization::schedule::LoanTerms =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        piti_core::amortization::schedule::project_schedule(&terms).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn scheduled_split(input_json: String) -> NapiResult<String> {
    let input: piti_core::amortization::schedule::ScheduledSplitInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = piti_core::amortization::schedule::compute_scheduled_split(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_mortgage_split(input_json: String) -> NapiResult<String> {
    let input: piti_core::amortization::split::MortgageSplitInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = piti_core::amortization::split::compute_mortgage_split(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Posting
// ---------------------------------------------------------------------------

#[napi]
pub fn build_payment_lines(input_json: String) -> NapiResult<String> {
    let input: piti_core::posting::PaymentLinesInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = piti_core::posting::build_payment_lines(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
