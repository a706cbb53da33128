//! Input checks run before the executor is invoked.

use serde::Deserialize;

use super::error::ApiError;
use crate::model::{ForecastRequestParameters, Network};

/// Query string of the reach forecast route.
#[derive(Debug, Clone, Deserialize)]
pub struct ReachForecastQuery {
    pub start_date: String,
    pub end_date: String,
    pub customer_id: String,
    #[serde(default)]
    pub user_list_id: String,
    pub plannable_location_id: String,
    pub network: String,
    pub currency_code: String,
}

/// True for a non-empty string of ASCII digits.
pub fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Returns the trimmed location id, rejecting blank input.
pub fn plannable_location_id(raw: Option<&str>) -> Result<&str, ApiError> {
    match raw.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(ApiError::BadRequest(
            "plannable_location_id is required and cannot be empty".to_string(),
        )),
    }
}

pub fn customer_id(raw: &str) -> Result<&str, ApiError> {
    if is_numeric(raw) {
        Ok(raw)
    } else {
        Err(ApiError::BadRequest("Customer ID must be numeric".to_string()))
    }
}

fn network_choices() -> String {
    Network::ALL
        .iter()
        .map(Network::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Checks a forecast query in a fixed order and converts it to parameters.
pub fn forecast_parameters(
    query: ReachForecastQuery,
) -> Result<ForecastRequestParameters, ApiError> {
    if query.start_date.chars().count() != 10 || query.end_date.chars().count() != 10 {
        return Err(ApiError::BadRequest(
            "Date format must be YYYY-MM-DD".to_string(),
        ));
    }

    customer_id(&query.customer_id)?;

    if query.network.parse::<Network>().is_err() {
        return Err(ApiError::BadRequest(format!(
            "Network must be one of: {}",
            network_choices()
        )));
    }

    if query.currency_code.chars().count() != 3 {
        return Err(ApiError::BadRequest(
            "Currency code must be 3 characters (e.g., USD, EUR)".to_string(),
        ));
    }

    Ok(ForecastRequestParameters {
        start_date: query.start_date,
        end_date: query.end_date,
        customer_id: query.customer_id,
        user_list_id: query.user_list_id,
        plannable_location_id: query.plannable_location_id,
        network: query.network,
        currency_code: query.currency_code,
    })
}
