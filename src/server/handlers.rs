use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use log::{error, info};
use serde::{Deserialize, Serialize};

use super::AppState;
use super::error::ApiError;
use super::validate::{self, ReachForecastQuery};
use crate::model::{CustomerClient, ForecastRequestParameters, ForecastResult, PlannableProduct};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct PlannableProductsQuery {
    pub plannable_location_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CustomersResponse {
    pub customers: Vec<CustomerClient>,
    pub customer_id: String,
    pub total_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReachForecastResponse {
    pub forecast: ForecastResult,
    pub request_parameters: ForecastRequestParameters,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

#[tracing::instrument(skip(state))]
pub async fn get_plannable_products(
    State(state): State<AppState>,
    Query(query): Query<PlannableProductsQuery>,
) -> Result<Json<Vec<PlannableProduct>>, ApiError> {
    info!(
        "Fetching plannable products for location: {:?}",
        query.plannable_location_id
    );

    let location_id = validate::plannable_location_id(query.plannable_location_id.as_deref())?;

    let products = state
        .executor
        .list_plannable_products(location_id)
        .await
        .map_err(|e| {
            error!("Error fetching plannable products: {}", e);
            ApiError::Internal(format!("Failed to retrieve plannable products: {}", e))
        })?;

    info!("Successfully retrieved {} products", products.len());
    Ok(Json(products))
}

#[tracing::instrument(skip(state))]
pub async fn get_customers(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<CustomersResponse>, ApiError> {
    info!("Searching customers for customer ID: {}", customer_id);

    validate::customer_id(&customer_id)?;

    let customers = state
        .executor
        .search_customer_clients(&customer_id)
        .await
        .map_err(|e| {
            error!("Error fetching customers: {}", e);
            ApiError::Internal(format!("Error fetching customers: {}", e))
        })?;

    info!(
        "Successfully retrieved {} customers for customer ID {}",
        customers.len(),
        customer_id
    );

    Ok(Json(CustomersResponse {
        total_count: customers.len(),
        customers,
        customer_id,
    }))
}

#[tracing::instrument(skip(state, query))]
pub async fn get_reach_forecast(
    State(state): State<AppState>,
    query: Result<Query<ReachForecastQuery>, QueryRejection>,
) -> Result<Json<ReachForecastResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::Unprocessable(rejection.body_text()))?;
    let params = validate::forecast_parameters(query)?;

    info!("Generating reach forecast for customer {}", params.customer_id);

    let forecast = state
        .executor
        .generate_reach_forecast(&params)
        .await
        .map_err(|e| {
            error!(
                "Error generating reach forecast after {} attempts: {}",
                e.attempts(),
                e
            );
            ApiError::Internal(format!("Error generating reach forecast: {}", e))
        })?;

    Ok(Json(ReachForecastResponse {
        forecast,
        request_parameters: params,
    }))
}
