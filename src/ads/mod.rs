//! Narrow interface to the remote reach-planning API.
//!
//! [`ReachPlanApi`] is the session handle the executor calls through, and
//! [`Connector`] opens such a session from a set of credentials. The REST
//! implementation lives in [`rest`].

mod error;
pub mod rest;
mod types;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::credentials::Credentials;

pub use error::AdsError;
pub use rest::{Endpoints, RestConnector, RestSession};
pub use types::{
    AudienceTargeting, CampaignDuration, CustomerClientRow, DateRange, ForecastMetrics,
    PlannedProduct, ProductMetadata, ReachCurve, ReachForecast, ReachForecastRequest,
    ReachForecastResponse, SearchRow, Targeting, UserListInfo,
};

/// Operations offered by an open session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReachPlanApi: Send + Sync {
    /// List the products that can be planned in a location.
    async fn list_plannable_products(
        &self,
        plannable_location_id: &str,
    ) -> Result<Vec<ProductMetadata>, AdsError>;

    /// Run a query scoped to a customer account and return every row.
    async fn search(&self, customer_id: &str, query: &str) -> Result<Vec<SearchRow>, AdsError>;

    /// Generate a reach forecast.
    async fn generate_reach_forecast(
        &self,
        request: &ReachForecastRequest,
    ) -> Result<ReachForecastResponse, AdsError>;
}

/// Opens sessions against the remote API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, credentials: &Credentials) -> Result<Arc<dyn ReachPlanApi>>;
}
