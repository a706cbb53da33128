//! Credential-gated execution of remote reach-planning calls.
//!
//! [`RemoteCallExecutor`] owns the credentials and a lazily opened session.
//! Listing products and searching customers are single calls; forecast
//! generation runs under a [`RetryPolicy`] that repeats timeout-like failures
//! only.

mod error;

use log::{error, info, warn};
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::ads::{
    AdsError, AudienceTargeting, CampaignDuration, Connector, DateRange, PlannedProduct,
    ReachForecastRequest, ReachForecastResponse, ReachPlanApi, Targeting, UserListInfo,
};
use crate::credentials::Credentials;
use crate::model::{
    CustomerClient, ForecastRequestParameters, ForecastResult, PlannableProduct,
    PlannedProductAllocation, ReachCurvePoint,
};
use crate::retry::{self, AttemptOutcome, FailureClass, RetryDecision, RetryPolicy};

pub use error::ExecutorError;

/// Query listing the client accounts reachable from a customer.
pub const CUSTOMER_CLIENT_QUERY: &str = "SELECT customer_client.id, customer_client.resource_name, customer_client.client_customer, customer_client.manager, customer_client.descriptive_name FROM customer_client";

pub struct RemoteCallExecutor {
    credentials: Credentials,
    connector: Arc<dyn Connector>,
    session: OnceCell<Arc<dyn ReachPlanApi>>,
    retry_policy: RetryPolicy,
}

impl RemoteCallExecutor {
    pub fn new(credentials: Credentials, connector: Arc<dyn Connector>) -> Self {
        if !credentials.is_complete() {
            warn!(
                "Google Ads credentials not found. Client will be initialized when credentials are available."
            );
        }

        Self {
            credentials,
            connector,
            session: OnceCell::new(),
            retry_policy: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// True iff the four required credentials are present and non-blank.
    pub fn is_configured(&self) -> bool {
        self.credentials.is_complete()
    }

    pub fn has_session(&self) -> bool {
        self.session.initialized()
    }

    /// Returns the session, opening it first if needed.
    ///
    /// Concurrent first callers share a single connection attempt. A failed
    /// attempt leaves no session behind, so the next call tries again.
    #[tracing::instrument(skip(self))]
    pub async fn ensure_session(&self) -> Result<Arc<dyn ReachPlanApi>, ExecutorError> {
        if let Some(session) = self.session.get() {
            return Ok(Arc::clone(session));
        }

        if !self.is_configured() {
            return Err(ExecutorError::NotConfigured);
        }

        let session = self
            .session
            .get_or_try_init(|| async {
                let session = self.connector.connect(&self.credentials).await.map_err(|e| {
                    error!("Failed to initialize Google Ads client: {:#}", e);
                    ExecutorError::Session(format!("{:#}", e))
                })?;
                info!("Google Ads client initialized successfully");
                Ok::<_, ExecutorError>(session)
            })
            .await?;

        Ok(Arc::clone(session))
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_plannable_products(
        &self,
        plannable_location_id: &str,
    ) -> Result<Vec<PlannableProduct>, ExecutorError> {
        let session = self.ensure_session().await?;

        let metadata = session
            .list_plannable_products(plannable_location_id)
            .await
            .map_err(|e| single_call_failure("Error retrieving plannable products", e))?;

        let products: Vec<PlannableProduct> = metadata
            .into_iter()
            .map(|product| PlannableProduct {
                name: product.plannable_product_name,
                code: product.plannable_product_code,
            })
            .collect();

        info!(
            "Retrieved {} plannable products for location {}",
            products.len(),
            plannable_location_id
        );
        Ok(products)
    }

    #[tracing::instrument(skip(self))]
    pub async fn search_customer_clients(
        &self,
        customer_id: &str,
    ) -> Result<Vec<CustomerClient>, ExecutorError> {
        let session = self.ensure_session().await?;

        let rows = session
            .search(customer_id, CUSTOMER_CLIENT_QUERY)
            .await
            .map_err(|e| single_call_failure("Error searching customers", e))?;

        let customers: Vec<CustomerClient> = rows
            .into_iter()
            .map(|row| {
                let client = row.customer_client;
                CustomerClient::new(client.id.to_string(), client.descriptive_name.as_deref())
            })
            .collect();

        info!(
            "Retrieved {} customers for customer ID {}",
            customers.len(),
            customer_id
        );
        Ok(customers)
    }

    /// Generates a reach forecast, retrying timeout-like failures with
    /// exponential backoff.
    #[tracing::instrument(skip(self, params), fields(customer_id = %params.customer_id))]
    pub async fn generate_reach_forecast(
        &self,
        params: &ForecastRequestParameters,
    ) -> Result<ForecastResult, ExecutorError> {
        if !self.is_configured() {
            return Err(ExecutorError::NotConfigured);
        }

        let session = self.ensure_session().await?;
        let request = build_forecast_request(params);

        for attempt in 0..self.retry_policy.max_attempts {
            info!(
                "Generating reach forecast for customer {} (attempt {})",
                params.customer_id,
                attempt + 1
            );

            match attempt_forecast(session.as_ref(), &request, attempt).await {
                AttemptOutcome::Success(response) => {
                    let result = forecast_result(response, params);
                    info!(
                        "Successfully generated reach forecast with {} curve points",
                        result.reach_curve.len()
                    );
                    return Ok(result);
                }
                AttemptOutcome::Failure {
                    error: failure,
                    class,
                    attempt,
                } => match self.retry_policy.decide(attempt, class) {
                    RetryDecision::Retry { delay } => {
                        warn!(
                            "Timeout error on attempt {}, retrying in {:.2} seconds: {}",
                            attempt + 1,
                            delay.as_secs_f64(),
                            failure
                        );
                        tokio::time::sleep(delay).await;
                    }
                    RetryDecision::GiveUp => {
                        let err = ExecutorError::remote(
                            "Error generating reach forecast",
                            failure,
                            class,
                            attempt + 1,
                        );
                        error!("{}", err);
                        return Err(err);
                    }
                },
            }
        }

        error!("Reach forecast retry loop ended without a result");
        Err(ExecutorError::Unreachable)
    }
}

/// Runs one forecast call and tags its outcome.
async fn attempt_forecast(
    session: &dyn ReachPlanApi,
    request: &ReachForecastRequest,
    attempt: u32,
) -> AttemptOutcome<ReachForecastResponse, AdsError> {
    match session.generate_reach_forecast(request).await {
        Ok(response) => AttemptOutcome::Success(response),
        Err(error) => {
            let class = retry::classify(&error.classification_text());
            AttemptOutcome::Failure {
                error,
                class,
                attempt,
            }
        }
    }
}

fn single_call_failure(context: &str, source: AdsError) -> ExecutorError {
    let class: FailureClass = retry::classify(&source.classification_text());
    let err = ExecutorError::remote(context, source, class, 1);
    error!("{}", err);
    err
}

/// Builds the remote request for a set of validated parameters.
pub fn build_forecast_request(params: &ForecastRequestParameters) -> ReachForecastRequest {
    let audience_targeting = params.user_list_resource().map(|user_list| AudienceTargeting {
        user_lists: vec![UserListInfo { user_list }],
    });

    ReachForecastRequest {
        customer_id: params.customer_id.clone(),
        campaign_duration: CampaignDuration {
            date_range: DateRange {
                start_date: params.start_date.clone(),
                end_date: params.end_date.clone(),
            },
        },
        currency_code: params.currency_code.clone(),
        targeting: Targeting {
            plannable_location_ids: vec![params.plannable_location_id.clone()],
            network: params.network.clone(),
            audience_targeting,
        },
        planned_products: PlannedProductAllocation::fixed()
            .into_iter()
            .map(|allocation| PlannedProduct {
                plannable_product_code: allocation.product_code,
                budget_micros: allocation.budget_micros,
            })
            .collect(),
    }
}

fn forecast_result(
    response: ReachForecastResponse,
    params: &ForecastRequestParameters,
) -> ForecastResult {
    ForecastResult {
        reach_curve: response
            .reach_curve
            .reach_forecasts
            .into_iter()
            .map(|point| ReachCurvePoint {
                cost_micros: point.cost_micros,
                reach: point.forecast_metrics.reach,
                impressions: point.forecast_metrics.impressions,
                frequency: point.forecast_metrics.frequency,
            })
            .collect(),
        planned_products: response
            .planned_products
            .into_iter()
            .map(|product| PlannedProductAllocation {
                product_code: product.plannable_product_code,
                budget_micros: product.budget_micros,
            })
            .collect(),
        currency_code: params.currency_code.clone(),
        customer_id: params.customer_id.clone(),
    }
}
