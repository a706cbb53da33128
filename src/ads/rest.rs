//! JSON/REST transport for the reach-planning API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::sync::Arc;

use super::types::{ListPlannableProductsResponse, SearchResponse};
use super::{
    AdsError, Connector, ProductMetadata, ReachForecastRequest, ReachForecastResponse,
    ReachPlanApi, SearchRow,
};
use crate::credentials::Credentials;

pub const DEFAULT_API_URL: &str = "https://googleads.googleapis.com";
pub const DEFAULT_API_VERSION: &str = "v21";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Upper bound on followed result pages, guards against a looping page token.
const MAX_SEARCH_PAGES: usize = 100;

const DEVELOPER_TOKEN: &str = "developer-token";
const LOGIN_CUSTOMER_ID: &str = "login-customer-id";

/// Where the API and the OAuth token endpoint live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_url: String,
    pub api_version: String,
    pub token_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
        }
    }
}

impl Endpoints {
    fn versioned_url(&self) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), self.api_version)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Opens [`RestSession`]s by trading the refresh token for an access token.
pub struct RestConnector {
    client: Client,
    endpoints: Endpoints,
}

impl RestConnector {
    pub fn new(client: Client, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    #[tracing::instrument(skip(self, credentials))]
    async fn fetch_access_token(&self, credentials: &Credentials) -> Result<String> {
        let client_id = credentials
            .client_id
            .as_deref()
            .context("client_id is not set")?;
        let client_secret = credentials
            .client_secret
            .as_deref()
            .context("client_secret is not set")?;
        let refresh_token = credentials
            .refresh_token
            .as_deref()
            .context("refresh_token is not set")?;

        debug!("Requesting access token from {}...", self.endpoints.token_url);

        let response = self
            .client
            .post(&self.endpoints.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .context("Failed to send token request")?;

        let response = response
            .error_for_status()
            .context("OAuth token exchange was rejected")?;

        let token = response
            .json::<TokenResponse>()
            .await
            .context("Failed to parse token response")?;

        Ok(token.access_token)
    }
}

#[async_trait]
impl Connector for RestConnector {
    #[tracing::instrument(skip(self, credentials))]
    async fn connect(&self, credentials: &Credentials) -> Result<Arc<dyn ReachPlanApi>> {
        let access_token = self.fetch_access_token(credentials).await?;
        let session = RestSession::new(
            self.client.clone(),
            &self.endpoints,
            credentials,
            &access_token,
        )?;

        match session.default_customer_id() {
            Some(customer_id) => debug!("Session opened, default customer {}", customer_id),
            None => debug!("Session opened without a default customer"),
        }
        Ok(Arc::new(session))
    }
}

/// An authenticated session.
#[derive(Debug, Clone)]
pub struct RestSession {
    client: Client,
    base_url: String,
    headers: HeaderMap,
    default_customer_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListPlannableProductsBody<'a> {
    plannable_location_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchBody<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<&'a str>,
}

impl RestSession {
    pub fn new(
        client: Client,
        endpoints: &Endpoints,
        credentials: &Credentials,
        access_token: &str,
    ) -> Result<Self> {
        let developer_token = credentials
            .developer_token
            .as_deref()
            .context("developer_token is not set")?;

        let mut headers = HeaderMap::new();

        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", access_token))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let mut token_value = HeaderValue::from_str(developer_token.trim())?;
        token_value.set_sensitive(true);
        headers.insert(HeaderName::from_static(DEVELOPER_TOKEN), token_value);

        if let Some(login_customer_id) = credentials.login_customer_id() {
            headers.insert(
                HeaderName::from_static(LOGIN_CUSTOMER_ID),
                HeaderValue::from_str(&login_customer_id.replace('-', ""))?,
            );
            debug!("Session acts through manager account {}", login_customer_id);
        }

        Ok(Self {
            client,
            base_url: endpoints.versioned_url(),
            headers,
            default_customer_id: credentials.customer_id().map(str::to_string),
        })
    }

    /// Customer id configured as the account default, if any.
    pub fn default_customer_id(&self) -> Option<&str> {
        self.default_customer_id.as_deref()
    }

    async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, AdsError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(AdsError::from_response(status.as_u16(), &body));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ReachPlanApi for RestSession {
    #[tracing::instrument(skip(self))]
    async fn list_plannable_products(
        &self,
        plannable_location_id: &str,
    ) -> Result<Vec<ProductMetadata>, AdsError> {
        let url = format!("{}:listPlannableProducts", self.base_url);
        let response: ListPlannableProductsResponse = self
            .post_json(
                &url,
                &ListPlannableProductsBody {
                    plannable_location_id,
                },
            )
            .await?;
        Ok(response.product_metadata)
    }

    #[tracing::instrument(skip(self, query))]
    async fn search(&self, customer_id: &str, query: &str) -> Result<Vec<SearchRow>, AdsError> {
        let url = format!("{}/customers/{}/googleAds:search", self.base_url, customer_id);
        let mut rows = Vec::new();
        let mut page_token: Option<String> = None;

        for page in 1..=MAX_SEARCH_PAGES {
            let response: SearchResponse = self
                .post_json(
                    &url,
                    &SearchBody {
                        query,
                        page_token: page_token.as_deref(),
                    },
                )
                .await?;

            debug!("Search page {} returned {} rows", page, response.results.len());
            rows.extend(response.results);

            match response.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => return Ok(rows),
            }
        }

        warn!(
            "Search for customer {} still had results after {} pages",
            customer_id, MAX_SEARCH_PAGES
        );
        Err(AdsError::Transport(format!(
            "search returned more than {} pages of results",
            MAX_SEARCH_PAGES
        )))
    }

    #[tracing::instrument(skip(self, request), fields(customer_id = %request.customer_id))]
    async fn generate_reach_forecast(
        &self,
        request: &ReachForecastRequest,
    ) -> Result<ReachForecastResponse, AdsError> {
        let url = format!(
            "{}/customers/{}:generateReachForecast",
            self.base_url, request.customer_id
        );
        self.post_json(&url, request).await
    }
}
