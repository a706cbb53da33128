//! Builds the executor and its transport from configuration.

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::Client;
use std::sync::Arc;

use crate::ads::RestConnector;
use crate::config::{CredentialConfig, EndpointConfig};
use crate::executor::RemoteCallExecutor;

/// Build the HTTP client shared by the connector and its sessions
pub fn build_http_client(endpoints: &EndpointConfig) -> Result<Client> {
    let mut builder = Client::builder().user_agent(concat!(
        "reachplan/",
        env!("REACHPLAN_VERSION")
    ));

    if let Some(timeout) = endpoints.timeout() {
        debug!("Remote calls time out after {:?}", timeout);
        builder = builder.timeout(timeout);
    }

    builder.build().context("Failed to build HTTP client")
}

/// Build a REST connector for the configured endpoints
pub fn build_connector(endpoints: &EndpointConfig) -> Result<RestConnector> {
    let client = build_http_client(endpoints)?;
    Ok(RestConnector::new(client, endpoints.endpoints()))
}

/// Build the executor shared by all request handlers
pub fn build_executor(
    credentials: CredentialConfig,
    endpoints: &EndpointConfig,
) -> Result<RemoteCallExecutor> {
    let connector = build_connector(endpoints)?;
    let executor = RemoteCallExecutor::new(credentials.into(), Arc::new(connector));

    if !executor.is_configured() {
        warn!("Requests will fail until GOOGLE_ADS_* credentials are provided");
    }

    Ok(executor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ExecutorError;
    use mockito::{Matcher, Server};

    fn endpoint_config(url: &str) -> EndpointConfig {
        EndpointConfig {
            api_url: url.to_string(),
            api_version: "v21".into(),
            token_url: format!("{}/token", url),
            timeout_secs: Some(5),
        }
    }

    fn credential_config() -> CredentialConfig {
        CredentialConfig {
            developer_token: Some("dev-token".into()),
            client_id: Some("client-id".into()),
            client_secret: Some("client-secret".into()),
            refresh_token: Some("refresh-token".into()),
            customer_id: None,
            login_customer_id: None,
        }
    }

    #[tokio::test]
    async fn test_build_http_client_sets_user_agent() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/")
            .match_header("user-agent", Matcher::Regex("^reachplan/".to_string()))
            .create_async()
            .await;

        let client = build_http_client(&endpoint_config(&server.url())).unwrap();
        let _ = client.get(server.url()).send().await;

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_build_executor_without_credentials() {
        let executor =
            build_executor(CredentialConfig::default(), &EndpointConfig::default()).unwrap();

        assert!(!executor.is_configured());
        let err = executor.search_customer_clients("1").await.unwrap_err();
        assert!(matches!(err, ExecutorError::NotConfigured));
    }

    #[tokio::test]
    async fn test_build_executor_opens_session_lazily() {
        let mut server = Server::new_async().await;
        let url = server.url();

        let token = server
            .mock("POST", "/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "fresh"}"#)
            .expect(1)
            .create_async()
            .await;

        let search = server
            .mock("POST", "/v21/customers/1234567890/googleAds:search")
            .match_header("authorization", "Bearer fresh")
            .match_header("developer-token", "dev-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"results": [{"customerClient": {"id": "111", "descriptiveName": "Alpha"}}]}"#)
            .expect(2)
            .create_async()
            .await;

        let executor = build_executor(credential_config(), &endpoint_config(&url)).unwrap();
        assert!(!executor.has_session());

        executor.search_customer_clients("1234567890").await.unwrap();
        let customers = executor.search_customer_clients("1234567890").await.unwrap();

        token.assert_async().await;
        search.assert_async().await;
        assert_eq!(customers[0].name, "Alpha");
    }
}
