//! Settings read from flags and environment variables.

use clap::Args;
use std::time::Duration;

use crate::ads::Endpoints;
use crate::ads::rest::{DEFAULT_API_URL, DEFAULT_API_VERSION, DEFAULT_TOKEN_URL};
use crate::credentials::Credentials;

/// Where and how the HTTP server runs.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "API_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Default log filter, overridden by RUST_LOG
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Deployment environment name, informational only
    #[arg(long, env = "ENVIRONMENT", default_value = "development")]
    pub environment: String,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Google Ads API credentials. All optional at startup.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialConfig {
    #[arg(long, env = "GOOGLE_ADS_DEVELOPER_TOKEN", hide_env_values = true)]
    pub developer_token: Option<String>,

    #[arg(long, env = "GOOGLE_ADS_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    #[arg(long, env = "GOOGLE_ADS_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    #[arg(long, env = "GOOGLE_ADS_REFRESH_TOKEN", hide_env_values = true)]
    pub refresh_token: Option<String>,

    /// Default customer account
    #[arg(long, env = "GOOGLE_ADS_CUSTOMER_ID")]
    pub customer_id: Option<String>,

    /// Manager account used to access client accounts
    #[arg(long, env = "GOOGLE_ADS_LOGIN_CUSTOMER_ID")]
    pub login_customer_id: Option<String>,
}

impl From<CredentialConfig> for Credentials {
    fn from(config: CredentialConfig) -> Self {
        Credentials {
            developer_token: config.developer_token,
            client_id: config.client_id,
            client_secret: config.client_secret,
            refresh_token: config.refresh_token,
            customer_id: config.customer_id,
            login_customer_id: config.login_customer_id,
        }
    }
}

/// Location of the remote API.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    #[arg(long = "api-url", env = "GOOGLE_ADS_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    #[arg(
        long = "api-version",
        env = "GOOGLE_ADS_API_VERSION",
        default_value = DEFAULT_API_VERSION
    )]
    pub api_version: String,

    #[arg(long = "token-url", env = "GOOGLE_OAUTH_TOKEN_URL", default_value = DEFAULT_TOKEN_URL)]
    pub token_url: String,

    /// Transport timeout for each remote call, in seconds
    #[arg(long = "timeout-secs", env = "GOOGLE_ADS_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl EndpointConfig {
    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            api_url: self.api_url.clone(),
            api_version: self.api_version.clone(),
            token_url: self.token_url.clone(),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        server: ServerConfig,
        #[command(flatten)]
        credentials: CredentialConfig,
        #[command(flatten)]
        endpoints: EndpointConfig,
    }

    #[test]
    fn test_credentials_from_flags() {
        let cli = TestCli::try_parse_from([
            "test",
            "--developer-token",
            "dev",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "--refresh-token",
            "refresh",
            "--login-customer-id",
            "4445556666",
        ])
        .unwrap();

        let credentials: Credentials = cli.credentials.into();
        assert!(credentials.is_complete());
        assert_eq!(credentials.login_customer_id(), Some("4445556666"));
    }

    #[test]
    fn test_endpoint_flags() {
        let cli = TestCli::try_parse_from([
            "test",
            "--api-url",
            "http://localhost:1234",
            "--api-version",
            "v20",
            "--timeout-secs",
            "30",
        ])
        .unwrap();

        let endpoints = cli.endpoints.endpoints();
        assert_eq!(endpoints.api_url, "http://localhost:1234");
        assert_eq!(endpoints.api_version, "v20");
        assert_eq!(cli.endpoints.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(TestCli::try_parse_from(["test", "--port", "not-a-port"]).is_err());
    }

    #[test]
    fn test_bind_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 9000,
            log_level: "debug".into(),
            environment: "test".into(),
        };
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
    }

    #[test]
    fn test_default_endpoints_match_rest_defaults() {
        assert_eq!(EndpointConfig::default().endpoints(), Endpoints::default());
    }
}
