//! Plain records produced by the executor and served by the HTTP layer.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Budget submitted for every fixed planned product (1,000,000 currency units).
pub const FIXED_BUDGET_MICROS: i64 = 1_000_000_000_000;

/// Product codes that are always planned, in submission order.
pub const FIXED_PRODUCT_CODES: [&str; 2] = ["TRUEVIEW_IN_STREAM", "NON_SKIP_AUCTION"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannableProduct {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerClient {
    pub id: String,
    pub name: String,
}

impl CustomerClient {
    /// Builds a client row, falling back to "Customer {id}" for a missing name.
    pub fn new(id: impl Into<String>, name: Option<&str>) -> Self {
        let id = id.into();
        let name = match name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Customer {}", id),
        };
        Self { id, name }
    }
}

/// Inputs of a reach forecast, already validated by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRequestParameters {
    pub start_date: String,
    pub end_date: String,
    pub customer_id: String,
    pub user_list_id: String,
    pub plannable_location_id: String,
    pub network: String,
    pub currency_code: String,
}

impl ForecastRequestParameters {
    /// Resource name of the targeted user list, if one was requested.
    pub fn user_list_resource(&self) -> Option<String> {
        if self.user_list_id.is_empty() {
            None
        } else {
            Some(format!(
                "customers/{}/userLists/{}",
                self.customer_id, self.user_list_id
            ))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReachCurvePoint {
    pub cost_micros: i64,
    pub reach: i64,
    pub impressions: i64,
    pub frequency: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedProductAllocation {
    #[serde(rename = "plannable_product_code")]
    pub product_code: String,
    pub budget_micros: i64,
}

impl PlannedProductAllocation {
    /// The allocations submitted with every forecast request.
    pub fn fixed() -> Vec<Self> {
        FIXED_PRODUCT_CODES
            .iter()
            .map(|code| Self {
                product_code: (*code).to_string(),
                budget_micros: FIXED_BUDGET_MICROS,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub reach_curve: Vec<ReachCurvePoint>,
    pub planned_products: Vec<PlannedProductAllocation>,
    pub currency_code: String,
    pub customer_id: String,
}

/// Networks a reach forecast can be planned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    YouTube,
    YouTubeAndGoogleVideoPartners,
}

impl Network {
    pub const ALL: [Network; 2] = [Network::YouTube, Network::YouTubeAndGoogleVideoPartners];

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::YouTube => "YOUTUBE",
            Network::YouTubeAndGoogleVideoPartners => "YOUTUBE_AND_GOOGLE_VIDEO_PARTNERS",
        }
    }
}

impl FromStr for Network {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|network| network.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown network: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_client_name_fallback() {
        assert_eq!(CustomerClient::new("222", Some("")).name, "Customer 222");
        assert_eq!(CustomerClient::new("222", None).name, "Customer 222");
        assert_eq!(CustomerClient::new("111", Some("Alpha")).name, "Alpha");
    }

    #[test]
    fn test_fixed_allocations() {
        let fixed = PlannedProductAllocation::fixed();
        assert_eq!(fixed.len(), 2);
        assert_eq!(fixed[0].product_code, "TRUEVIEW_IN_STREAM");
        assert_eq!(fixed[1].product_code, "NON_SKIP_AUCTION");
        assert!(fixed.iter().all(|p| p.budget_micros == 1_000_000_000_000));
    }

    #[test]
    fn test_allocation_serializes_with_product_code_key() {
        let json = serde_json::to_value(&PlannedProductAllocation::fixed()[0]).unwrap();
        assert_eq!(json["plannable_product_code"], "TRUEVIEW_IN_STREAM");
        assert_eq!(json["budget_micros"], 1_000_000_000_000i64);
    }

    #[test]
    fn test_user_list_resource() {
        let mut params = ForecastRequestParameters {
            start_date: "2025-11-01".into(),
            end_date: "2025-12-01".into(),
            customer_id: "1234567890".into(),
            user_list_id: "123456789".into(),
            plannable_location_id: "2840".into(),
            network: "YOUTUBE".into(),
            currency_code: "USD".into(),
        };
        assert_eq!(
            params.user_list_resource().as_deref(),
            Some("customers/1234567890/userLists/123456789")
        );

        params.user_list_id.clear();
        assert_eq!(params.user_list_resource(), None);
    }

    #[test]
    fn test_network_parse() {
        assert_eq!("YOUTUBE".parse::<Network>().unwrap(), Network::YouTube);
        assert_eq!(
            "YOUTUBE_AND_GOOGLE_VIDEO_PARTNERS".parse::<Network>().unwrap(),
            Network::YouTubeAndGoogleVideoPartners
        );
        assert!("youtube".parse::<Network>().is_err());
        assert!("INVALID".parse::<Network>().is_err());
    }
}
