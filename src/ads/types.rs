//! Request and response shapes of the reach-planning API.
//!
//! Field names follow the API's JSON encoding. 64-bit integers may arrive as
//! either JSON strings or numbers.

use serde::{Deserialize, Deserializer, Serialize};

fn int64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(i64),
        Text(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Number(n) => Ok(n),
        Repr::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// One entry of a plannable products listing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMetadata {
    #[serde(default)]
    pub plannable_product_code: String,
    #[serde(default)]
    pub plannable_product_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListPlannableProductsResponse {
    #[serde(default)]
    pub product_metadata: Vec<ProductMetadata>,
}

/// The `customer_client` fields selected by the search query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerClientRow {
    #[serde(default, deserialize_with = "int64")]
    pub id: i64,
    #[serde(default)]
    pub resource_name: String,
    #[serde(default)]
    pub client_customer: String,
    #[serde(default)]
    pub manager: bool,
    #[serde(default)]
    pub descriptive_name: Option<String>,
}

/// One row of a search result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRow {
    #[serde(default)]
    pub customer_client: CustomerClientRow,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchRow>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDuration {
    pub date_range: DateRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListInfo {
    pub user_list: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceTargeting {
    pub user_lists: Vec<UserListInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Targeting {
    pub plannable_location_ids: Vec<String>,
    pub network: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience_targeting: Option<AudienceTargeting>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedProduct {
    #[serde(default)]
    pub plannable_product_code: String,
    #[serde(default, deserialize_with = "int64")]
    pub budget_micros: i64,
}

/// Body of a reach forecast request. The customer id travels in the URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReachForecastRequest {
    #[serde(skip)]
    pub customer_id: String,
    pub campaign_duration: CampaignDuration,
    pub currency_code: String,
    pub targeting: Targeting,
    pub planned_products: Vec<PlannedProduct>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastMetrics {
    #[serde(default, deserialize_with = "int64")]
    pub reach: i64,
    #[serde(default, deserialize_with = "int64")]
    pub impressions: i64,
    #[serde(default)]
    pub frequency: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReachForecast {
    #[serde(default, deserialize_with = "int64")]
    pub cost_micros: i64,
    #[serde(default)]
    pub forecast_metrics: ForecastMetrics,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReachCurve {
    #[serde(default)]
    pub reach_forecasts: Vec<ReachForecast>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReachForecastResponse {
    #[serde(default)]
    pub reach_curve: ReachCurve,
    #[serde(default)]
    pub planned_products: Vec<PlannedProduct>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_response_accepts_string_int64() {
        let body = r#"{
            "reachCurve": {
                "reachForecasts": [
                    {"costMicros": "1000", "forecastMetrics": {"reach": "10", "impressions": 20, "frequency": 2.0}}
                ]
            },
            "plannedProducts": [
                {"plannableProductCode": "TRUEVIEW_IN_STREAM", "budgetMicros": "1000000000000"}
            ]
        }"#;

        let response: ReachForecastResponse = serde_json::from_str(body).unwrap();
        let point = &response.reach_curve.reach_forecasts[0];
        assert_eq!(point.cost_micros, 1000);
        assert_eq!(point.forecast_metrics.reach, 10);
        assert_eq!(point.forecast_metrics.impressions, 20);
        assert_eq!(point.forecast_metrics.frequency, 2.0);
        assert_eq!(response.planned_products[0].budget_micros, 1_000_000_000_000);
    }

    #[test]
    fn test_empty_forecast_response() {
        let response: ReachForecastResponse = serde_json::from_str("{}").unwrap();
        assert!(response.reach_curve.reach_forecasts.is_empty());
        assert!(response.planned_products.is_empty());
    }

    #[test]
    fn test_search_row_without_descriptive_name() {
        let body = r#"{"results": [{"customerClient": {"id": "222", "manager": false}}]}"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        let row = &response.results[0].customer_client;
        assert_eq!(row.id, 222);
        assert_eq!(row.descriptive_name, None);
        assert_eq!(response.next_page_token, None);
    }

    #[test]
    fn test_request_serialization_omits_customer_id_and_empty_audience() {
        let request = ReachForecastRequest {
            customer_id: "1234567890".into(),
            campaign_duration: CampaignDuration {
                date_range: DateRange {
                    start_date: "2025-11-01".into(),
                    end_date: "2025-12-01".into(),
                },
            },
            currency_code: "USD".into(),
            targeting: Targeting {
                plannable_location_ids: vec!["2840".into()],
                network: "YOUTUBE".into(),
                audience_targeting: None,
            },
            planned_products: vec![],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("customerId").is_none());
        assert_eq!(json["campaignDuration"]["dateRange"]["startDate"], "2025-11-01");
        assert_eq!(json["targeting"]["plannableLocationIds"][0], "2840");
        assert!(json["targeting"].get("audienceTargeting").is_none());
    }
}
