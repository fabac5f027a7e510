//! Typed parameter shapes for integration declarations.
//!
//! Each integration kind declares a small bag of scalar/list parameters.
//! The bags deserialize into one of the shapes below; every field is
//! optional and defaults to its zero value, so parsing a well-formed bag
//! is total. Serialization omits unset fields, which is what keeps enable
//! payloads canonical and lets the read path distinguish "echoed" from
//! "not echoed" fields.
//!
//! Most kinds share the region+polling shape; the handful with richer
//! filters (tag filters, prefix filters, per-feature fetch flags) get
//! their own records.

use serde::{Deserialize, Serialize};

/// Polling interval only. billing, health, meta_data, tags_global,
/// trusted_advisor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingParams {
    /// The data polling interval in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_polling_interval: Option<u32>,
}

/// Region list plus polling interval. The most common shape: appsync,
/// athena, auto_scaling, cloudtrail, cognito, connect, direct_connect,
/// doc_db, fsx, glue, kinesis_analytics, media_convert, media_package_vod,
/// mq, msk, neptune, qldb, route53_resolver, states, transit_gateway, waf,
/// wafv2, x_ray.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionPollingParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_polling_interval: Option<u32>,
    /// Each region that includes the resources to monitor
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aws_regions: Vec<String>,
}

/// Load balancer monitoring with inventory/tag collection and prefix
/// filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlbParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_polling_interval: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aws_regions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_extended_inventory: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_tags: Option<bool>,
    /// Only load balancers whose name starts with one of these prefixes
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub load_balancer_prefixes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiGatewayParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_polling_interval: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aws_regions: Vec<String>,
    /// Only stages whose name starts with one of these prefixes
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stage_prefixes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_value: Option<String>,
}

/// CDN monitoring. Global service, so no region list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudfrontParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_polling_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_lambdas_at_edge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_tags: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EbsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_polling_interval: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aws_regions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_extended_inventory: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElasticacheParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_polling_interval: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aws_regions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_tags: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_value: Option<String>,
}

/// Object storage monitoring. Global service, so no region list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct S3Params {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_polling_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_extended_inventory: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_tags: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_polling_interval: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aws_regions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_extended_inventory: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_tags: Option<bool>,
    /// Only queues whose name starts with one of these prefixes
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub queue_prefixes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VpcParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_polling_interval: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aws_regions: Vec<String>,
    /// Whether NAT gateways are monitored. Affects collection time and the
    /// provider-side API rate budget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_nat_gateway: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_vpn: Option<bool>,
    /// Tag filter; values are case-sensitive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_fields_default_to_zero_values() {
        let params: VpcParams = serde_json::from_value(json!({})).unwrap();
        assert_eq!(params, VpcParams::default());
        assert!(params.aws_regions.is_empty());
        assert_eq!(params.fetch_nat_gateway, None);
    }

    #[test]
    fn unset_fields_are_omitted_from_payloads() {
        let params = RegionPollingParams {
            metrics_polling_interval: Some(300),
            aws_regions: vec![],
        };
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value, json!({"metrics_polling_interval": 300}));
    }

    #[test]
    fn full_bag_round_trips() {
        let bag = json!({
            "metrics_polling_interval": 900,
            "aws_regions": ["us-east-1", "eu-west-1"],
            "fetch_extended_inventory": true,
            "fetch_tags": false,
            "queue_prefixes": ["prod-"],
            "tag_key": "team",
            "tag_value": "platform"
        });
        let params: SqsParams = serde_json::from_value(bag.clone()).unwrap();
        assert_eq!(serde_json::to_value(&params).unwrap(), bag);
    }
}
