//! The closed enumeration of service integrations togglable under a
//! linked cloud account.
//!
//! Every diff and every batch is keyed by [`IntegrationKind`]. The
//! enumeration is closed: the declarative front-end only ever produces
//! these names, so an unknown name at runtime is an invariant violation,
//! not user input. [`IntegrationKind::ALL`] fixes the canonical processing
//! order (lexicographic) that keeps diffs and batch payloads
//! byte-identical across repeated runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationKind {
    Alb,
    ApiGateway,
    Appsync,
    Athena,
    AutoScaling,
    Billing,
    Cloudfront,
    Cloudtrail,
    Cognito,
    Connect,
    DirectConnect,
    DocDb,
    Ebs,
    Elasticache,
    Fsx,
    Glue,
    Health,
    KinesisAnalytics,
    MediaConvert,
    MediaPackageVod,
    MetaData,
    Mq,
    Msk,
    Neptune,
    Qldb,
    Route53Resolver,
    S3,
    Sqs,
    States,
    TagsGlobal,
    TransitGateway,
    TrustedAdvisor,
    Vpc,
    Waf,
    Wafv2,
    XRay,
}

impl IntegrationKind {
    /// Every kind, in canonical (lexicographic) order. Diff and dispatch
    /// iterate this list so no kind is ever silently skipped and output
    /// order never depends on map iteration.
    pub const ALL: [IntegrationKind; 36] = [
        IntegrationKind::Alb,
        IntegrationKind::ApiGateway,
        IntegrationKind::Appsync,
        IntegrationKind::Athena,
        IntegrationKind::AutoScaling,
        IntegrationKind::Billing,
        IntegrationKind::Cloudfront,
        IntegrationKind::Cloudtrail,
        IntegrationKind::Cognito,
        IntegrationKind::Connect,
        IntegrationKind::DirectConnect,
        IntegrationKind::DocDb,
        IntegrationKind::Ebs,
        IntegrationKind::Elasticache,
        IntegrationKind::Fsx,
        IntegrationKind::Glue,
        IntegrationKind::Health,
        IntegrationKind::KinesisAnalytics,
        IntegrationKind::MediaConvert,
        IntegrationKind::MediaPackageVod,
        IntegrationKind::MetaData,
        IntegrationKind::Mq,
        IntegrationKind::Msk,
        IntegrationKind::Neptune,
        IntegrationKind::Qldb,
        IntegrationKind::Route53Resolver,
        IntegrationKind::S3,
        IntegrationKind::Sqs,
        IntegrationKind::States,
        IntegrationKind::TagsGlobal,
        IntegrationKind::TransitGateway,
        IntegrationKind::TrustedAdvisor,
        IntegrationKind::Vpc,
        IntegrationKind::Waf,
        IntegrationKind::Wafv2,
        IntegrationKind::XRay,
    ];

    /// Wire/config name of this kind (snake_case, matches serde)
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationKind::Alb => "alb",
            IntegrationKind::ApiGateway => "api_gateway",
            IntegrationKind::Appsync => "appsync",
            IntegrationKind::Athena => "athena",
            IntegrationKind::AutoScaling => "auto_scaling",
            IntegrationKind::Billing => "billing",
            IntegrationKind::Cloudfront => "cloudfront",
            IntegrationKind::Cloudtrail => "cloudtrail",
            IntegrationKind::Cognito => "cognito",
            IntegrationKind::Connect => "connect",
            IntegrationKind::DirectConnect => "direct_connect",
            IntegrationKind::DocDb => "doc_db",
            IntegrationKind::Ebs => "ebs",
            IntegrationKind::Elasticache => "elasticache",
            IntegrationKind::Fsx => "fsx",
            IntegrationKind::Glue => "glue",
            IntegrationKind::Health => "health",
            IntegrationKind::KinesisAnalytics => "kinesis_analytics",
            IntegrationKind::MediaConvert => "media_convert",
            IntegrationKind::MediaPackageVod => "media_package_vod",
            IntegrationKind::MetaData => "meta_data",
            IntegrationKind::Mq => "mq",
            IntegrationKind::Msk => "msk",
            IntegrationKind::Neptune => "neptune",
            IntegrationKind::Qldb => "qldb",
            IntegrationKind::Route53Resolver => "route53_resolver",
            IntegrationKind::S3 => "s3",
            IntegrationKind::Sqs => "sqs",
            IntegrationKind::States => "states",
            IntegrationKind::TagsGlobal => "tags_global",
            IntegrationKind::TransitGateway => "transit_gateway",
            IntegrationKind::TrustedAdvisor => "trusted_advisor",
            IntegrationKind::Vpc => "vpc",
            IntegrationKind::Waf => "waf",
            IntegrationKind::Wafv2 => "wafv2",
            IntegrationKind::XRay => "x_ray",
        }
    }
}

impl fmt::Display for IntegrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntegrationKind {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IntegrationKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| crate::error::Error::UnknownIntegration {
                kind: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_sorted_and_complete() {
        let mut sorted = IntegrationKind::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted.as_slice(), IntegrationKind::ALL.as_slice());

        let mut names = IntegrationKind::ALL.map(|k| k.as_str()).to_vec();
        names.dedup();
        assert_eq!(names.len(), IntegrationKind::ALL.len());
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in IntegrationKind::ALL {
            assert_eq!(kind.as_str().parse::<IntegrationKind>().unwrap(), kind);
        }
    }

    #[test]
    fn serde_name_matches_as_str() {
        for kind in IntegrationKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!("lambda_monitoring".parse::<IntegrationKind>().is_err());
    }
}
