//! Integration Registry - the kind -> mapper table.
//!
//! Built once by an explicit constructor and passed by reference to the
//! differ/dispatcher; read-only afterwards and safe for concurrent
//! lookups. There is deliberately no process-global registry: whoever
//! drives a reconciliation owns the registry value and injects it.

use crate::error::{Error, Result};
use crate::integration::kind::IntegrationKind;
use crate::integration::mapper::{IntegrationMapper, ShapedMapper};
use crate::integration::params::{
    AlbParams, ApiGatewayParams, CloudfrontParams, EbsParams, ElasticacheParams, PollingParams,
    RegionPollingParams, S3Params, SqsParams, VpcParams,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

pub struct IntegrationRegistry {
    /// Wire envelope key for this provider's integrations (e.g. "aws")
    provider: &'static str,
    mappers: BTreeMap<IntegrationKind, Box<dyn IntegrationMapper>>,
}

impl IntegrationRegistry {
    fn new(provider: &'static str) -> Self {
        Self {
            provider,
            mappers: BTreeMap::new(),
        }
    }

    fn register<P>(&mut self, kind: IntegrationKind)
    where
        P: Serialize + DeserializeOwned + Default + Send + Sync + 'static,
    {
        self.mappers
            .insert(kind, Box::new(ShapedMapper::<P>::new(kind)));
    }

    /// The full registry for AWS-linked accounts: one mapper per kind in
    /// the closed enumeration.
    pub fn aws() -> Self {
        let mut registry = Self::new("aws");

        registry.register::<AlbParams>(IntegrationKind::Alb);
        registry.register::<ApiGatewayParams>(IntegrationKind::ApiGateway);
        registry.register::<RegionPollingParams>(IntegrationKind::Appsync);
        registry.register::<RegionPollingParams>(IntegrationKind::Athena);
        registry.register::<RegionPollingParams>(IntegrationKind::AutoScaling);
        registry.register::<PollingParams>(IntegrationKind::Billing);
        registry.register::<CloudfrontParams>(IntegrationKind::Cloudfront);
        registry.register::<RegionPollingParams>(IntegrationKind::Cloudtrail);
        registry.register::<RegionPollingParams>(IntegrationKind::Cognito);
        registry.register::<RegionPollingParams>(IntegrationKind::Connect);
        registry.register::<RegionPollingParams>(IntegrationKind::DirectConnect);
        registry.register::<RegionPollingParams>(IntegrationKind::DocDb);
        registry.register::<EbsParams>(IntegrationKind::Ebs);
        registry.register::<ElasticacheParams>(IntegrationKind::Elasticache);
        registry.register::<RegionPollingParams>(IntegrationKind::Fsx);
        registry.register::<RegionPollingParams>(IntegrationKind::Glue);
        registry.register::<PollingParams>(IntegrationKind::Health);
        registry.register::<RegionPollingParams>(IntegrationKind::KinesisAnalytics);
        registry.register::<RegionPollingParams>(IntegrationKind::MediaConvert);
        registry.register::<RegionPollingParams>(IntegrationKind::MediaPackageVod);
        registry.register::<PollingParams>(IntegrationKind::MetaData);
        registry.register::<RegionPollingParams>(IntegrationKind::Mq);
        registry.register::<RegionPollingParams>(IntegrationKind::Msk);
        registry.register::<RegionPollingParams>(IntegrationKind::Neptune);
        registry.register::<RegionPollingParams>(IntegrationKind::Qldb);
        registry.register::<RegionPollingParams>(IntegrationKind::Route53Resolver);
        registry.register::<S3Params>(IntegrationKind::S3);
        registry.register::<SqsParams>(IntegrationKind::Sqs);
        registry.register::<RegionPollingParams>(IntegrationKind::States);
        registry.register::<PollingParams>(IntegrationKind::TagsGlobal);
        registry.register::<RegionPollingParams>(IntegrationKind::TransitGateway);
        registry.register::<PollingParams>(IntegrationKind::TrustedAdvisor);
        registry.register::<VpcParams>(IntegrationKind::Vpc);
        registry.register::<RegionPollingParams>(IntegrationKind::Waf);
        registry.register::<RegionPollingParams>(IntegrationKind::Wafv2);
        registry.register::<RegionPollingParams>(IntegrationKind::XRay);

        registry
    }

    pub fn provider(&self) -> &'static str {
        self.provider
    }

    /// Look up the mapper for a kind. The enumeration is closed, so a miss
    /// is a registry/enumeration mismatch, a programming error.
    pub fn lookup(&self, kind: IntegrationKind) -> Result<&dyn IntegrationMapper> {
        self.mappers
            .get(&kind)
            .map(Box::as_ref)
            .ok_or_else(|| Error::UnknownIntegration {
                kind: kind.as_str().to_string(),
            })
    }

    /// Registered kinds in canonical order
    pub fn kinds(&self) -> impl Iterator<Item = IntegrationKind> + '_ {
        self.mappers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }
}
