use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::commons::params::ExtraFields;

pub const DISCOVERY_ROLE_ENDPOINT_SLICE: &str = "endpointslice";

/// Scrape targets discovered through a Service.
#[derive(
    Clone, CustomResource, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize,
)]
#[kube(
    group = "operator.victoriametrics.com",
    version = "v1beta1",
    kind = "VMServiceScrape",
    plural = "vmservicescrapes",
    namespaced,
    derive = "Default",
    derive = "PartialEq",
    crates(
        kube_core = "kube::core",
        k8s_openapi = "k8s_openapi",
        schemars = "schemars"
    )
)]
#[serde(rename_all = "camelCase")]
pub struct VMServiceScrapeSpec {
    /// Kubernetes discovery role, one of `endpoints`, `endpointslice` or `service`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovery_role: Option<String>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}
