//! A deployment spread over several availability zones, each running its own cluster and agent
//! behind a shared proxy.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    commons::{license::License, params::ExtraFields},
    crd::{agent::VMAgentSpec, auth::VMAuthSpec, cluster::VMClusterSpec},
};

#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "operator.victoriametrics.com",
    version = "v1alpha1",
    kind = "VMDistributed",
    plural = "vmdistributed",
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
pub struct VMDistributedSpec {
    /// License shared by every embedded application without its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,

    #[serde(default)]
    pub zone_common: ZoneCommon,

    #[serde(default)]
    pub vmauth: EmbeddedVMAuth,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Settings shared by all zones.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneCommon {
    /// How long to wait for a zone to become ready, as a duration such as `5m0s`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_timeout: Option<String>,

    /// Pause between updating two zones, as a duration such as `1m0s`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_pause: Option<String>,

    #[serde(default)]
    pub vmagent: EmbeddedVMAgent,

    #[serde(default)]
    pub vmcluster: EmbeddedVMCluster,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedVMAuth {
    #[serde(default)]
    pub spec: VMAuthSpec,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedVMAgent {
    #[serde(default)]
    pub spec: VMAgentSpec,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedVMCluster {
    #[serde(default)]
    pub spec: VMClusterSpec,

    #[serde(flatten)]
    pub extra: ExtraFields,
}
