use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::commons::{
    license::License,
    params::{CommonAppsParams, EmbeddedProbes, ExtraFields},
};

/// Detects anomalies in time series.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "operator.victoriametrics.com",
    version = "v1",
    kind = "VMAnomaly",
    plural = "vmanomalies",
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
pub struct VMAnomalySpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedded_probes: Option<EmbeddedProbes>,

    /// How the anomaly detection exposes its own metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitoring: Option<VMAnomalyMonitoringSpec>,

    #[serde(flatten)]
    pub common: CommonAppsParams,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VMAnomalyMonitoringSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull: Option<VMAnomalyMonitoringPullSpec>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Metrics are exposed for scraping.
#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VMAnomalyMonitoringPullSpec {
    pub port: String,

    #[serde(flatten)]
    pub extra: ExtraFields,
}
