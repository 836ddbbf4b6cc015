use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::commons::{
    license::License,
    params::{CommonAppsParams, CommonConfigReloaderParams, ExtraFields},
};

/// Evaluates alerting and recording rules.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "operator.victoriametrics.com",
    version = "v1beta1",
    kind = "VMAlert",
    plural = "vmalerts",
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
pub struct VMAlertSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,

    #[serde(flatten)]
    pub common: CommonAppsParams,

    #[serde(flatten)]
    pub config_reloader: CommonConfigReloaderParams,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Deduplicates, groups and routes alerts.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "operator.victoriametrics.com",
    version = "v1beta1",
    kind = "VMAlertmanager",
    plural = "vmalertmanagers",
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
pub struct VMAlertmanagerSpec {
    /// Kubernetes cluster domain used for peer discovery, e.g. `cluster.local`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_domain_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replica_count: Option<i32>,

    /// Name of the port the web interface is exposed on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_name: Option<String>,

    #[serde(flatten)]
    pub common: CommonAppsParams,

    #[serde(flatten)]
    pub config_reloader: CommonConfigReloaderParams,

    #[serde(flatten)]
    pub extra: ExtraFields,
}
