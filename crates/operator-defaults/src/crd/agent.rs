use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::commons::{
    license::License,
    params::{CommonAppsParams, CommonConfigReloaderParams, ExtraFields},
};

/// Collects metrics and forwards them to remote storage.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "operator.victoriametrics.com",
    version = "v1beta1",
    kind = "VMAgent",
    plural = "vmagents",
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
pub struct VMAgentSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,

    /// Only accept pushed data and don't scrape any targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingest_only_mode: Option<bool>,

    #[serde(flatten)]
    pub common: CommonAppsParams,

    #[serde(flatten)]
    pub config_reloader: CommonConfigReloaderParams,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Collects logs and forwards them to remote storage.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "operator.victoriametrics.com",
    version = "v1",
    kind = "VLAgent",
    plural = "vlagents",
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
pub struct VLAgentSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,

    #[serde(flatten)]
    pub common: CommonAppsParams,

    #[serde(flatten)]
    pub extra: ExtraFields,
}
