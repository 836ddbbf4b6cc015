//! Single-node storage applications.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    commons::{
        license::License,
        params::{CommonAppsParams, CommonConfigReloaderParams, ExtraFields},
    },
    crd::backup::VMBackup,
};

/// Single-node metrics storage.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "operator.victoriametrics.com",
    version = "v1beta1",
    kind = "VMSingle",
    plural = "vmsingles",
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
pub struct VMSingleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,

    /// Only accept pushed data and don't run the embedded scraper.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingest_only_mode: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_backup: Option<VMBackup>,

    #[serde(flatten)]
    pub common: CommonAppsParams,

    #[serde(flatten)]
    pub config_reloader: CommonConfigReloaderParams,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Single-node logs storage.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "operator.victoriametrics.com",
    version = "v1",
    kind = "VLSingle",
    plural = "vlsingles",
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
pub struct VLSingleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,

    #[serde(flatten)]
    pub common: CommonAppsParams,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Single-node traces storage.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "operator.victoriametrics.com",
    version = "v1",
    kind = "VTSingle",
    plural = "vtsingles",
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
pub struct VTSingleSpec {
    #[serde(flatten)]
    pub common: CommonAppsParams,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Deprecated single-node logs storage, superseded by [`VLSingle`].
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "operator.victoriametrics.com",
    version = "v1beta1",
    kind = "VLogs",
    plural = "vlogs",
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
pub struct VLogsSpec {
    #[serde(flatten)]
    pub common: CommonAppsParams,

    #[serde(flatten)]
    pub extra: ExtraFields,
}
