use k8s_openapi::api::core::v1::SecretKeySelector;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::commons::{
    license::License,
    params::{CommonAppsParams, CommonConfigReloaderParams, ExtraFields},
};

/// Authenticating and routing proxy in front of the other applications.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "operator.victoriametrics.com",
    version = "v1beta1",
    kind = "VMAuth",
    plural = "vmauths",
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
pub struct VMAuthSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,

    /// Deprecated, use `secretRef` instead.
    ///
    /// Name of a Secret containing the proxy configuration under the `config.yaml` key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_secret: Option<String>,

    /// Secret key containing the proxy configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<SecretKeySelector>,

    #[serde(flatten)]
    pub common: CommonAppsParams,

    #[serde(flatten)]
    pub config_reloader: CommonConfigReloaderParams,

    #[serde(flatten)]
    pub extra: ExtraFields,
}
