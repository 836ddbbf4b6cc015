use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{LocalObjectReference, Probe, ResourceRequirements};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::commons::{image::Image, security::SecurityContext};

/// Fields of a custom resource which take no part in defaulting.
///
/// Every modelled record flattens them in as its last field, so they survive a decode and encode
/// cycle unchanged (including arrays and nested objects).
pub type ExtraFields = BTreeMap<String, serde_json::Value>;

/// Parameters shared by every application managed by the operator.
///
/// This block is flattened into the spec of each application-like custom resource (and into each
/// tier of a cluster). Every field is either set by the user, in which case defaulting never
/// touches it, or filled in by [`Defaulter::apply_common`](crate::defaults::Defaulter::apply_common).
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonAppsParams {
    /// Container image of the application.
    #[serde(default)]
    pub image: Image,

    /// Secrets used to pull the application image from a private registry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_pull_secrets: Vec<LocalObjectReference>,

    /// Port the application listens on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,

    /// Resource requests and limits of the application container.
    #[serde(default)]
    pub resources: ResourceRequirements,

    /// Enables the strict security posture for the pods of the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_strict_security: Option<bool>,

    /// Custom security context, used verbatim instead of the strict security defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_context: Option<SecurityContext>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_policy: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduler_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination_grace_period_seconds: Option<i64>,

    /// Disables the creation of a scrape object for the application itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_self_service_scrape: Option<bool>,

    /// Applies the configured default resource profile to containers without explicit resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_default_resources: Option<bool>,
}

/// Parameters of the config-reloader sidecar, which watches the mounted configuration and
/// triggers a reload of the application.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonConfigReloaderParams {
    /// Full image reference of the config-reloader.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_reloader_image: Option<String>,

    /// Deprecated, use `configReloaderImage` instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_reloader_image_tag: Option<String>,

    #[serde(default)]
    pub config_reloader_resources: ResourceRequirements,
}

/// Probes of the main application container.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedProbes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liveness_probe: Option<Probe>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readiness_probe: Option<Probe>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startup_probe: Option<Probe>,
}
