use k8s_openapi::api::core::v1::{Capabilities, PodSecurityContext};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::commons::params::ExtraFields;

/// User supplied security settings of an application.
///
/// If present, it replaces the computed strict security defaults entirely, see
/// [`crate::security`].
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_security_context: Option<PodSecurityContext>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_security_context: Option<ContainerSecurityContext>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// The container-only subset of the Kubernetes `SecurityContext`.
///
/// User and group related settings are shared with the pod and taken from
/// [`SecurityContext::pod_security_context`].
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSecurityContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privileged: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Capabilities>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only_root_filesystem: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_privilege_escalation: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc_mount: Option<String>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}
