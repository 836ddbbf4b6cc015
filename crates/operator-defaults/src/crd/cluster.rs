//! Multi-tier clusters: a storage tier plus insert and select tiers, optionally fronted by a
//! request load balancer.

use k8s_openapi::api::core::v1::{LocalObjectReference, Probe, ServiceSpec};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    commons::{
        license::License,
        params::{CommonAppsParams, EmbeddedProbes, ExtraFields},
    },
    crd::backup::VMBackup,
};

#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "operator.victoriametrics.com",
    version = "v1beta1",
    kind = "VMCluster",
    plural = "vmclusters",
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
pub struct VMClusterSpec {
    /// Image tag used by every tier which doesn't pin its own, e.g. `v1.120.0-cluster`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_strict_security: Option<bool>,

    /// Kubernetes cluster domain used to build the addresses of the tiers, e.g. `cluster.local`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_domain_name: Option<String>,

    /// Pull secrets added to every tier.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_pull_secrets: Vec<LocalObjectReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vmstorage: Option<VMStorage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vminsert: Option<ClusterComponent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vmselect: Option<ClusterComponent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_load_balancer: Option<RequestLoadBalancer>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// The storage tier of a [`VMCluster`].
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VMStorage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_data_path: Option<String>,

    /// Port accepting data from the insert tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_insert_port: Option<String>,

    /// Port serving queries of the select tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_select_port: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_backup: Option<VMBackup>,

    #[serde(flatten)]
    pub common: CommonAppsParams,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// A stateless tier of a cluster.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterComponent {
    #[serde(flatten)]
    pub common: CommonAppsParams,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// The storage tier of a [`VLCluster`] or [`VTCluster`].
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStorage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_data_path: Option<String>,

    #[serde(flatten)]
    pub common: CommonAppsParams,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// An authenticating proxy deployed in front of the insert and select tiers.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLoadBalancer {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub spec: RequestLoadBalancerSpec,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLoadBalancerSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedded_probes: Option<EmbeddedProbes>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startup_probe: Option<Probe>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_service_spec: Option<AdditionalServiceSpec>,

    #[serde(flatten)]
    pub common: CommonAppsParams,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Service settings merged into the generated Service of an application.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalServiceSpec {
    /// Replace the generated Service instead of creating an additional one.
    #[serde(default)]
    pub use_as_default: bool,

    #[serde(default)]
    pub spec: ServiceSpec,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "operator.victoriametrics.com",
    version = "v1",
    kind = "VLCluster",
    plural = "vlclusters",
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
pub struct VLClusterSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_strict_security: Option<bool>,

    /// Kubernetes cluster domain used to build the addresses of the tiers, e.g. `cluster.local`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_domain_name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_pull_secrets: Vec<LocalObjectReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlstorage: Option<ClusterStorage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlinsert: Option<ClusterComponent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlselect: Option<ClusterComponent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_load_balancer: Option<RequestLoadBalancer>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "operator.victoriametrics.com",
    version = "v1",
    kind = "VTCluster",
    plural = "vtclusters",
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
pub struct VTClusterSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_strict_security: Option<bool>,

    /// Kubernetes cluster domain used to build the addresses of the tiers, e.g. `cluster.local`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_domain_name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_pull_secrets: Vec<LocalObjectReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<ClusterStorage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert: Option<ClusterComponent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<ClusterComponent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_load_balancer: Option<RequestLoadBalancer>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}
