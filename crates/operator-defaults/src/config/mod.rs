//! Operator-wide configuration consumed by the defaulting engine.
//!
//! The configuration is resolved once at start-up and treated as read-only afterwards. It is
//! layered, from lowest to highest precedence:
//!
//! 1. the built-in platform defaults ([`BaseOperatorConfig::default`]),
//! 2. a (partial) YAML document ([`BaseOperatorConfig::from_yaml_str`]),
//! 3. command line flags and environment variables ([`OperatorConfigOptions`]).

use std::collections::BTreeMap;

use k8s_openapi::{
    api::core::v1::ResourceRequirements, apimachinery::pkg::api::resource::Quantity,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

mod options;

pub use options::OperatorConfigOptions;

const METRICS_VERSION: &str = "v1.120.0";
const METRICS_CLUSTER_VERSION: &str = "v1.120.0-cluster";
const LOGS_VERSION: &str = "v1.24.0";
const TRACES_VERSION: &str = "v0.1.0";
const DEFAULT_TERMINATION_GRACE_PERIOD_SECONDS: i64 = 30;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to parse the operator configuration"))]
    ParseConfig { source: serde_yaml::Error },

    #[snafu(display("failed to serialize the built-in operator configuration"))]
    SerializeDefaults { source: serde_json::Error },

    #[snafu(display("the merged operator configuration is invalid"))]
    InvalidConfig { source: serde_json::Error },
}

/// Per-kind baseline for an application: image, version, port and resource profile.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationDefaults {
    /// Image repository without a registry, e.g. `victoriametrics/vmagent`.
    pub image: String,

    /// Image tag, e.g. `v1.120.0`.
    pub version: String,

    pub port: String,

    /// Whether [`Self::resource`] is applied to applications which don't opt in or out
    /// themselves. Falls back to [`BaseOperatorConfig::use_default_resources`] if unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_default_resources: Option<bool>,

    pub resource: ResourceRequirements,

    pub termination_grace_period_seconds: i64,
}

impl ApplicationDefaults {
    fn new(image: &str, version: &str, port: &str, resource: ResourceRequirements) -> Self {
        Self {
            image: image.to_owned(),
            version: version.to_owned(),
            port: port.to_owned(),
            use_default_resources: None,
            resource,
            termination_grace_period_seconds: DEFAULT_TERMINATION_GRACE_PERIOD_SECONDS,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigReloaderDefaults {
    /// Full image reference of the config-reloader sidecar.
    pub image: String,
    pub resource: ResourceRequirements,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VMStorageDefaults {
    #[serde(flatten)]
    pub common: ApplicationDefaults,
    pub vminsert_port: String,
    pub vmselect_port: String,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VMClusterDefaults {
    pub storage: VMStorageDefaults,
    pub insert: ApplicationDefaults,
    pub select: ApplicationDefaults,
}

/// Tier defaults of the logs and traces clusters.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterDefaults {
    pub storage: ApplicationDefaults,
    pub insert: ApplicationDefaults,
    pub select: ApplicationDefaults,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceScrapeDefaults {
    /// Discover scrape targets through EndpointSlices instead of Endpoints.
    pub enforce_endpoint_slices: bool,
}

/// Operator-wide configuration. Never mutated by the defaulting engine.
#[derive(Clone, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BaseOperatorConfig {
    /// Registry prepended to every image which doesn't name a registry itself.
    pub container_registry: String,

    /// Enables strict security for every application which doesn't decide itself.
    pub enable_strict_security: bool,

    pub disable_self_service_scrape_creation: bool,

    /// Operator-wide fallback for [`ApplicationDefaults::use_default_resources`].
    pub use_default_resources: bool,

    /// Kubernetes cluster domain used to build fully qualified service addresses, e.g.
    /// `cluster.local`. Empty means short service names are used.
    pub cluster_domain_name: String,

    pub config_reloader: ConfigReloaderDefaults,
    pub vm_backup: ApplicationDefaults,
    pub vm_agent: ApplicationDefaults,
    pub vm_alert: ApplicationDefaults,
    pub vm_alertmanager: ApplicationDefaults,
    pub vm_auth: ApplicationDefaults,
    pub vm_single: ApplicationDefaults,
    pub vm_anomaly: ApplicationDefaults,
    pub vm_cluster: VMClusterDefaults,
    pub vm_service_scrape: ServiceScrapeDefaults,
    pub vlogs: ApplicationDefaults,
    pub vl_single: ApplicationDefaults,
    pub vl_agent: ApplicationDefaults,
    pub vl_cluster: ClusterDefaults,
    pub vt_single: ApplicationDefaults,
    pub vt_cluster: ClusterDefaults,
}

impl Default for BaseOperatorConfig {
    fn default() -> Self {
        Self {
            container_registry: String::new(),
            enable_strict_security: false,
            disable_self_service_scrape_creation: false,
            use_default_resources: true,
            cluster_domain_name: String::new(),
            config_reloader: ConfigReloaderDefaults {
                image: "victoriametrics/operator:config-reloader-v0.61.0".to_owned(),
                resource: profile(("10m", "25Mi"), ("100m", "50Mi")),
            },
            vm_backup: ApplicationDefaults::new(
                "victoriametrics/vmbackupmanager",
                METRICS_VERSION,
                "8300",
                profile(("150m", "200Mi"), ("500m", "500Mi")),
            ),
            vm_agent: ApplicationDefaults::new(
                "victoriametrics/vmagent",
                METRICS_VERSION,
                "8429",
                profile(("50m", "200Mi"), ("200m", "500Mi")),
            ),
            vm_alert: ApplicationDefaults::new(
                "victoriametrics/vmalert",
                METRICS_VERSION,
                "8080",
                profile(("50m", "200Mi"), ("200m", "500Mi")),
            ),
            vm_alertmanager: ApplicationDefaults::new(
                "prom/alertmanager",
                "v0.28.1",
                "9093",
                profile(("30m", "56Mi"), ("100m", "256Mi")),
            ),
            vm_auth: ApplicationDefaults::new(
                "victoriametrics/vmauth",
                METRICS_VERSION,
                "8427",
                profile(("50m", "100Mi"), ("200m", "300Mi")),
            ),
            vm_single: ApplicationDefaults::new(
                "victoriametrics/victoria-metrics",
                METRICS_VERSION,
                "8429",
                profile(("150m", "500Mi"), ("1200m", "1500Mi")),
            ),
            vm_anomaly: ApplicationDefaults::new(
                "victoriametrics/vmanomaly",
                "v1.24.1",
                "8490",
                profile(("250m", "500Mi"), ("1000m", "1000Mi")),
            ),
            vm_cluster: VMClusterDefaults {
                storage: VMStorageDefaults {
                    common: ApplicationDefaults::new(
                        "victoriametrics/vmstorage",
                        METRICS_CLUSTER_VERSION,
                        "8482",
                        profile(("250m", "500Mi"), ("1500m", "1500Mi")),
                    ),
                    vminsert_port: "8400".to_owned(),
                    vmselect_port: "8401".to_owned(),
                },
                insert: ApplicationDefaults::new(
                    "victoriametrics/vminsert",
                    METRICS_CLUSTER_VERSION,
                    "8480",
                    profile(("150m", "200Mi"), ("500m", "500Mi")),
                ),
                select: ApplicationDefaults::new(
                    "victoriametrics/vmselect",
                    METRICS_CLUSTER_VERSION,
                    "8481",
                    profile(("100m", "500Mi"), ("500m", "1000Mi")),
                ),
            },
            vm_service_scrape: ServiceScrapeDefaults::default(),
            vlogs: ApplicationDefaults::new(
                "victoriametrics/victoria-logs",
                LOGS_VERSION,
                "9428",
                profile(("150m", "500Mi"), ("1200m", "1500Mi")),
            ),
            vl_single: ApplicationDefaults::new(
                "victoriametrics/victoria-logs",
                LOGS_VERSION,
                "9428",
                profile(("150m", "500Mi"), ("1200m", "1500Mi")),
            ),
            vl_agent: ApplicationDefaults::new(
                "victoriametrics/vlagent",
                LOGS_VERSION,
                "9429",
                profile(("50m", "200Mi"), ("200m", "500Mi")),
            ),
            vl_cluster: ClusterDefaults {
                storage: ApplicationDefaults::new(
                    "victoriametrics/victoria-logs",
                    LOGS_VERSION,
                    "9491",
                    profile(("250m", "500Mi"), ("1500m", "1500Mi")),
                ),
                insert: ApplicationDefaults::new(
                    "victoriametrics/victoria-logs",
                    LOGS_VERSION,
                    "9481",
                    profile(("150m", "200Mi"), ("500m", "500Mi")),
                ),
                select: ApplicationDefaults::new(
                    "victoriametrics/victoria-logs",
                    LOGS_VERSION,
                    "9471",
                    profile(("100m", "500Mi"), ("500m", "1000Mi")),
                ),
            },
            vt_single: ApplicationDefaults::new(
                "victoriametrics/victoria-traces",
                TRACES_VERSION,
                "10428",
                profile(("150m", "500Mi"), ("1200m", "1500Mi")),
            ),
            vt_cluster: ClusterDefaults {
                storage: ApplicationDefaults::new(
                    "victoriametrics/victoria-traces",
                    TRACES_VERSION,
                    "10491",
                    profile(("250m", "500Mi"), ("1500m", "1500Mi")),
                ),
                insert: ApplicationDefaults::new(
                    "victoriametrics/victoria-traces",
                    TRACES_VERSION,
                    "10481",
                    profile(("150m", "200Mi"), ("500m", "500Mi")),
                ),
                select: ApplicationDefaults::new(
                    "victoriametrics/victoria-traces",
                    TRACES_VERSION,
                    "10471",
                    profile(("100m", "500Mi"), ("500m", "1000Mi")),
                ),
            },
        }
    }
}

impl BaseOperatorConfig {
    /// Parses a YAML document and layers it on top of the built-in defaults.
    ///
    /// The document only needs to contain the keys that differ from the defaults, nested objects
    /// are merged key by key (following JSON merge patch semantics).
    pub fn from_yaml_str(yaml: &str) -> Result<Self, Error> {
        let overrides: serde_json::Value = serde_yaml::from_str(yaml).context(ParseConfigSnafu)?;
        let mut config = serde_json::to_value(Self::default()).context(SerializeDefaultsSnafu)?;
        json_patch::merge(&mut config, &overrides);

        serde_json::from_value(config).context(InvalidConfigSnafu)
    }

    /// Applies command line flags and environment variables on top of this configuration.
    pub fn with_options(mut self, options: &OperatorConfigOptions) -> Self {
        let OperatorConfigOptions {
            container_registry,
            enable_strict_security,
            disable_self_service_scrape_creation,
            use_default_resources,
            cluster_domain_name,
            enforce_endpoint_slices,
        } = options;

        if let Some(container_registry) = container_registry {
            self.container_registry.clone_from(container_registry);
        }
        if let Some(enable_strict_security) = enable_strict_security {
            self.enable_strict_security = *enable_strict_security;
        }
        if let Some(disable) = disable_self_service_scrape_creation {
            self.disable_self_service_scrape_creation = *disable;
        }
        if let Some(use_default_resources) = use_default_resources {
            self.use_default_resources = *use_default_resources;
        }
        if let Some(cluster_domain_name) = cluster_domain_name {
            self.cluster_domain_name.clone_from(cluster_domain_name);
        }
        if let Some(enforce) = enforce_endpoint_slices {
            self.vm_service_scrape.enforce_endpoint_slices = *enforce;
        }

        self
    }
}

/// Builds a resource profile from `(cpu, memory)` requests and limits.
fn profile(requests: (&str, &str), limits: (&str, &str)) -> ResourceRequirements {
    let list = |(cpu, memory): (&str, &str)| {
        BTreeMap::from([
            ("cpu".to_owned(), Quantity(cpu.to_owned())),
            ("memory".to_owned(), Quantity(memory.to_owned())),
        ])
    };

    ResourceRequirements {
        requests: Some(list(requests)),
        limits: Some(list(limits)),
        ..ResourceRequirements::default()
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn empty_document_yields_builtin_defaults() {
        assert_eq!(
            BaseOperatorConfig::from_yaml_str("{}").unwrap(),
            BaseOperatorConfig::default()
        );
    }

    #[test]
    fn partial_document_keeps_sibling_defaults() {
        let config = BaseOperatorConfig::from_yaml_str(indoc! {"
            containerRegistry: registry.example.com
            enableStrictSecurity: true
            vmAgent:
              version: v1.121.0
              useDefaultResources: false
            vmCluster:
              storage:
                vmselectPort: '9401'
        "})
        .unwrap();

        let defaults = BaseOperatorConfig::default();
        assert_eq!(config.container_registry, "registry.example.com");
        assert!(config.enable_strict_security);
        assert_eq!(config.vm_agent.version, "v1.121.0");
        assert_eq!(config.vm_agent.use_default_resources, Some(false));
        assert_eq!(config.vm_agent.image, defaults.vm_agent.image);
        assert_eq!(config.vm_agent.resource, defaults.vm_agent.resource);
        assert_eq!(config.vm_cluster.storage.vmselect_port, "9401");
        assert_eq!(config.vm_cluster.storage.vminsert_port, "8400");
        assert_eq!(config.vm_cluster.storage.common.port, "8482");
        assert_eq!(config.vm_alert, defaults.vm_alert);
    }

    #[test]
    fn invalid_document() {
        let err = BaseOperatorConfig::from_yaml_str("enableStrictSecurity: maybe").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }), "{err:?}");

        let err = BaseOperatorConfig::from_yaml_str("vmAgent: [").unwrap_err();
        assert!(matches!(err, Error::ParseConfig { .. }), "{err:?}");
    }

    #[test]
    fn options_take_precedence() {
        let config = BaseOperatorConfig::default().with_options(&OperatorConfigOptions {
            container_registry: Some("registry.example.com".to_owned()),
            enable_strict_security: Some(true),
            use_default_resources: Some(false),
            enforce_endpoint_slices: Some(true),
            ..OperatorConfigOptions::default()
        });

        assert_eq!(config.container_registry, "registry.example.com");
        assert!(config.enable_strict_security);
        assert!(!config.use_default_resources);
        assert!(config.vm_service_scrape.enforce_endpoint_slices);
        assert!(!config.disable_self_service_scrape_creation);
        assert_eq!(config.cluster_domain_name, "");
    }
}
