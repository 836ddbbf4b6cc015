//! Server-side defaults of the Kubernetes workload objects generated by the operator.
//!
//! The API server fills these fields on admission. Filling them in before comparing a desired
//! object with the live one keeps the comparison free of spurious differences and the operator
//! from updating objects in a loop.

use k8s_openapi::{
    api::{
        apps::v1::{
            Deployment, DeploymentStrategy, RollingUpdateDeployment, StatefulSet,
            StatefulSetUpdateStrategy,
        },
        core::v1::{ClientIPConfig, Service, ServiceSpec, SessionAffinityConfig},
    },
    apimachinery::pkg::util::intstr::IntOrString,
};

use crate::{
    defaults::{ApplyDefaults, Defaulter, Error},
    dispatch::ObjectKind,
};

const DEFAULT_REPLICAS: i32 = 1;
const DEFAULT_REVISION_HISTORY_LIMIT: i32 = 10;
const DEFAULT_PROGRESS_DEADLINE_SECONDS: i32 = 600;
const DEFAULT_MAX_UNAVAILABLE: &str = "25%";
const DEFAULT_MAX_SURGE: &str = "25%";
const DEFAULT_CLIENT_IP_AFFINITY_SECONDS: i32 = 10800;

const ROLLING_UPDATE: &str = "RollingUpdate";
const ON_DELETE: &str = "OnDelete";
const POD_MANAGEMENT_PARALLEL: &str = "Parallel";
const POD_MANAGEMENT_ORDERED_READY: &str = "OrderedReady";

const SESSION_AFFINITY_NONE: &str = "None";
const SESSION_AFFINITY_CLIENT_IP: &str = "ClientIP";
const SERVICE_TYPE_CLUSTER_IP: &str = "ClusterIP";
const SERVICE_TYPE_NODE_PORT: &str = "NodePort";
const SERVICE_TYPE_LOAD_BALANCER: &str = "LoadBalancer";
const PROTOCOL_TCP: &str = "TCP";
const TRAFFIC_POLICY_CLUSTER: &str = "Cluster";

impl ApplyDefaults for Deployment {
    const KIND: ObjectKind = ObjectKind::Deployment;

    fn apply_defaults(&mut self, _defaulter: &Defaulter) -> Result<(), Error> {
        let spec = self.spec.get_or_insert_default();
        spec.replicas.get_or_insert(DEFAULT_REPLICAS);

        let strategy = spec.strategy.get_or_insert_with(DeploymentStrategy::default);
        let strategy_type = strategy
            .type_
            .get_or_insert_with(|| ROLLING_UPDATE.to_owned());
        if strategy_type == ROLLING_UPDATE {
            let rolling_update = strategy
                .rolling_update
                .get_or_insert_with(RollingUpdateDeployment::default);
            rolling_update
                .max_unavailable
                .get_or_insert_with(|| IntOrString::String(DEFAULT_MAX_UNAVAILABLE.to_owned()));
            rolling_update
                .max_surge
                .get_or_insert_with(|| IntOrString::String(DEFAULT_MAX_SURGE.to_owned()));
        }

        spec.revision_history_limit
            .get_or_insert(DEFAULT_REVISION_HISTORY_LIMIT);
        spec.progress_deadline_seconds
            .get_or_insert(DEFAULT_PROGRESS_DEADLINE_SECONDS);
        Ok(())
    }
}

impl ApplyDefaults for StatefulSet {
    const KIND: ObjectKind = ObjectKind::StatefulSet;

    /// Unlike the API server, the update strategy defaults to `OnDelete`: the operator rolls
    /// the pods of its StatefulSets itself.
    fn apply_defaults(&mut self, _defaulter: &Defaulter) -> Result<(), Error> {
        let spec = self.spec.get_or_insert_default();

        let strategy = spec
            .update_strategy
            .get_or_insert_with(StatefulSetUpdateStrategy::default);
        let rolling = strategy.type_.get_or_insert_with(|| ON_DELETE.to_owned()) == ROLLING_UPDATE;
        if rolling && let Some(rolling_update) = &mut strategy.rolling_update {
            rolling_update.partition.get_or_insert(0);
        }

        if spec.pod_management_policy.is_none() {
            let policy = if spec.min_ready_seconds.unwrap_or_default() > 0 || rolling {
                POD_MANAGEMENT_ORDERED_READY
            } else {
                POD_MANAGEMENT_PARALLEL
            };
            spec.pod_management_policy = Some(policy.to_owned());
        }

        spec.template
            .spec
            .get_or_insert_default()
            .security_context
            .get_or_insert_default();

        spec.replicas.get_or_insert(DEFAULT_REPLICAS);
        spec.revision_history_limit
            .get_or_insert(DEFAULT_REVISION_HISTORY_LIMIT);
        Ok(())
    }
}

impl ApplyDefaults for Service {
    const KIND: ObjectKind = ObjectKind::Service;

    fn apply_defaults(&mut self, _defaulter: &Defaulter) -> Result<(), Error> {
        let spec = self.spec.get_or_insert_default();

        let affinity = spec
            .session_affinity
            .get_or_insert_with(|| SESSION_AFFINITY_NONE.to_owned());
        if affinity == SESSION_AFFINITY_NONE {
            spec.session_affinity_config = None;
        } else if affinity == SESSION_AFFINITY_CLIENT_IP {
            let has_timeout = spec
                .session_affinity_config
                .as_ref()
                .and_then(|config| config.client_ip.as_ref())
                .is_some_and(|client_ip| client_ip.timeout_seconds.is_some());
            if !has_timeout {
                spec.session_affinity_config = Some(SessionAffinityConfig {
                    client_ip: Some(ClientIPConfig {
                        timeout_seconds: Some(DEFAULT_CLIENT_IP_AFFINITY_SECONDS),
                    }),
                });
            }
        }

        spec.type_
            .get_or_insert_with(|| SERVICE_TYPE_CLUSTER_IP.to_owned());

        for port in spec.ports.iter_mut().flatten() {
            port.protocol.get_or_insert_with(|| PROTOCOL_TCP.to_owned());
            let unset = match &port.target_port {
                None => true,
                Some(IntOrString::Int(target)) => *target == 0,
                Some(IntOrString::String(target)) => target.is_empty(),
            };
            if unset {
                port.target_port = Some(IntOrString::Int(port.port));
            }
        }

        if is_externally_accessible(spec) {
            spec.external_traffic_policy
                .get_or_insert_with(|| TRAFFIC_POLICY_CLUSTER.to_owned());
        }

        let service_type = spec.type_.as_deref().unwrap_or_default();
        if [
            SERVICE_TYPE_NODE_PORT,
            SERVICE_TYPE_LOAD_BALANCER,
            SERVICE_TYPE_CLUSTER_IP,
        ]
        .contains(&service_type)
        {
            spec.internal_traffic_policy
                .get_or_insert_with(|| TRAFFIC_POLICY_CLUSTER.to_owned());
        }
        if service_type == SERVICE_TYPE_LOAD_BALANCER {
            spec.allocate_load_balancer_node_ports.get_or_insert(true);
        }
        Ok(())
    }
}

/// A Service is reachable from outside the cluster if it is of type `LoadBalancer` or
/// `NodePort`, or a `ClusterIP` Service with external IPs.
fn is_externally_accessible(spec: &ServiceSpec) -> bool {
    match spec.type_.as_deref() {
        Some(SERVICE_TYPE_LOAD_BALANCER | SERVICE_TYPE_NODE_PORT) => true,
        Some(SERVICE_TYPE_CLUSTER_IP) => spec.external_ips.as_ref().is_some_and(|ips| !ips.is_empty()),
        _ => false,
    }
}
