//! Entry point of the admission/registration hook: decodes an object of a known kind, applies
//! its defaults and encodes it again.

use k8s_openapi::api::{
    apps::v1::{Deployment, StatefulSet},
    core::v1::Service,
};
use kube::core::DynamicObject;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use snafu::{OptionExt, ResultExt, Snafu};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::instrument;

use crate::{
    crd::{
        agent::{VLAgent, VMAgent},
        alert::{VMAlert, VMAlertmanager},
        anomaly::VMAnomaly,
        auth::VMAuth,
        cluster::{VLCluster, VMCluster, VTCluster},
        distributed::VMDistributed,
        scrape::VMServiceScrape,
        single::{VLSingle, VLogs, VMSingle, VTSingle},
    },
    defaults::{self, ApplyDefaults, Defaulter},
};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("object has no kind"))]
    MissingKind,

    #[snafu(display("no defaults are known for kind {kind:?}"))]
    UnknownKind {
        source: strum::ParseError,
        kind: String,
    },

    #[snafu(display("failed to deserialize object as {kind}"))]
    DeserializeObject {
        source: serde_json::Error,
        kind: ObjectKind,
    },

    #[snafu(display("failed to apply defaults to {kind}"))]
    ApplyDefaults {
        source: defaults::Error,
        kind: ObjectKind,
    },

    #[snafu(display("failed to serialize defaulted {kind}"))]
    SerializeObject {
        source: serde_json::Error,
        kind: ObjectKind,
    },
}

/// Every kind the defaulting engine handles, named by its Kubernetes kind.
#[derive(AsRefStr, Clone, Copy, Debug, Display, EnumIter, EnumString, Eq, Hash, PartialEq)]
pub enum ObjectKind {
    Deployment,
    StatefulSet,
    Service,
    VMCluster,
    VLCluster,
    VTCluster,
    VMSingle,
    VLSingle,
    VTSingle,
    VLogs,
    VMAgent,
    VLAgent,
    VMAlert,
    VMAlertmanager,
    VMAuth,
    VMAnomaly,
    VMServiceScrape,
    VMDistributed,
}

/// Applies the defaults of `kind` to a JSON encoded object.
#[instrument(skip(defaulter, object))]
pub fn default_object(
    defaulter: &Defaulter,
    kind: ObjectKind,
    object: Value,
) -> Result<Value, Error> {
    match kind {
        ObjectKind::Deployment => round_trip::<Deployment>(defaulter, object),
        ObjectKind::StatefulSet => round_trip::<StatefulSet>(defaulter, object),
        ObjectKind::Service => round_trip::<Service>(defaulter, object),
        ObjectKind::VMCluster => round_trip::<VMCluster>(defaulter, object),
        ObjectKind::VLCluster => round_trip::<VLCluster>(defaulter, object),
        ObjectKind::VTCluster => round_trip::<VTCluster>(defaulter, object),
        ObjectKind::VMSingle => round_trip::<VMSingle>(defaulter, object),
        ObjectKind::VLSingle => round_trip::<VLSingle>(defaulter, object),
        ObjectKind::VTSingle => round_trip::<VTSingle>(defaulter, object),
        ObjectKind::VLogs => round_trip::<VLogs>(defaulter, object),
        ObjectKind::VMAgent => round_trip::<VMAgent>(defaulter, object),
        ObjectKind::VLAgent => round_trip::<VLAgent>(defaulter, object),
        ObjectKind::VMAlert => round_trip::<VMAlert>(defaulter, object),
        ObjectKind::VMAlertmanager => round_trip::<VMAlertmanager>(defaulter, object),
        ObjectKind::VMAuth => round_trip::<VMAuth>(defaulter, object),
        ObjectKind::VMAnomaly => round_trip::<VMAnomaly>(defaulter, object),
        ObjectKind::VMServiceScrape => round_trip::<VMServiceScrape>(defaulter, object),
        ObjectKind::VMDistributed => round_trip::<VMDistributed>(defaulter, object),
    }
}

/// Applies defaults to an untyped object, picking the rules by its `kind`.
pub fn default_dynamic(
    defaulter: &Defaulter,
    object: DynamicObject,
) -> Result<DynamicObject, Error> {
    let kind = object.types.as_ref().context(MissingKindSnafu)?.kind.clone();
    let kind = kind
        .parse::<ObjectKind>()
        .context(UnknownKindSnafu { kind })?;

    let value = serde_json::to_value(&object).context(SerializeObjectSnafu { kind })?;
    let defaulted = default_object(defaulter, kind, value)?;
    serde_json::from_value(defaulted).context(DeserializeObjectSnafu { kind })
}

fn round_trip<K>(defaulter: &Defaulter, object: Value) -> Result<Value, Error>
where
    K: ApplyDefaults + kube::Resource + DeserializeOwned + Serialize,
{
    let kind = K::KIND;
    let mut typed = K::deserialize(&object).context(DeserializeObjectSnafu { kind })?;
    defaulter
        .apply(&mut typed)
        .context(ApplyDefaultsSnafu { kind })?;
    let mut defaulted = serde_json::to_value(&typed).context(SerializeObjectSnafu { kind })?;

    // Custom resources only model their spec, anything else at the top level (e.g. the status)
    // is carried over as is
    if let (Value::Object(defaulted), Value::Object(original)) = (&mut defaulted, object) {
        for (key, value) in original {
            defaulted.entry(key).or_insert(value);
        }
    }
    Ok(defaulted)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::rstest;
    use serde_json::json;
    use strum::IntoEnumIterator;

    use super::*;
    use crate::config::BaseOperatorConfig;

    fn defaulter() -> Defaulter {
        Defaulter::new(Arc::new(BaseOperatorConfig::default()))
    }

    #[rstest]
    #[case::deployment("Deployment", ObjectKind::Deployment)]
    #[case::cluster("VMCluster", ObjectKind::VMCluster)]
    #[case::alertmanager("VMAlertmanager", ObjectKind::VMAlertmanager)]
    fn kind_names(#[case] name: &str, #[case] kind: ObjectKind) {
        assert_eq!(name.parse::<ObjectKind>().ok(), Some(kind));
        assert_eq!(kind.to_string(), name);
    }

    #[test]
    fn unknown_kind() {
        let object: DynamicObject = serde_json::from_value(json!({
            "apiVersion": "v1",
            "kind": "ConfigMap",
            "metadata": {"name": "config"},
        }))
        .expect("illegal test input");

        let error = default_dynamic(&defaulter(), object).expect_err("ConfigMaps have no defaults");
        assert!(matches!(error, Error::UnknownKind { ref kind, .. } if kind == "ConfigMap"));
    }

    #[test]
    fn dynamic_service() {
        let object: DynamicObject = serde_json::from_value(json!({
            "apiVersion": "v1",
            "kind": "Service",
            "metadata": {"name": "vmagent", "namespace": "monitoring"},
            "spec": {"ports": [{"port": 8429}]},
        }))
        .expect("illegal test input");

        let defaulted = default_dynamic(&defaulter(), object).expect("defaults must apply");

        assert_eq!(defaulted.metadata.name.as_deref(), Some("vmagent"));
        assert_eq!(defaulted.data["spec"]["type"], "ClusterIP");
        assert_eq!(defaulted.data["spec"]["ports"][0]["targetPort"], 8429);
    }

    #[test]
    fn fields_without_defaults_are_kept() {
        let object = json!({
            "apiVersion": "operator.victoriametrics.com/v1beta1",
            "kind": "VMAgent",
            "metadata": {"name": "agent"},
            "spec": {
                "scrapeInterval": "30s",
                "replicaCount": 2,
                "remoteWrite": [{
                    "url": "http://vminsert:8480/insert/0/prometheus/api/v1/write",
                    "basicAuth": {"username": {"name": "remote-write", "key": "user"}},
                }],
                "license": {"key": "secret-license-key", "forceOffline": true, "note": "kept"},
            },
            "status": {"updateStatus": "operational"},
        });

        let defaulted = default_object(&defaulter(), ObjectKind::VMAgent, object.clone())
            .expect("defaults must apply");

        let spec = &defaulted["spec"];
        assert_eq!(spec["scrapeInterval"], "30s");
        assert_eq!(spec["replicaCount"], 2);
        assert_eq!(spec["remoteWrite"], object["spec"]["remoteWrite"]);
        assert_eq!(spec["license"], object["spec"]["license"]);
        assert_eq!(spec["port"], "8429");
        assert_eq!(defaulted["status"], object["status"]);
    }

    #[test]
    fn nested_fields_without_defaults_are_kept() {
        let object = json!({
            "apiVersion": "operator.victoriametrics.com/v1beta1",
            "kind": "VMCluster",
            "metadata": {"name": "cluster"},
            "spec": {
                "retentionPeriod": "1y",
                "vmstorage": {
                    "replicaCount": 3,
                    "storage": {"volumeClaimTemplate": {"spec": {"storageClassName": "fast"}}},
                    "vmBackup": {"destination": "s3://backups/cluster", "disableDaily": true},
                },
                "vmselect": {"cacheMountPath": "/cache"},
                "requestLoadBalancer": {"enabled": true, "spec": {"replicaCount": 2}},
            },
        });

        let defaulted = default_object(&defaulter(), ObjectKind::VMCluster, object.clone())
            .expect("defaults must apply");

        let (spec, original) = (&defaulted["spec"], &object["spec"]);
        assert_eq!(spec["retentionPeriod"], "1y");
        assert_eq!(spec["vmstorage"]["replicaCount"], 3);
        assert_eq!(spec["vmstorage"]["storage"], original["vmstorage"]["storage"]);
        assert_eq!(spec["vmstorage"]["vmBackup"]["destination"], "s3://backups/cluster");
        assert_eq!(spec["vmstorage"]["vmBackup"]["disableDaily"], true);
        assert_eq!(spec["vmstorage"]["vmBackup"]["port"], "8300");
        assert_eq!(spec["vmselect"]["cacheMountPath"], "/cache");
        assert_eq!(spec["requestLoadBalancer"]["spec"]["replicaCount"], 2);
    }

    #[test]
    fn malformed_object() {
        let error = default_object(
            &defaulter(),
            ObjectKind::VMAgent,
            json!({"apiVersion": "operator.victoriametrics.com/v1beta1", "kind": "VMAgent", "metadata": {}, "spec": {"port": 8429}}),
        )
        .expect_err("port must be a string");
        assert!(matches!(
            error,
            Error::DeserializeObject {
                kind: ObjectKind::VMAgent,
                ..
            }
        ));
    }

    #[test]
    fn every_kind_accepts_a_minimal_object() {
        for kind in ObjectKind::iter() {
            let (api_version, spec) = match kind {
                ObjectKind::Deployment | ObjectKind::StatefulSet => {
                    ("apps/v1", json!({"selector": {}, "template": {}}))
                }
                ObjectKind::Service => ("v1", json!({})),
                ObjectKind::VLCluster
                | ObjectKind::VTCluster
                | ObjectKind::VLSingle
                | ObjectKind::VTSingle
                | ObjectKind::VLAgent
                | ObjectKind::VMAnomaly => ("operator.victoriametrics.com/v1", json!({})),
                ObjectKind::VMDistributed => ("operator.victoriametrics.com/v1alpha1", json!({})),
                _ => ("operator.victoriametrics.com/v1beta1", json!({})),
            };
            let object = json!({
                "apiVersion": api_version,
                "kind": kind.as_ref(),
                "metadata": {"name": "minimal"},
                "spec": spec,
            });

            let defaulted = default_object(&defaulter(), kind, object)
                .unwrap_or_else(|error| panic!("defaulting {kind} failed: {error}"));
            assert_eq!(defaulted["kind"], kind.as_ref());
        }
    }
}
