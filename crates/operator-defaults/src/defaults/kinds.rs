//! Defaulting rules of the operator's custom resources.

use k8s_openapi::api::core::v1::{HTTPGetAction, Probe, SecretKeySelector};
use kube::ResourceExt;
use tracing::{error, info};

use crate::{
    commons::{license, params::EmbeddedProbes},
    crd::{
        agent::{VLAgent, VMAgent},
        alert::{VMAlert, VMAlertmanager},
        anomaly::{VMAnomaly, VMAnomalyMonitoringPullSpec, VMAnomalyMonitoringSpec},
        auth::VMAuth,
        cluster::{RequestLoadBalancer, VLCluster, VMCluster, VTCluster},
        distributed::VMDistributed,
        scrape::{DISCOVERY_ROLE_ENDPOINT_SLICE, VMServiceScrape},
        single::{VLSingle, VLogs, VMSingle, VTSingle},
    },
    defaults::{
        ApplyDefaults, Defaulter, Error, MissingConfigReloaderImageSnafu, OverrideHints,
    },
    dispatch::ObjectKind,
    utils::option::StringOptionExt,
};

const AUTH_CONFIG_KEY: &str = "config.yaml";
const VM_STORAGE_DATA_PATH: &str = "vmstorage-data";
const VL_STORAGE_DATA_PATH: &str = "/vlstorage-data";
const VT_STORAGE_DATA_PATH: &str = "/vtstorage-data";
const ALERTMANAGER_REPLICAS: i32 = 1;
const ALERTMANAGER_PORT_NAME: &str = "web";
const ANOMALY_MONITORING_PORT: &str = "8080";
const DISTRIBUTED_READY_TIMEOUT: &str = "5m0s";
const DISTRIBUTED_UPDATE_PAUSE: &str = "1m0s";

impl ApplyDefaults for VMAuth {
    const KIND: ObjectKind = ObjectKind::VMAuth;

    fn apply_defaults(&mut self, defaulter: &Defaulter) -> Result<(), Error> {
        let object_name = self.name_any();
        let spec = &mut self.spec;

        if spec.secret_ref.is_none()
            && let Some(name) = spec.config_secret.non_empty()
        {
            info!(
                name = %object_name,
                secret = name,
                "translating deprecated configSecret into secretRef"
            );
            spec.secret_ref = Some(SecretKeySelector {
                key: AUTH_CONFIG_KEY.to_owned(),
                name: name.to_owned(),
                optional: None,
            });
        }

        let hints = OverrideHints::licensed(spec.license.as_ref());
        defaulter.apply_common(&mut spec.common, Some(&hints), &defaulter.config().vm_auth);
        defaulter.apply_config_reloader(
            &mut spec.config_reloader,
            spec.common.use_default_resources.unwrap_or_default(),
        );
        Ok(())
    }
}

impl ApplyDefaults for VMAlert {
    const KIND: ObjectKind = ObjectKind::VMAlert;

    fn apply_defaults(&mut self, defaulter: &Defaulter) -> Result<(), Error> {
        let spec = &mut self.spec;

        let hints = OverrideHints::licensed(spec.license.as_ref());
        defaulter.apply_common(&mut spec.common, Some(&hints), &defaulter.config().vm_alert);
        defaulter.apply_config_reloader(
            &mut spec.config_reloader,
            spec.common.use_default_resources.unwrap_or_default(),
        );

        // The rules are mounted from ConfigMaps, which can't be picked up without the reloader
        if spec.config_reloader.config_reloader_image.is_unset() {
            let name = self.name_any();
            error!(%name, "config-reloader image resolved to an empty reference");
            return MissingConfigReloaderImageSnafu {
                kind: Self::KIND,
                name,
            }
            .fail();
        }
        Ok(())
    }
}

impl ApplyDefaults for VMAgent {
    const KIND: ObjectKind = ObjectKind::VMAgent;

    fn apply_defaults(&mut self, defaulter: &Defaulter) -> Result<(), Error> {
        let spec = &mut self.spec;

        let hints = OverrideHints::licensed(spec.license.as_ref());
        defaulter.apply_common(&mut spec.common, Some(&hints), &defaulter.config().vm_agent);
        defaulter.apply_config_reloader(
            &mut spec.config_reloader,
            spec.common.use_default_resources.unwrap_or_default(),
        );
        spec.ingest_only_mode.get_or_insert(false);
        Ok(())
    }
}

impl ApplyDefaults for VLAgent {
    const KIND: ObjectKind = ObjectKind::VLAgent;

    fn apply_defaults(&mut self, defaulter: &Defaulter) -> Result<(), Error> {
        let spec = &mut self.spec;

        let hints = OverrideHints::licensed(spec.license.as_ref());
        defaulter.apply_common(&mut spec.common, Some(&hints), &defaulter.config().vl_agent);
        Ok(())
    }
}

impl ApplyDefaults for VMSingle {
    const KIND: ObjectKind = ObjectKind::VMSingle;

    fn apply_defaults(&mut self, defaulter: &Defaulter) -> Result<(), Error> {
        let spec = &mut self.spec;

        let hints = OverrideHints::licensed(spec.license.as_ref());
        defaulter.apply_common(&mut spec.common, Some(&hints), &defaulter.config().vm_single);
        defaulter.apply_config_reloader(
            &mut spec.config_reloader,
            spec.common.use_default_resources.unwrap_or_default(),
        );
        spec.ingest_only_mode.get_or_insert(true);

        if let Some(backup) = &mut spec.vm_backup {
            defaulter.apply_backup(backup, spec.common.use_default_resources);
        }
        Ok(())
    }
}

impl ApplyDefaults for VLSingle {
    const KIND: ObjectKind = ObjectKind::VLSingle;

    fn apply_defaults(&mut self, defaulter: &Defaulter) -> Result<(), Error> {
        let spec = &mut self.spec;

        let hints = OverrideHints::licensed(spec.license.as_ref());
        defaulter.apply_common(&mut spec.common, Some(&hints), &defaulter.config().vl_single);
        Ok(())
    }
}

impl ApplyDefaults for VTSingle {
    const KIND: ObjectKind = ObjectKind::VTSingle;

    fn apply_defaults(&mut self, defaulter: &Defaulter) -> Result<(), Error> {
        defaulter.apply_common(&mut self.spec.common, None, &defaulter.config().vt_single);
        Ok(())
    }
}

impl ApplyDefaults for VLogs {
    const KIND: ObjectKind = ObjectKind::VLogs;

    fn apply_defaults(&mut self, defaulter: &Defaulter) -> Result<(), Error> {
        defaulter.apply_common(&mut self.spec.common, None, &defaulter.config().vlogs);
        Ok(())
    }
}

impl ApplyDefaults for VMAnomaly {
    const KIND: ObjectKind = ObjectKind::VMAnomaly;

    /// The anomaly detection takes up to two minutes to start, the probes are relaxed accordingly.
    fn apply_defaults(&mut self, defaulter: &Defaulter) -> Result<(), Error> {
        let spec = &mut self.spec;

        spec.embedded_probes.get_or_insert_with(|| EmbeddedProbes {
            liveness_probe: Some(slow_start_probe()),
            readiness_probe: Some(slow_start_probe()),
            startup_probe: None,
        });

        let hints = OverrideHints::licensed(spec.license.as_ref());
        defaulter.apply_common(&mut spec.common, Some(&hints), &defaulter.config().vm_anomaly);

        spec.monitoring.get_or_insert_with(|| VMAnomalyMonitoringSpec {
            pull: Some(VMAnomalyMonitoringPullSpec {
                port: ANOMALY_MONITORING_PORT.to_owned(),
                ..VMAnomalyMonitoringPullSpec::default()
            }),
            ..VMAnomalyMonitoringSpec::default()
        });
        Ok(())
    }
}

fn slow_start_probe() -> Probe {
    Probe {
        initial_delay_seconds: Some(10),
        failure_threshold: Some(16),
        period_seconds: Some(10),
        ..Probe::default()
    }
}

impl ApplyDefaults for VMAlertmanager {
    const KIND: ObjectKind = ObjectKind::VMAlertmanager;

    fn apply_defaults(&mut self, defaulter: &Defaulter) -> Result<(), Error> {
        let spec = &mut self.spec;

        defaulter.fill_cluster_domain(&mut spec.cluster_domain_name);
        spec.replica_count.get_or_insert(ALERTMANAGER_REPLICAS);
        spec.port_name
            .fill_with(|| ALERTMANAGER_PORT_NAME.to_owned());

        defaulter.apply_common(&mut spec.common, None, &defaulter.config().vm_alertmanager);
        defaulter.apply_config_reloader(
            &mut spec.config_reloader,
            spec.common.use_default_resources.unwrap_or_default(),
        );
        Ok(())
    }
}

impl ApplyDefaults for VMCluster {
    const KIND: ObjectKind = ObjectKind::VMCluster;

    fn apply_defaults(&mut self, defaulter: &Defaulter) -> Result<(), Error> {
        let config = defaulter.config();
        let spec = &mut self.spec;

        defaulter.fill_cluster_domain(&mut spec.cluster_domain_name);
        let hints = OverrideHints {
            tag: spec.cluster_version.clone(),
            licensed: license::is_provided(spec.license.as_ref()),
            use_strict_security: spec.use_strict_security,
            image_pull_secrets: spec.image_pull_secrets.clone(),
        };

        if let Some(storage) = &mut spec.vmstorage {
            let defaults = &config.vm_cluster.storage;
            storage
                .storage_data_path
                .fill_with(|| VM_STORAGE_DATA_PATH.to_owned());
            storage
                .vm_insert_port
                .fill_with(|| defaults.vminsert_port.clone());
            storage
                .vm_select_port
                .fill_with(|| defaults.vmselect_port.clone());
            defaulter.apply_common(&mut storage.common, Some(&hints), &defaults.common);

            if let Some(backup) = &mut storage.vm_backup {
                defaulter.apply_backup(backup, storage.common.use_default_resources);
            }
        }
        if let Some(insert) = &mut spec.vminsert {
            defaulter.apply_common(&mut insert.common, Some(&hints), &config.vm_cluster.insert);
        }
        if let Some(select) = &mut spec.vmselect {
            defaulter.apply_common(&mut select.common, Some(&hints), &config.vm_cluster.select);
        }

        apply_load_balancer(defaulter, spec.request_load_balancer.as_mut(), &hints);
        Ok(())
    }
}

impl ApplyDefaults for VLCluster {
    const KIND: ObjectKind = ObjectKind::VLCluster;

    fn apply_defaults(&mut self, defaulter: &Defaulter) -> Result<(), Error> {
        let config = defaulter.config();
        let spec = &mut self.spec;

        defaulter.fill_cluster_domain(&mut spec.cluster_domain_name);
        let hints = OverrideHints {
            tag: spec.cluster_version.clone(),
            licensed: license::is_provided(spec.license.as_ref()),
            use_strict_security: spec.use_strict_security,
            image_pull_secrets: spec.image_pull_secrets.clone(),
        };

        if let Some(storage) = &mut spec.vlstorage {
            storage
                .storage_data_path
                .fill_with(|| VL_STORAGE_DATA_PATH.to_owned());
            defaulter.apply_common(&mut storage.common, Some(&hints), &config.vl_cluster.storage);
        }
        if let Some(insert) = &mut spec.vlinsert {
            defaulter.apply_common(&mut insert.common, Some(&hints), &config.vl_cluster.insert);
        }
        if let Some(select) = &mut spec.vlselect {
            defaulter.apply_common(&mut select.common, Some(&hints), &config.vl_cluster.select);
        }

        apply_load_balancer(defaulter, spec.request_load_balancer.as_mut(), &hints);
        Ok(())
    }
}

impl ApplyDefaults for VTCluster {
    const KIND: ObjectKind = ObjectKind::VTCluster;

    /// Traces clusters have no enterprise flavour, so their hints never carry a license.
    fn apply_defaults(&mut self, defaulter: &Defaulter) -> Result<(), Error> {
        let config = defaulter.config();
        let spec = &mut self.spec;

        defaulter.fill_cluster_domain(&mut spec.cluster_domain_name);
        let hints = OverrideHints {
            tag: spec.cluster_version.clone(),
            licensed: false,
            use_strict_security: spec.use_strict_security,
            image_pull_secrets: spec.image_pull_secrets.clone(),
        };

        if let Some(storage) = &mut spec.storage {
            storage
                .storage_data_path
                .fill_with(|| VT_STORAGE_DATA_PATH.to_owned());
            defaulter.apply_common(&mut storage.common, Some(&hints), &config.vt_cluster.storage);
        }
        if let Some(insert) = &mut spec.insert {
            defaulter.apply_common(&mut insert.common, Some(&hints), &config.vt_cluster.insert);
        }
        if let Some(select) = &mut spec.select {
            defaulter.apply_common(&mut select.common, Some(&hints), &config.vt_cluster.select);
        }

        apply_load_balancer(defaulter, spec.request_load_balancer.as_mut(), &hints);
        Ok(())
    }
}

/// Defaults of the request load balancer in front of a cluster, which is only touched if enabled.
///
/// The load balancer runs the auth proxy, so it takes its defaults from there but shares the
/// hints of the cluster.
fn apply_load_balancer(
    defaulter: &Defaulter,
    load_balancer: Option<&mut RequestLoadBalancer>,
    hints: &OverrideHints,
) {
    let Some(load_balancer) = load_balancer.filter(|lb| lb.enabled) else {
        return;
    };
    let spec = &mut load_balancer.spec;

    defaulter.apply_common(&mut spec.common, Some(hints), &defaulter.config().vm_auth);
    spec.embedded_probes.get_or_insert_default();
    spec.startup_probe.get_or_insert_with(|| Probe {
        http_get: Some(HTTPGetAction::default()),
        ..Probe::default()
    });
    if let Some(service) = &mut spec.additional_service_spec {
        service.use_as_default = true;
    }
}

impl ApplyDefaults for VMServiceScrape {
    const KIND: ObjectKind = ObjectKind::VMServiceScrape;

    fn apply_defaults(&mut self, defaulter: &Defaulter) -> Result<(), Error> {
        if self.spec.discovery_role.is_unset()
            && defaulter.config().vm_service_scrape.enforce_endpoint_slices
        {
            self.spec.discovery_role = Some(DISCOVERY_ROLE_ENDPOINT_SLICE.to_owned());
        }
        Ok(())
    }
}

impl ApplyDefaults for VMDistributed {
    const KIND: ObjectKind = ObjectKind::VMDistributed;

    /// Only the zone timing and the license are defaulted, the embedded applications are
    /// defaulted once they are created as objects of their own.
    fn apply_defaults(&mut self, _defaulter: &Defaulter) -> Result<(), Error> {
        let spec = &mut self.spec;
        let zone_common = &mut spec.zone_common;

        zone_common
            .ready_timeout
            .fill_with(|| DISTRIBUTED_READY_TIMEOUT.to_owned());
        zone_common
            .update_pause
            .fill_with(|| DISTRIBUTED_UPDATE_PAUSE.to_owned());

        let Some(shared) = spec.license.as_ref().filter(|l| l.is_provided()) else {
            return Ok(());
        };
        for target in [
            &mut spec.vmauth.spec.license,
            &mut zone_common.vmagent.spec.license,
            &mut zone_common.vmcluster.spec.license,
        ] {
            if !license::is_provided(target.as_ref()) {
                *target = Some(shared.clone());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use indoc::indoc;
    use k8s_openapi::api::core::v1::ResourceRequirements;
    use rstest::rstest;
    use serde::de::DeserializeOwned;

    use super::*;
    use crate::{commons::license::License, config::BaseOperatorConfig};

    fn defaulter(yaml: &str) -> Defaulter {
        let config = BaseOperatorConfig::from_yaml_str(yaml).expect("illegal test config");
        Defaulter::new(Arc::new(config))
    }

    fn spec<T: DeserializeOwned>(yaml: &str) -> T {
        serde_yaml::from_str(yaml).expect("illegal test input")
    }

    #[test]
    fn vmauth_translates_config_secret() {
        let mut auth = VMAuth::new("proxy", spec("configSecret: proxy-config"));

        auth.apply_defaults(&defaulter("{}")).expect("defaults must apply");

        assert_eq!(
            auth.spec.secret_ref,
            Some(SecretKeySelector {
                key: "config.yaml".to_owned(),
                name: "proxy-config".to_owned(),
                optional: None,
            })
        );
        assert_eq!(auth.spec.common.port.as_deref(), Some("8427"));
    }

    #[test]
    fn vmauth_keeps_secret_ref() {
        let mut auth = VMAuth::new(
            "proxy",
            spec(indoc! {"
                configSecret: proxy-config
                secretRef:
                  name: other
                  key: auth.yaml
            "}),
        );

        auth.apply_defaults(&defaulter("{}")).expect("defaults must apply");

        let secret_ref = auth.spec.secret_ref.expect("secretRef must be set");
        assert_eq!(secret_ref.name, "other");
        assert_eq!(secret_ref.key, "auth.yaml");
    }

    #[test]
    fn vmalert_requires_config_reloader_image() {
        let defaulter = defaulter("configReloader: {image: ''}");

        let mut alert = VMAlert::new("rules", spec("{}"));
        let error = alert
            .apply_defaults(&defaulter)
            .expect_err("an empty config-reloader image must be rejected");
        assert!(matches!(
            error,
            Error::MissingConfigReloaderImage { kind: ObjectKind::VMAlert, ref name } if name == "rules"
        ));

        let mut alert = VMAlert::new("rules", spec("configReloaderImage: custom/reloader:v1"));
        alert
            .apply_defaults(&defaulter)
            .expect("an explicit config-reloader image is sufficient");
    }

    #[rstest]
    #[case::unset("{}", false)]
    #[case::explicit("ingestOnlyMode: true", true)]
    fn vmagent_ingest_only_mode(#[case] input: &str, #[case] expected: bool) {
        let mut agent = VMAgent::new("agent", spec(input));
        agent.apply_defaults(&defaulter("{}")).expect("defaults must apply");

        assert_eq!(agent.spec.ingest_only_mode, Some(expected));
        assert_eq!(
            agent.spec.config_reloader.config_reloader_image.as_deref(),
            Some("victoriametrics/operator:config-reloader-v0.61.0")
        );
    }

    #[test]
    fn vmsingle_defaults_backup() {
        let mut single = VMSingle::new(
            "single",
            spec(indoc! {"
                license:
                  key: secret-license-key
                vmBackup:
                  destination: s3://backups/vmsingle
            "}),
        );

        single.apply_defaults(&defaulter("{}")).expect("defaults must apply");

        assert_eq!(single.spec.ingest_only_mode, Some(true));
        assert_eq!(
            single.spec.common.image.tag.as_deref(),
            Some("v1.120.0-enterprise")
        );
        let backup = single.spec.vm_backup.expect("backup must be kept");
        assert_eq!(backup.image.tag.as_deref(), Some("v1.120.0-enterprise"));
        assert_eq!(backup.port.as_deref(), Some("8300"));
        assert_eq!(backup.extra["destination"], "s3://backups/vmsingle");
        assert_ne!(backup.resources, ResourceRequirements::default());
    }

    #[test]
    fn vmsingle_backup_follows_owner_resources() {
        let mut single = VMSingle::new(
            "single",
            spec(indoc! {"
                useDefaultResources: false
                vmBackup: {}
            "}),
        );

        single.apply_defaults(&defaulter("{}")).expect("defaults must apply");

        let backup = single.spec.vm_backup.expect("backup must be kept");
        assert_eq!(backup.resources, ResourceRequirements::default());
        assert_eq!(single.spec.common.resources, ResourceRequirements::default());
    }

    #[test]
    fn vmanomaly_defaults() {
        let mut anomaly = VMAnomaly::new("anomaly", spec("{}"));
        anomaly.apply_defaults(&defaulter("{}")).expect("defaults must apply");

        let probes = anomaly.spec.embedded_probes.expect("probes must be set");
        assert_eq!(probes.liveness_probe, Some(slow_start_probe()));
        assert_eq!(probes.readiness_probe, Some(slow_start_probe()));
        assert_eq!(probes.startup_probe, None);
        let monitoring = anomaly.spec.monitoring.expect("monitoring must be set");
        assert_eq!(
            monitoring.pull.map(|pull| pull.port).as_deref(),
            Some("8080")
        );
        assert!(monitoring.extra.is_empty());
        assert_eq!(anomaly.spec.common.port.as_deref(), Some("8490"));
    }

    #[test]
    fn vmalertmanager_defaults() {
        let mut alertmanager = VMAlertmanager::new("alertmanager", spec("{}"));
        alertmanager
            .apply_defaults(&defaulter("clusterDomainName: cluster.local"))
            .expect("defaults must apply");

        let spec = alertmanager.spec;
        assert_eq!(spec.cluster_domain_name.as_deref(), Some("cluster.local"));
        assert_eq!(spec.replica_count, Some(1));
        assert_eq!(spec.port_name.as_deref(), Some("web"));
        assert_eq!(
            spec.common.image.repository.as_deref(),
            Some("prom/alertmanager")
        );
        assert_eq!(spec.common.image.tag.as_deref(), Some("v0.28.1"));
    }

    #[test]
    fn vmcluster_shares_hints() {
        let mut cluster = VMCluster::new(
            "cluster",
            spec(indoc! {"
                clusterVersion: v1.119.0-cluster
                license:
                  key: secret-license-key
                useStrictSecurity: true
                imagePullSecrets:
                  - name: registry-credentials
                vmstorage:
                  vmBackup: {}
                vminsert: {}
                vmselect:
                  image:
                    tag: v1.118.0-cluster
            "}),
        );

        cluster.apply_defaults(&defaulter("{}")).expect("defaults must apply");

        let storage = cluster.spec.vmstorage.expect("storage must be kept");
        assert_eq!(storage.storage_data_path.as_deref(), Some("vmstorage-data"));
        assert_eq!(storage.vm_insert_port.as_deref(), Some("8400"));
        assert_eq!(storage.vm_select_port.as_deref(), Some("8401"));
        assert_eq!(
            storage.common.image.tag.as_deref(),
            Some("v1.119.0-enterprise-cluster")
        );
        assert_eq!(storage.common.use_strict_security, Some(true));
        assert_eq!(storage.common.image_pull_secrets.len(), 1);
        let backup = storage.vm_backup.expect("backup must be kept");
        assert_eq!(backup.image.tag.as_deref(), Some("v1.120.0-enterprise"));

        let insert = cluster.spec.vminsert.expect("insert must be kept");
        assert_eq!(
            insert.common.image.repository.as_deref(),
            Some("victoriametrics/vminsert")
        );
        assert_eq!(insert.common.port.as_deref(), Some("8480"));

        let select = cluster.spec.vmselect.expect("select must be kept");
        assert_eq!(select.common.image.tag.as_deref(), Some("v1.118.0-cluster"));

        assert_eq!(cluster.spec.request_load_balancer, None);
    }

    #[test]
    fn enabled_load_balancer_is_defaulted() {
        let mut cluster = VLCluster::new(
            "logs",
            spec(indoc! {"
                requestLoadBalancer:
                  enabled: true
                  spec:
                    additionalServiceSpec:
                      spec:
                        type: LoadBalancer
            "}),
        );

        cluster.apply_defaults(&defaulter("{}")).expect("defaults must apply");

        let load_balancer = cluster
            .spec
            .request_load_balancer
            .expect("load balancer must be kept")
            .spec;
        assert_eq!(load_balancer.embedded_probes, Some(EmbeddedProbes::default()));
        assert_eq!(
            load_balancer.startup_probe.and_then(|probe| probe.http_get),
            Some(HTTPGetAction::default())
        );
        assert!(
            load_balancer
                .additional_service_spec
                .is_some_and(|service| service.use_as_default)
        );
        assert_eq!(
            load_balancer.common.image.repository.as_deref(),
            Some("victoriametrics/vmauth")
        );
    }

    #[test]
    fn disabled_load_balancer_is_untouched() {
        let mut cluster = VTCluster::new("traces", spec("requestLoadBalancer: {enabled: false}"));
        let expected = cluster.spec.request_load_balancer.clone();

        cluster.apply_defaults(&defaulter("{}")).expect("defaults must apply");
        assert_eq!(cluster.spec.request_load_balancer, expected);
    }

    #[test]
    fn logs_and_traces_storage_data_path() {
        let defaulter = defaulter("{}");

        let mut logs = VLCluster::new("logs", spec("vlstorage: {}"));
        logs.apply_defaults(&defaulter).expect("defaults must apply");
        assert_eq!(
            logs.spec
                .vlstorage
                .and_then(|storage| storage.storage_data_path)
                .as_deref(),
            Some("/vlstorage-data")
        );

        let mut traces = VTCluster::new("traces", spec("storage: {}"));
        traces.apply_defaults(&defaulter).expect("defaults must apply");
        assert_eq!(
            traces
                .spec
                .storage
                .and_then(|storage| storage.storage_data_path)
                .as_deref(),
            Some("/vtstorage-data")
        );
    }

    #[rstest]
    #[case::enforced(
        "vmServiceScrape: {enforceEndpointSlices: true}",
        "{}",
        Some("endpointslice")
    )]
    #[case::not_enforced("{}", "{}", None)]
    #[case::explicit(
        "vmServiceScrape: {enforceEndpointSlices: true}",
        "discoveryRole: endpoints",
        Some("endpoints")
    )]
    fn service_scrape_discovery_role(
        #[case] config: &str,
        #[case] input: &str,
        #[case] expected: Option<&str>,
    ) {
        let mut scrape = VMServiceScrape::new("scrape", spec(input));
        scrape
            .apply_defaults(&defaulter(config))
            .expect("defaults must apply");

        assert_eq!(scrape.spec.discovery_role.as_deref(), expected);
    }

    #[test]
    fn vmdistributed_propagates_license() {
        let mut distributed = VMDistributed::new(
            "distributed",
            spec(indoc! {"
                license:
                  key: shared
                vmauth:
                  spec:
                    license:
                      key: own
            "}),
        );

        distributed
            .apply_defaults(&defaulter("{}"))
            .expect("defaults must apply");

        let spec = distributed.spec;
        assert_eq!(spec.zone_common.ready_timeout.as_deref(), Some("5m0s"));
        assert_eq!(spec.zone_common.update_pause.as_deref(), Some("1m0s"));
        let key = |license: Option<License>| license.and_then(|license| license.key);
        assert_eq!(key(spec.vmauth.spec.license), Some("own".to_owned()));
        assert_eq!(
            key(spec.zone_common.vmagent.spec.license),
            Some("shared".to_owned())
        );
        assert_eq!(
            key(spec.zone_common.vmcluster.spec.license),
            Some("shared".to_owned())
        );
    }

    #[test]
    fn unlicensed_kinds_never_get_enterprise_tags() {
        let defaulter = defaulter("{}");

        let mut logs = VLogs::new("logs", spec("{}"));
        logs.apply_defaults(&defaulter).expect("defaults must apply");
        assert_eq!(logs.spec.common.image.tag.as_deref(), Some("v1.24.0"));

        let mut traces = VTSingle::new("traces", spec("{}"));
        traces.apply_defaults(&defaulter).expect("defaults must apply");
        assert_eq!(traces.spec.common.image.tag.as_deref(), Some("v0.1.0"));
    }
}
