//! The defaulting engine.
//!
//! [`Defaulter`] fills every unset field of an object from the operator-wide
//! [`BaseOperatorConfig`] without ever overwriting a value chosen by the user. Applying the
//! defaults to an already defaulted object is a no-op, so it is safe to run on every
//! reconciliation.
//!
//! The per-kind rules live in the [`ApplyDefaults`] implementations of the custom resources
//! ([`kinds`]) and of the Kubernetes workload objects ([`workload`]).

use std::{mem, sync::Arc};

use k8s_openapi::api::core::v1::LocalObjectReference;
use kube::{Resource, ResourceExt};
use snafu::Snafu;
use tracing::debug;

use crate::{
    commons::{
        image::format_container_image,
        license::{self, License},
        params::{CommonAppsParams, CommonConfigReloaderParams},
        resources,
    },
    config::{ApplicationDefaults, BaseOperatorConfig},
    crd::backup::VMBackup,
    dispatch::ObjectKind,
    utils::option::StringOptionExt,
};

pub mod kinds;
pub mod workload;

const DNS_POLICY_CLUSTER_FIRST: &str = "ClusterFirst";
const DEFAULT_SCHEDULER: &str = "default-scheduler";

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display(
        "no config-reloader image for {kind} {name:?}, the operator configuration must provide one"
    ))]
    MissingConfigReloaderImage { kind: ObjectKind, name: String },
}

/// Implemented by every object the engine knows how to default.
pub trait ApplyDefaults {
    const KIND: ObjectKind;

    /// Fills the unset fields of `self` in place.
    fn apply_defaults(&mut self, defaulter: &Defaulter) -> Result<(), Error>;
}

/// Settings a parent object pushes down into the [`CommonAppsParams`] of its parts, e.g. the
/// cluster-wide version of a multi-tier cluster.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverrideHints {
    /// Image tag used instead of the version of the application defaults.
    pub tag: Option<String>,

    /// Defaulted image tags are turned into enterprise tags.
    pub licensed: bool,

    pub use_strict_security: Option<bool>,

    /// Appended to the pull secrets of every part.
    pub image_pull_secrets: Vec<LocalObjectReference>,
}

impl OverrideHints {
    /// Hints of a standalone application, which only carry its license.
    pub fn licensed(license: Option<&License>) -> Self {
        Self {
            licensed: license::is_provided(license),
            ..Self::default()
        }
    }
}

/// Applies defaults based on a shared, read-only operator configuration.
#[derive(Clone, Debug)]
pub struct Defaulter {
    config: Arc<BaseOperatorConfig>,
}

impl Defaulter {
    pub fn new(config: Arc<BaseOperatorConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BaseOperatorConfig {
        &self.config
    }

    /// Applies the defaults of the object's kind.
    pub fn apply<T>(&self, object: &mut T) -> Result<(), Error>
    where
        T: ApplyDefaults + Resource,
    {
        let kind = T::KIND;
        debug!(%kind, name = %object.name_any(), "applying defaults");
        object.apply_defaults(self)
    }

    /// Fills the [`CommonAppsParams`] of an application from its kind's `defaults`.
    ///
    /// `hints` are provided by the parent object, if any. Only the resource profile is gated on
    /// the effective `useDefaultResources` setting, which resolves from the custom resource, the
    /// kind defaults and finally the operator-wide setting.
    pub fn apply_common(
        &self,
        common: &mut CommonAppsParams,
        hints: Option<&OverrideHints>,
        defaults: &ApplicationDefaults,
    ) {
        let config = self.config();

        common.image.resolve(
            &config.container_registry,
            defaults,
            hints.and_then(|hints| hints.tag.as_deref()),
            hints.is_some_and(|hints| hints.licensed),
        );

        if let Some(hints) = hints {
            for secret in &hints.image_pull_secrets {
                if !common.image_pull_secrets.contains(secret) {
                    common.image_pull_secrets.push(secret.clone());
                }
            }
            if common.use_strict_security.is_none() {
                common.use_strict_security = hints.use_strict_security;
            }
        }

        common
            .disable_self_service_scrape
            .get_or_insert(config.disable_self_service_scrape_creation);
        common.port.fill_with(|| defaults.port.clone());

        if common.use_strict_security.is_none() && config.enable_strict_security {
            common.use_strict_security = Some(true);
        }

        let use_default_resources = common
            .use_default_resources
            .or(defaults.use_default_resources)
            .unwrap_or(config.use_default_resources);
        if common.use_default_resources.is_none() && use_default_resources {
            common.use_default_resources = Some(true);
        }

        common
            .termination_grace_period_seconds
            .get_or_insert(defaults.termination_grace_period_seconds);
        common
            .dns_policy
            .fill_with(|| DNS_POLICY_CLUSTER_FIRST.to_owned());
        common
            .scheduler_name
            .fill_with(|| DEFAULT_SCHEDULER.to_owned());

        common.resources = resources::resolve(
            mem::take(&mut common.resources),
            &defaults.resource,
            use_default_resources,
        );
    }

    /// Fills the config-reloader sidecar parameters.
    ///
    /// The deprecated `configReloaderImageTag` is used as the image if no image is set.
    pub fn apply_config_reloader(
        &self,
        params: &mut CommonConfigReloaderParams,
        use_default_resources: bool,
    ) {
        let config = self.config();

        let deprecated_image = &params.config_reloader_image_tag;
        let image = params.config_reloader_image.fill_with(|| {
            deprecated_image
                .non_empty()
                .unwrap_or(config.config_reloader.image.as_str())
                .to_owned()
        });
        *image = format_container_image(&config.container_registry, image);

        params.config_reloader_resources = resources::resolve(
            mem::take(&mut params.config_reloader_resources),
            &config.config_reloader.resource,
            use_default_resources,
        );
    }

    /// Fills the backup manager sidecar of a storage node.
    ///
    /// `owner_use_default_resources` is the (already defaulted) setting of the storage node, the
    /// backup defaults decide if it is unset.
    pub fn apply_backup(&self, backup: &mut VMBackup, owner_use_default_resources: Option<bool>) {
        let config = self.config();
        let defaults = &config.vm_backup;
        let use_default_resources = owner_use_default_resources
            .or(defaults.use_default_resources)
            .unwrap_or(config.use_default_resources);

        // There is no community edition of the backup manager
        backup
            .image
            .resolve(&config.container_registry, defaults, None, true);
        backup.port.fill_with(|| defaults.port.clone());
        backup.resources = resources::resolve(
            mem::take(&mut backup.resources),
            &defaults.resource,
            use_default_resources,
        );
    }

    /// Falls back to the operator-wide cluster domain, if one is configured.
    pub(crate) fn fill_cluster_domain(&self, cluster_domain_name: &mut Option<String>) {
        let configured = &self.config().cluster_domain_name;
        if cluster_domain_name.is_unset() && !configured.is_empty() {
            *cluster_domain_name = Some(configured.clone());
        }
    }
}
