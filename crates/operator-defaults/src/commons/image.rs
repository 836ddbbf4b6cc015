//! Resolution of container image references.
//!
//! Every application of the operator runs a single main image. Its reference is assembled from the
//! image repository, the version tag and the pull policy, each of which can be set on the custom
//! resource or defaulted from the [`ApplicationDefaults`] of the application kind.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use tracing::debug;

use crate::{config::ApplicationDefaults, utils::option::StringOptionExt};

const ENTERPRISE_SUFFIX: &str = "-enterprise";
const ENTERPRISE_CLUSTER_SUFFIX: &str = "-enterprise-cluster";

/// [Pull policy](https://kubernetes.io/docs/concepts/containers/images/#image-pull-policy) used
/// when pulling images.
#[derive(
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    EnumString,
    Eq,
    JsonSchema,
    PartialEq,
    Serialize,
)]
pub enum PullPolicy {
    #[default]
    IfNotPresent,
    Always,
    Never,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Image repository, e.g. `victoriametrics/vmagent`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    /// Image tag, e.g. `v1.120.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_policy: Option<PullPolicy>,
}

impl Image {
    /// Fills the unset parts of the image reference.
    ///
    /// - The repository falls back to [`ApplicationDefaults::image`] and is always passed through
    ///   [`format_container_image`].
    /// - An unset tag is taken from `tag_override` (e.g. the version of a cluster), then from
    ///   [`ApplicationDefaults::version`]. Only such a defaulted tag is turned into its enterprise
    ///   variant when `licensed` is set, a tag chosen by the user is never rewritten.
    /// - The pull policy defaults to [`PullPolicy::IfNotPresent`].
    pub fn resolve(
        &mut self,
        registry: &str,
        defaults: &ApplicationDefaults,
        tag_override: Option<&str>,
        licensed: bool,
    ) {
        let repository = self.repository.fill_with(|| defaults.image.clone());
        *repository = format_container_image(registry, repository);

        if self.tag.is_unset() {
            let tag = tag_override
                .filter(|tag| !tag.is_empty())
                .unwrap_or(defaults.version.as_str());
            self.tag = Some(if licensed {
                let enterprise_tag = add_enterprise_suffix(tag);
                debug!(tag, %enterprise_tag, "using the enterprise image tag");
                enterprise_tag
            } else {
                tag.to_owned()
            });
        }

        self.pull_policy.get_or_insert_default();
    }
}

/// Turns a version tag into the tag of the enterprise flavour of the same release.
///
/// Only tags of the form `vX.Y.Z` with an optional `-suffix` are rewritten:
///
/// - `v1.120.0` becomes `v1.120.0-enterprise`
/// - `v1.120.0-cluster` becomes `v1.120.0-enterprise-cluster`
///
/// Tags which are already enterprise tags, carry any other suffix (such as `-rc1`), are pinned
/// to a digest or don't look like a version at all are returned unchanged. Applying the function
/// to its own output is a no-op.
pub fn add_enterprise_suffix(tag: &str) -> String {
    if !tag.starts_with('v') || tag.matches('.').count() != 2 || tag.contains('@') {
        return tag.to_owned();
    }

    match tag.split_once('-') {
        None => format!("{tag}{ENTERPRISE_SUFFIX}"),
        Some((version, "cluster")) => format!("{version}{ENTERPRISE_CLUSTER_SUFFIX}"),
        // Either enterprise already, or a pre-release we don't know how to handle
        Some(_) => tag.to_owned(),
    }
}

/// Prefixes `image` with the configured container `registry`.
///
/// The image is returned unchanged if no registry is configured, if it already points at a
/// registry (either the configured one or any other registry host) or if it is pinned to a digest.
pub fn format_container_image(registry: &str, image: &str) -> String {
    let registry = registry.trim_end_matches('/');
    if registry.is_empty()
        || image.is_empty()
        || image.contains('@')
        || image
            .strip_prefix(registry)
            .is_some_and(|rest| rest.starts_with('/'))
        || has_registry_host(image)
    {
        return image.to_owned();
    }

    format!("{registry}/{image}")
}

/// The first path segment of an image names a registry if it looks like a host name.
fn has_registry_host(image: &str) -> bool {
    image
        .split_once('/')
        .is_some_and(|(host, _)| host.contains(['.', ':']) || host == "localhost")
}
