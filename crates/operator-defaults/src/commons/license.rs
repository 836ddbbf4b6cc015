use k8s_openapi::api::core::v1::SecretKeySelector;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{commons::params::ExtraFields, utils::option::StringOptionExt};

/// Enterprise license of a custom resource.
///
/// Applications with a license run the enterprise flavour of their image, see
/// [`add_enterprise_suffix`](crate::commons::image::add_enterprise_suffix).
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    /// Enterprise license key, mutually exclusive with `keyRef`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Secret key containing the enterprise license key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_ref: Option<SecretKeySelector>,

    /// Run without verifying the license online.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_offline: Option<bool>,

    /// How often the license key is reloaded from `keyRef`, e.g. `30s`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reload_interval: Option<String>,

    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl License {
    /// A license counts as provided if it carries either an inline key or a secret reference.
    pub fn is_provided(&self) -> bool {
        !self.key.is_unset() || self.key_ref.is_some()
    }
}

/// Convenience for the common case of an optional license field.
pub fn is_provided(license: Option<&License>) -> bool {
    license.is_some_and(License::is_provided)
}
