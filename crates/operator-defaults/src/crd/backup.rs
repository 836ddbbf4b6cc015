use k8s_openapi::api::core::v1::ResourceRequirements;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::commons::{image::Image, params::ExtraFields};

/// The backup manager sidecar of a storage node.
///
/// The backup manager is only available as an enterprise image.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VMBackup {
    #[serde(default)]
    pub image: Image,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,

    #[serde(default)]
    pub resources: ResourceRequirements,

    #[serde(flatten)]
    pub extra: ExtraFields,
}
