use std::{fmt::Display, str::FromStr};

use k8s_openapi::apimachinery::pkg::version::Info;
use snafu::{OptionExt, ResultExt, Snafu};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("the Kubernetes version {version:?} must have the format major.minor"))]
    InvalidFormat { version: String },

    #[snafu(display("failed to parse the {part} part of the Kubernetes version {version:?}"))]
    ParsePart {
        source: std::num::ParseIntError,
        part: &'static str,
        version: String,
    },
}

/// Capabilities of the Kubernetes cluster the operator is running against, which influence
/// which fields may be set on generated objects.
pub trait ClusterCapabilities {
    /// Whether `PodSecurityContext.fsGroupChangePolicy` is honoured by the cluster.
    fn supports_fs_group_change_policy(&self) -> bool;
}

/// The version of the Kubernetes API server.
///
/// [`Info`] tracks these fields as Strings, managed clusters sometimes report the minor version
/// with a trailing `+` (e.g. `27+`), which is stripped here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct KubernetesVersion {
    pub major: u32,
    pub minor: u32,
}

impl KubernetesVersion {
    const FS_GROUP_CHANGE_POLICY_SINCE: Self = Self {
        major: 1,
        minor: 20,
    };

    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    fn parse_part(part: &'static str, value: &str, version: &str) -> Result<u32, Error> {
        value
            .trim_end_matches('+')
            .parse()
            .context(ParsePartSnafu { part, version })
    }
}

impl FromStr for KubernetesVersion {
    type Err = Error;

    fn from_str(version: &str) -> Result<Self, Self::Err> {
        let version = version.trim_start_matches('v');
        let (major, rest) = version
            .split_once('.')
            .context(InvalidFormatSnafu { version })?;
        // Ignore the patch version if present
        let minor = rest.split_once('.').map_or(rest, |(minor, _)| minor);

        Ok(Self {
            major: Self::parse_part("major", major, version)?,
            minor: Self::parse_part("minor", minor, version)?,
        })
    }
}

impl TryFrom<&Info> for KubernetesVersion {
    type Error = Error;

    fn try_from(info: &Info) -> Result<Self, Self::Error> {
        let version = format!("{}.{}", info.major, info.minor);
        Ok(Self {
            major: Self::parse_part("major", &info.major, &version)?,
            minor: Self::parse_part("minor", &info.minor, &version)?,
        })
    }
}

impl Display for KubernetesVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{major}.{minor}", major = self.major, minor = self.minor)
    }
}

impl ClusterCapabilities for KubernetesVersion {
    fn supports_fs_group_change_policy(&self) -> bool {
        *self >= Self::FS_GROUP_CHANGE_POLICY_SINCE
    }
}
