//! Strict security posture for the pods and containers of an application.
//!
//! Applications opt in through [`CommonAppsParams::use_strict_security`]. A custom
//! [`SecurityContext`](crate::commons::security::SecurityContext) supplied on the custom resource
//! always replaces the computed defaults instead of being merged with them.

use k8s_openapi::api::core::v1::{AppArmorProfile, Container, PodSecurityContext, SecurityContext};

use crate::{
    builder::security::{PodSecurityContextBuilder, SecurityContextBuilder},
    commons::{params::CommonAppsParams, security::SecurityContext as CustomSecurityContext},
    utils::k8s_version::ClusterCapabilities,
};

/// `nobody` in all images shipped by default (alpine, busybox and distroless based).
pub const CONTAINER_USER_GROUP: i64 = 65534;

const SECCOMP_RUNTIME_DEFAULT: &str = "RuntimeDefault";
const FS_GROUP_CHANGE_ON_ROOT_MISMATCH: &str = "OnRootMismatch";
const APP_ARMOR_RUNTIME_DEFAULT: &str = "RuntimeDefault";
const APP_ARMOR_UNCONFINED: &str = "Unconfined";

/// Returns the pod-level security context of an application.
///
/// Nothing is returned unless strict security is enabled. The custom pod context is returned
/// unchanged if the user supplied a custom security context, which might be [`None`] as well.
pub fn pod_security_context(
    params: &CommonAppsParams,
    require_root: bool,
    capabilities: &impl ClusterCapabilities,
) -> Option<PodSecurityContext> {
    if !params.use_strict_security.unwrap_or_default() {
        return None;
    }
    if let Some(custom) = &params.security_context {
        return custom.pod_security_context.clone();
    }

    let mut builder = PodSecurityContextBuilder::new();
    builder
        .fs_group(CONTAINER_USER_GROUP)
        .seccomp_profile_type(SECCOMP_RUNTIME_DEFAULT);
    if !require_root {
        builder
            .run_as_non_root()
            .run_as_user(CONTAINER_USER_GROUP)
            .run_as_group(CONTAINER_USER_GROUP);
    }
    if capabilities.supports_fs_group_change_policy() {
        builder.fs_group_change_policy(FS_GROUP_CHANGE_ON_ROOT_MISMATCH);
    }
    Some(builder.build())
}

/// Returns the security context for the containers of an application.
///
/// Returns [`None`] if strict security is disabled and there is no custom security context.
pub fn container_security_context(
    params: &CommonAppsParams,
    require_root: bool,
) -> Option<SecurityContext> {
    match &params.security_context {
        Some(custom) => Some(custom_container_security_context(custom)),
        None if params.use_strict_security.unwrap_or_default() => {
            Some(default_container_security_context(require_root))
        }
        None => None,
    }
}

/// Sets the security context of every container, overwriting whatever was there.
///
/// The containers are left untouched if [`container_security_context`] returns nothing.
pub fn apply_container_security(
    containers: &mut [Container],
    params: &CommonAppsParams,
    require_root: bool,
) {
    let Some(context) = container_security_context(params, require_root) else {
        return;
    };
    for container in containers {
        container.security_context = Some(context.clone());
    }
}

fn default_container_security_context(require_root: bool) -> SecurityContext {
    let mut builder = SecurityContextBuilder::new();
    builder
        .privileged(false)
        .read_only_root_filesystem(true)
        .allow_privilege_escalation(false)
        .drop_capabilities(&["ALL"]);
    if !require_root {
        builder
            .run_as_user(CONTAINER_USER_GROUP)
            .run_as_group(CONTAINER_USER_GROUP)
            .run_as_non_root(true);
    }
    builder.build()
}

/// Assembles a container context from the container part and the user related settings of the pod
/// part of a custom security context.
fn custom_container_security_context(custom: &CustomSecurityContext) -> SecurityContext {
    let mut context = SecurityContext::default();
    if let Some(container) = &custom.container_security_context {
        context.privileged = container.privileged;
        context.capabilities.clone_from(&container.capabilities);
        context.read_only_root_filesystem = container.read_only_root_filesystem;
        context.allow_privilege_escalation = container.allow_privilege_escalation;
        context.proc_mount.clone_from(&container.proc_mount);
    }
    if let Some(pod) = &custom.pod_security_context {
        context.run_as_user = pod.run_as_user;
        context.run_as_group = pod.run_as_group;
        context.run_as_non_root = pod.run_as_non_root;
        context.app_armor_profile.clone_from(&pod.app_armor_profile);
        context.seccomp_profile.clone_from(&pod.seccomp_profile);
    }
    context
}

/// Compares two AppArmor profiles the way the API server stores them.
///
/// The API server omits a profile which only restates the runtime default, so a profile of type
/// `RuntimeDefault` or `Unconfined` is equivalent to no profile at all. When both profiles are
/// present, empty fields of `desired` match any value of `actual`.
pub fn app_armor_profiles_equivalent(
    desired: Option<&AppArmorProfile>,
    actual: Option<&AppArmorProfile>,
) -> bool {
    match (desired, actual) {
        (None, None) => true,
        (Some(desired), Some(actual)) => {
            (desired.type_.is_empty() || desired.type_ == actual.type_)
                && (desired.localhost_profile.is_none()
                    || desired.localhost_profile == actual.localhost_profile)
        }
        (Some(profile), None) | (None, Some(profile)) => {
            profile.type_ == APP_ARMOR_RUNTIME_DEFAULT || profile.type_ == APP_ARMOR_UNCONFINED
        }
    }
}

/// Compares container security contexts, using [`app_armor_profiles_equivalent`] for the
/// AppArmor profile and strict equality for everything else.
pub fn security_contexts_equivalent(
    desired: Option<&SecurityContext>,
    actual: Option<&SecurityContext>,
) -> bool {
    match (desired, actual) {
        (None, None) => true,
        (Some(desired), Some(actual)) => {
            app_armor_profiles_equivalent(
                desired.app_armor_profile.as_ref(),
                actual.app_armor_profile.as_ref(),
            ) && SecurityContext {
                app_armor_profile: None,
                ..desired.clone()
            } == SecurityContext {
                app_armor_profile: None,
                ..actual.clone()
            }
        }
        _ => false,
    }
}

/// Pod-level counterpart of [`security_contexts_equivalent`].
pub fn pod_security_contexts_equivalent(
    desired: Option<&PodSecurityContext>,
    actual: Option<&PodSecurityContext>,
) -> bool {
    match (desired, actual) {
        (None, None) => true,
        (Some(desired), Some(actual)) => {
            app_armor_profiles_equivalent(
                desired.app_armor_profile.as_ref(),
                actual.app_armor_profile.as_ref(),
            ) && PodSecurityContext {
                app_armor_profile: None,
                ..desired.clone()
            } == PodSecurityContext {
                app_armor_profile: None,
                ..actual.clone()
            }
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use rstest::rstest;

    use super::*;
    use crate::utils::k8s_version::KubernetesVersion;

    fn params(yaml: &str) -> CommonAppsParams {
        serde_yaml::from_str(yaml).expect("illegal test input")
    }

    fn app_armor(type_: &str, localhost_profile: Option<&str>) -> AppArmorProfile {
        AppArmorProfile {
            localhost_profile: localhost_profile.map(ToOwned::to_owned),
            type_: type_.to_owned(),
        }
    }

    #[rstest]
    #[case::strict_non_root(false, KubernetesVersion::new(1, 30), indoc! {"
        fsGroup: 65534
        fsGroupChangePolicy: OnRootMismatch
        runAsGroup: 65534
        runAsNonRoot: true
        runAsUser: 65534
        seccompProfile:
          type: RuntimeDefault
    "})]
    #[case::strict_root(true, KubernetesVersion::new(1, 30), indoc! {"
        fsGroup: 65534
        fsGroupChangePolicy: OnRootMismatch
        seccompProfile:
          type: RuntimeDefault
    "})]
    #[case::old_cluster(false, KubernetesVersion::new(1, 19), indoc! {"
        fsGroup: 65534
        runAsGroup: 65534
        runAsNonRoot: true
        runAsUser: 65534
        seccompProfile:
          type: RuntimeDefault
    "})]
    fn strict_pod_security_context(
        #[case] require_root: bool,
        #[case] version: KubernetesVersion,
        #[case] expected: &str,
    ) {
        let params = params("useStrictSecurity: true");
        let expected: PodSecurityContext = serde_yaml::from_str(expected).expect("illegal test input");

        assert_eq!(
            pod_security_context(&params, require_root, &version),
            Some(expected)
        );
    }

    #[rstest]
    #[case::strict_unset("{}")]
    #[case::strict_disabled("useStrictSecurity: false")]
    #[case::custom_without_strict(indoc! {"
        securityContext:
          podSecurityContext:
            runAsUser: 1000
    "})]
    fn no_pod_security_context_without_strict(#[case] input: &str) {
        let params = params(input);
        assert_eq!(
            pod_security_context(&params, false, &KubernetesVersion::new(1, 30)),
            None
        );
    }

    #[test]
    fn custom_pod_security_context_wins() {
        let params = params(indoc! {"
            useStrictSecurity: true
            securityContext:
              podSecurityContext:
                runAsUser: 1000
        "});

        assert_eq!(
            pod_security_context(&params, false, &KubernetesVersion::new(1, 30)),
            Some(PodSecurityContext {
                run_as_user: Some(1000),
                ..PodSecurityContext::default()
            })
        );
    }

    #[test]
    fn strict_container_security_context() {
        let params = params("useStrictSecurity: true");
        let expected: SecurityContext = serde_yaml::from_str(indoc! {"
            allowPrivilegeEscalation: false
            capabilities:
              drop:
                - ALL
            privileged: false
            readOnlyRootFilesystem: true
            runAsGroup: 65534
            runAsNonRoot: true
            runAsUser: 65534
        "})
        .expect("illegal test input");

        assert_eq!(container_security_context(&params, false), Some(expected));
    }

    #[test]
    fn custom_container_security_context_without_strict() {
        let params = params(indoc! {"
            securityContext:
              podSecurityContext:
                runAsUser: 1000
                fsGroup: 2000
                seccompProfile:
                  type: Localhost
                  localhostProfile: profiles/audit.json
              containerSecurityContext:
                privileged: true
                procMount: Unmasked
        "});

        assert_eq!(
            container_security_context(&params, false),
            Some(SecurityContext {
                privileged: Some(true),
                proc_mount: Some("Unmasked".to_owned()),
                run_as_user: Some(1000),
                seccomp_profile: Some(k8s_openapi::api::core::v1::SeccompProfile {
                    localhost_profile: Some("profiles/audit.json".to_owned()),
                    type_: "Localhost".to_owned(),
                }),
                ..SecurityContext::default()
            })
        );
    }

    #[test]
    fn containers_untouched_without_strict() {
        let existing = SecurityContext {
            run_as_user: Some(42),
            ..SecurityContext::default()
        };
        let mut containers = vec![Container {
            name: "main".to_owned(),
            security_context: Some(existing.clone()),
            ..Container::default()
        }];

        apply_container_security(&mut containers, &params("{}"), false);
        assert_eq!(containers[0].security_context, Some(existing));

        apply_container_security(&mut containers, &params("useStrictSecurity: true"), true);
        let applied = containers[0]
            .security_context
            .as_ref()
            .expect("security context must be set");
        assert_eq!(applied.run_as_user, None);
        assert_eq!(applied.read_only_root_filesystem, Some(true));
    }

    #[rstest]
    #[case::both_absent(None, None, true)]
    #[case::runtime_default_vs_absent(Some(app_armor("RuntimeDefault", None)), None, true)]
    #[case::absent_vs_unconfined(None, Some(app_armor("Unconfined", None)), true)]
    #[case::localhost_vs_absent(Some(app_armor("Localhost", Some("k8s-apparmor"))), None, false)]
    #[case::empty_type_matches(Some(app_armor("", None)), Some(app_armor("Localhost", Some("p"))), true)]
    #[case::same(
        Some(app_armor("Localhost", Some("p"))),
        Some(app_armor("Localhost", Some("p"))),
        true
    )]
    #[case::different_profile(
        Some(app_armor("Localhost", Some("p"))),
        Some(app_armor("Localhost", Some("q"))),
        false
    )]
    #[case::different_type(
        Some(app_armor("RuntimeDefault", None)),
        Some(app_armor("Unconfined", None)),
        false
    )]
    fn app_armor_equivalence(
        #[case] desired: Option<AppArmorProfile>,
        #[case] actual: Option<AppArmorProfile>,
        #[case] expected: bool,
    ) {
        assert_eq!(
            app_armor_profiles_equivalent(desired.as_ref(), actual.as_ref()),
            expected
        );
    }

    #[test]
    fn security_context_equivalence_ignores_default_app_armor() {
        let desired = SecurityContext {
            app_armor_profile: Some(app_armor("RuntimeDefault", None)),
            run_as_user: Some(CONTAINER_USER_GROUP),
            ..SecurityContext::default()
        };
        let actual = SecurityContext {
            run_as_user: Some(CONTAINER_USER_GROUP),
            ..SecurityContext::default()
        };
        assert!(security_contexts_equivalent(Some(&desired), Some(&actual)));

        let actual = SecurityContext {
            run_as_user: Some(0),
            ..actual
        };
        assert!(!security_contexts_equivalent(Some(&desired), Some(&actual)));
        assert!(!security_contexts_equivalent(Some(&desired), None));

        let desired = PodSecurityContext {
            app_armor_profile: Some(app_armor("Unconfined", None)),
            ..PodSecurityContext::default()
        };
        assert!(pod_security_contexts_equivalent(
            Some(&desired),
            Some(&PodSecurityContext::default())
        ));
    }
}
