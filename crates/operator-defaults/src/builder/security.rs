use k8s_openapi::api::core::v1::{Capabilities, PodSecurityContext, SeccompProfile, SecurityContext};

/// A builder for container [`SecurityContext`] objects (not to be confused with
/// [`PodSecurityContext`]).
#[derive(Clone, Default)]
pub struct SecurityContextBuilder {
    security_context: SecurityContext,
}

impl SecurityContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(&self) -> SecurityContext {
        self.security_context.clone()
    }

    pub fn allow_privilege_escalation(&mut self, value: bool) -> &mut Self {
        self.security_context.allow_privilege_escalation = Some(value);
        self
    }

    /// Drops the given Linux capabilities, keeping the ones already added.
    pub fn drop_capabilities(&mut self, capabilities: &[&str]) -> &mut Self {
        let caps = self
            .security_context
            .capabilities
            .get_or_insert_with(Capabilities::default);
        caps.drop = Some(capabilities.iter().map(|c| (*c).to_owned()).collect());
        self
    }

    pub fn privileged(&mut self, value: bool) -> &mut Self {
        self.security_context.privileged = Some(value);
        self
    }

    pub fn read_only_root_filesystem(&mut self, value: bool) -> &mut Self {
        self.security_context.read_only_root_filesystem = Some(value);
        self
    }

    pub fn run_as_group(&mut self, value: i64) -> &mut Self {
        self.security_context.run_as_group = Some(value);
        self
    }

    pub fn run_as_non_root(&mut self, value: bool) -> &mut Self {
        self.security_context.run_as_non_root = Some(value);
        self
    }

    pub fn run_as_user(&mut self, value: i64) -> &mut Self {
        self.security_context.run_as_user = Some(value);
        self
    }
}

#[derive(Clone, Default)]
pub struct PodSecurityContextBuilder {
    pod_security_context: PodSecurityContext,
}

impl PodSecurityContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(&self) -> PodSecurityContext {
        self.pod_security_context.clone()
    }

    pub fn fs_group(&mut self, group: i64) -> &mut Self {
        self.pod_security_context.fs_group = Some(group);
        self
    }

    pub fn fs_group_change_policy(&mut self, policy: &str) -> &mut Self {
        self.pod_security_context.fs_group_change_policy = Some(policy.to_owned());
        self
    }

    pub fn run_as_group(&mut self, group: i64) -> &mut Self {
        self.pod_security_context.run_as_group = Some(group);
        self
    }

    pub fn run_as_non_root(&mut self) -> &mut Self {
        self.pod_security_context.run_as_non_root = Some(true);
        self
    }

    pub fn run_as_user(&mut self, user: i64) -> &mut Self {
        self.pod_security_context.run_as_user = Some(user);
        self
    }

    pub fn seccomp_profile_type(&mut self, type_: &str) -> &mut Self {
        let profile = self
            .pod_security_context
            .seccomp_profile
            .get_or_insert_with(SeccompProfile::default);
        profile.type_ = type_.to_owned();
        self
    }
}
