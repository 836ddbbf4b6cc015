/// Command line flags (also readable from the environment) overriding the global switches of the
/// [`BaseOperatorConfig`](super::BaseOperatorConfig).
///
/// ```rust
/// use clap::Parser;
/// use operator_defaults::config::OperatorConfigOptions;
///
/// #[derive(Parser)]
/// struct Run {
///     #[command(flatten)]
///     defaults: OperatorConfigOptions,
/// }
///
/// let run = Run::parse_from(["vm-operator", "--container-registry", "registry.example.com"]);
/// assert_eq!(run.defaults.container_registry.as_deref(), Some("registry.example.com"));
/// ```
#[derive(clap::Args, Clone, Debug, Default, PartialEq, Eq)]
#[command(next_help_heading = "Defaulting Options")]
pub struct OperatorConfigOptions {
    /// Container registry prepended to every image which doesn't name a registry itself.
    #[arg(long, env = "VM_CONTAINER_REGISTRY")]
    pub container_registry: Option<String>,

    /// Enable the strict security posture for all applications which don't decide themselves.
    #[arg(long, env = "VM_ENABLE_STRICT_SECURITY")]
    pub enable_strict_security: Option<bool>,

    /// Don't create scrape objects for the managed applications themselves.
    #[arg(long, env = "VM_DISABLE_SELF_SERVICE_SCRAPE_CREATION")]
    pub disable_self_service_scrape_creation: Option<bool>,

    /// Apply the default resource profiles to containers without explicit resources.
    #[arg(long, env = "VM_USE_DEFAULT_RESOURCES")]
    pub use_default_resources: Option<bool>,

    /// Kubernetes cluster domain, e.g. `cluster.local`.
    #[arg(long, env = "VM_CLUSTER_DOMAIN_NAME")]
    pub cluster_domain_name: Option<String>,

    /// Discover scrape targets through EndpointSlices.
    #[arg(long, env = "VM_ENFORCE_ENDPOINT_SLICES")]
    pub enforce_endpoint_slices: Option<bool>,
}
