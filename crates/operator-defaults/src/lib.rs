//! Defaulting and policy-merge engine of the VictoriaMetrics operator.
//!
//! Before an object is reconciled, every field the user left unset is filled from the
//! operator-wide [`config::BaseOperatorConfig`]: images and their tags, ports, resource
//! profiles, sidecars, probes and the Kubernetes platform defaults of the generated workload
//! objects. Values chosen by the user are never overwritten and applying the defaults twice
//! yields the same object.
//!
//! ```
//! use std::sync::Arc;
//!
//! use operator_defaults::{
//!     config::BaseOperatorConfig,
//!     crd::agent::{VMAgent, VMAgentSpec},
//!     defaults::Defaulter,
//! };
//!
//! let config = BaseOperatorConfig::from_yaml_str("containerRegistry: registry.example.com")
//!     .expect("valid configuration");
//! let defaulter = Defaulter::new(Arc::new(config));
//!
//! let mut agent = VMAgent::new("agent", VMAgentSpec::default());
//! defaulter.apply(&mut agent).expect("agents always default");
//!
//! assert_eq!(
//!     agent.spec.common.image.repository.as_deref(),
//!     Some("registry.example.com/victoriametrics/vmagent")
//! );
//! ```

pub mod builder;
pub mod commons;
pub mod config;
pub mod crd;
pub mod defaults;
pub mod dispatch;
pub mod security;
pub mod utils;

// External re-exports
pub use k8s_openapi;
pub use kube;
pub use schemars;
