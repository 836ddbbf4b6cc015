//! Builders for Kubernetes objects produced by the defaulting engine.

pub mod security;
