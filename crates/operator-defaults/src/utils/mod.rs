pub mod k8s_version;
pub mod option;
