//! Custom resources managed by the operator.
//!
//! Only the parts of the specs which take part in defaulting are modelled here, every other field
//! is kept in the [`ExtraFields`](crate::commons::params::ExtraFields) of the enclosing record.

pub mod agent;
pub mod alert;
pub mod anomaly;
pub mod auth;
pub mod backup;
pub mod cluster;
pub mod distributed;
pub mod scrape;
pub mod single;
