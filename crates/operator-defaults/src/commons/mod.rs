//! Building blocks shared by all custom resources of the operator.

pub mod image;
pub mod license;
pub mod params;
pub mod resources;
pub mod security;
