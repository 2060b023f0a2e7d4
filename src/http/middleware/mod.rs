//! Middleware applied to every shell route.

pub mod accounting;
pub mod cors;

pub use accounting::request_accounting;
pub use cors::{allow_methods_header, cors_layer, origin_allowed};
