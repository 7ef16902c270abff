//! Handlers that belong to the service itself rather than to a feature slice.

pub mod health;

pub(crate) use health::health_check;
