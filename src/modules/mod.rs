//! Modules layer - infrastructure components behind the feature services.

pub mod store;
