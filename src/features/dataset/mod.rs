//! Dataset lifecycle feature.
//!
//! Owns the cached raw CSV published by the MOHW, the freshness-gated
//! fetch-or-reuse policy, the CSV→store import and the refresh endpoints.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/refresh-data` | Force re-download and re-import |
//! | GET | `/api/data-info` | Dataset freshness report |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::DatasetService;
