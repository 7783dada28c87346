//! Institution search feature.
//!
//! `GET /api/institutions?city=&district=&service_type=` — conjunctive
//! filtering over the ingested dataset with fuzzy district matching (see
//! [`services::SearchService`]).

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::SearchService;
