//! Taiwanese administrative regions feature.
//!
//! Serves the city/district code→name directory used by the frontend
//! dropdowns and by the institution search's district resolution.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/cities` | List all cities |
//! | GET | `/api/districts/{city_code}` | List districts of a city |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::RegionDirectory;
