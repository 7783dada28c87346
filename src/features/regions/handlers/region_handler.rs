use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::features::regions::dtos::RegionEntryDto;
use crate::features::regions::services::RegionDirectory;

/// List all known cities
#[utoipa::path(
    get,
    path = "/api/cities",
    responses(
        (status = 200, description = "List of cities", body = Vec<RegionEntryDto>)
    ),
    tag = "regions"
)]
pub async fn list_cities(
    State(directory): State<Arc<RegionDirectory>>,
) -> Json<Vec<RegionEntryDto>> {
    let cities = directory
        .cities()
        .into_iter()
        .map(|(code, name)| RegionEntryDto::new(code, name))
        .collect();
    Json(cities)
}

/// List the districts of a city; unknown cities yield an empty list
#[utoipa::path(
    get,
    path = "/api/districts/{city_code}",
    params(
        ("city_code" = String, Path, description = "City code, e.g. 63000")
    ),
    responses(
        (status = 200, description = "Districts of the city (empty for unknown city)", body = Vec<RegionEntryDto>)
    ),
    tag = "regions"
)]
pub async fn list_districts(
    State(directory): State<Arc<RegionDirectory>>,
    Path(city_code): Path<String>,
) -> Json<Vec<RegionEntryDto>> {
    let districts = directory
        .districts(&city_code)
        .into_iter()
        .map(|(code, name)| RegionEntryDto::new(code, name))
        .collect();
    Json(districts)
}
