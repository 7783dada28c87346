use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::institutions::dtos::{InstitutionDto, InstitutionQuery, SearchResponseDto};
use crate::features::institutions::services::SearchService;

/// Search institutions by city, district and service type
#[utoipa::path(
    get,
    path = "/api/institutions",
    params(InstitutionQuery),
    responses(
        (status = 200, description = "Matching institutions, capped at 100 rows", body = SearchResponseDto)
    ),
    tag = "institutions"
)]
pub async fn search_institutions(
    State(service): State<Arc<SearchService>>,
    Query(query): Query<InstitutionQuery>,
) -> Result<Json<SearchResponseDto>> {
    let outcome = service
        .search(
            query.city.as_deref(),
            query.district.as_deref(),
            query.service_type.as_deref(),
        )
        .await?;

    let institutions: Vec<InstitutionDto> =
        outcome.institutions.into_iter().map(Into::into).collect();

    Ok(Json(SearchResponseDto {
        total: outcome.total,
        institutions,
    }))
}
