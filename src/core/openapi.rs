use utoipa::{Modify, OpenApi};

use crate::features::dataset::{dtos as dataset_dtos, handlers as dataset_handlers};
use crate::features::institutions::{dtos as institutions_dtos, handlers as institutions_handlers};
use crate::features::regions::{dtos as regions_dtos, handlers as regions_handlers};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Regions
        regions_handlers::list_cities,
        regions_handlers::list_districts,
        // Institutions
        institutions_handlers::search_institutions,
        // Dataset
        dataset_handlers::refresh_data,
        dataset_handlers::data_info,
    ),
    components(
        schemas(
            regions_dtos::RegionEntryDto,
            institutions_dtos::InstitutionDto,
            institutions_dtos::SearchResponseDto,
            dataset_dtos::RefreshResponseDto,
            dataset_dtos::DataInfoDto,
        )
    ),
    tags(
        (name = "regions", description = "City and district directory"),
        (name = "institutions", description = "Institution search"),
        (name = "dataset", description = "Dataset refresh and freshness")
    )
)]
pub struct ApiDoc;

pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
