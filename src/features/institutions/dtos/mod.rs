mod institution_dto;

pub use institution_dto::{InstitutionDto, InstitutionQuery, SearchResponseDto};
