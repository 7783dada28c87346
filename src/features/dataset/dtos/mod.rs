mod dataset_dto;

pub use dataset_dto::{DataInfoDto, RefreshResponseDto};
