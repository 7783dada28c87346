mod dataset_service;
pub mod fetcher;
pub mod importer;

pub use dataset_service::DatasetService;
pub use fetcher::{DatasetFetcher, HttpSource, RemoteSource};
