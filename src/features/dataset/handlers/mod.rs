mod dataset_handler;

pub use dataset_handler::*;
