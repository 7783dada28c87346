mod institution_handler;

pub use institution_handler::*;
