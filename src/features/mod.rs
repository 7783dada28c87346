pub mod dataset;
pub mod institutions;
pub mod regions;
