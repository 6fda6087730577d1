pub mod dataset;
pub mod validation;
