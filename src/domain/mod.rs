pub mod admission;
pub mod dataset;
pub mod factory;
pub mod monitoring;
pub mod resource;
pub mod scheduler;
pub mod simulator;
pub mod utils;
