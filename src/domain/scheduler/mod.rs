pub mod algorithm;
pub mod algorithm_type;
pub mod gym_mapper;
pub mod gym_policy;
pub mod policy;
pub mod release_mode;
pub mod scheduling_listener;
pub mod static_policy;
