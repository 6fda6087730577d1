pub mod dataset_dto;
pub mod policy_dto;
pub mod solution_dto;
