pub mod buffer;
pub mod coordinator;
pub mod submitter;
