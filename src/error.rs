use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse dataset JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing required construction parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Unknown {kind} with id {id}")]
    UnknownEntity { kind: &'static str, id: u32 },

    #[error("{kind} with id {id} is already registered")]
    DuplicateEntity { kind: &'static str, id: u32 },

    #[error("Task {task_id} of workflow {workflow_id} was already released into the system")]
    DuplicateRelease { workflow_id: u32, task_id: u32 },

    #[error("Host {host_id} cannot provision {resource} for VM {vm_id}")]
    ProvisioningFailed { vm_id: u32, host_id: u32, resource: &'static str },

    #[error("No suitable VM for task {task_id} of workflow {workflow_id}")]
    NoSuitableVm { workflow_id: u32, task_id: u32 },

    #[error("Invalid scheduling action: {0}")]
    InvalidAction(String),

    #[error("Inconsistent task state accounting: {0}")]
    TaskStateViolation(String),

    #[error("An observation is already waiting for an action")]
    ObservationPending,

    #[error("No consumed observation is waiting for an action")]
    NoPendingObservation,

    #[error("Decision channel was shut down")]
    ChannelShutdown,

    #[error("Decision bridge failed: {0}")]
    BridgeError(String),

    #[error("Failed to write statistics: {0}")]
    StatisticsError(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
