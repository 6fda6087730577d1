pub mod cloudlet;
pub mod cloudlet_registry;
pub mod cloudlet_scheduler;
pub mod host;
pub mod host_registry;
pub mod power_model;
pub mod provisioner;
pub mod registry;
pub mod task_state;
pub mod vm;
pub mod vm_registry;
