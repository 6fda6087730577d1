pub mod cloudlet_factory;
pub mod host_factory;
pub mod vm_factory;
