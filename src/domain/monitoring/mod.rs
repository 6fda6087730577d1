pub mod host_monitor;
