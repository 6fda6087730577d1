pub mod channel;
pub mod codec;
pub mod tcp_bridge;
