pub mod context;
pub mod tick_engine;
pub mod tick_listener;
pub mod world;
