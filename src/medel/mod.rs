pub mod config;
pub mod content;
pub mod generate;
pub mod notify;
pub mod pipeline;
pub mod registry;
pub mod rng;
pub mod store;
