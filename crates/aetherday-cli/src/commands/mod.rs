pub mod challenge;
pub mod config;
pub mod energy;
pub mod profile;
pub mod sink;
pub mod task;
pub mod token;
