pub mod combo;
pub mod engine;
pub mod filter;
pub mod metrics;
pub mod search;
pub mod strategies;
pub mod wheel;
