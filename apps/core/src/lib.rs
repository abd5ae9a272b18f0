pub mod action_executor;
pub mod adapter;
pub mod config;
pub mod contract;
pub mod error;
pub mod ingest;
pub mod locator;
pub mod logging;
pub mod model;
pub mod profiles;
pub mod ranking;
pub mod runtime;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod transport;
