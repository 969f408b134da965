// Library for the binary and the integration tests

pub mod archiver;
pub mod aws;
pub mod cli;
pub mod config;
pub mod encoder;
pub mod error;
pub mod fetcher;
pub mod handler;
pub mod key;
pub mod models;
pub mod orchestrator;
pub mod ports;
pub mod request;
pub mod version;
pub mod window;
