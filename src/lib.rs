pub mod cli;
pub mod config;
pub mod enricher;
pub mod error;
pub mod geocoder;
pub mod output;
pub mod pacer;
pub mod pipeline;
pub mod reader;
