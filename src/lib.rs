pub mod app;
pub mod cancel;
pub mod config;
pub mod domain;
pub mod error;
pub mod groups;
pub mod output;
pub mod pairing;
pub mod publish;
pub mod resolve;
pub mod scheduler;
pub mod worker;
