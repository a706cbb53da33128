pub mod ads;
pub mod config;
pub mod credentials;
pub mod executor;
pub mod model;
pub mod retry;
pub mod server;
pub mod services;
