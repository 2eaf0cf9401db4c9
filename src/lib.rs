pub mod cli;
pub mod config;
pub mod credential;
pub mod error;
pub mod jenkins;
pub mod reconcile;
pub mod validation;
pub mod workspace;
