//! Portainer stack deployer library
//!
//! Renders a stack definition and creates or updates the matching stack on
//! a Portainer instance.

pub mod app;
pub mod authn;
pub mod deploy;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod portainer;
