//! Portainer HTTP transport

pub mod auth;
pub mod client;
pub mod stacks;
