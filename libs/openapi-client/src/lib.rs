//! Portainer API wire models
//!
//! Request and response shapes exchanged with the Portainer REST API.

pub mod models;
