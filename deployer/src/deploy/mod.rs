//! Deployment module

pub mod definition;
pub mod fsm;
pub mod orchestrator;
pub mod resolver;
