//! Filesystem access

pub mod file;
