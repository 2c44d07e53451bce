//! Configuration and data model shared by every stage

pub mod config;
pub mod models;
