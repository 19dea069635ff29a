//! Library exports for the continent search service
//!
//! This module exposes internal components for testing and potential library usage.

pub mod config;
pub mod countries;
pub mod database;
pub mod error;
pub mod handler;
pub mod model;
pub mod route;
pub mod sampling;
pub mod search;
pub mod weather;
