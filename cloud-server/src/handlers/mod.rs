//! HTTP handlers

pub mod claims;
pub mod dashboard;
pub mod health;
pub mod model;
pub mod predictions;
pub mod reports;
