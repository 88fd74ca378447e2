//! HTTP handlers for docslide-api.

pub mod ai;
pub mod health;
