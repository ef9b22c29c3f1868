//! Divines reservation API: a small axum service storing reservations in MongoDB.

pub mod config;
pub mod controller;
pub mod error;
pub mod helpers;
pub mod models;
pub mod repositories;
