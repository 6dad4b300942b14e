//! Tribune - backend for a topic-subscription article platform
//!
//! This library provides the core functionality for the Tribune platform.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
