//! Course Review API Library
//!
//! REST service for reviews of college courses: schools, reviews, requests
//! to add schools, and account registration with email verification.
//! The binary in `main.rs` wires these modules to PostgreSQL.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
