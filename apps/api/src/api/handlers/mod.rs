// HTTP handlers, one module per resource

pub mod auth;
pub mod health;
pub mod reviews;
pub mod school_requests;
pub mod schools;
