// School domain module

#![allow(clippy::module_inception)]

pub mod school;
pub mod school_request;

pub use school::School;
pub use school_request::SchoolRequest;
