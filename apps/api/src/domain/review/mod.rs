// Review domain module
// A review belongs to at most one school and at most one course

#![allow(clippy::module_inception)]

pub mod review;
pub mod value_objects;

pub use review::Review;
pub use value_objects::{DeliveryMethod, Grade, InvalidChoice, Term};
