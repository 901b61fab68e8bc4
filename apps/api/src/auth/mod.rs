// Authentication primitives: password hashing and signed tokens

pub mod jwt;
pub mod password;
