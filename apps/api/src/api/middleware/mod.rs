// Request extractors shared by the handlers

pub mod payload;

pub use payload::Payload;
