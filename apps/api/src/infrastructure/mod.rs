// Infrastructure layer module
// Database adapters and external service integrations (mail delivery)
// implementing the domain ports

pub mod mail;
pub mod repositories;
