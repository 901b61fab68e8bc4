// Domain layer module exports
// Entities, value objects and the ports (repository and mailer traits)
// implemented by the infrastructure layer

pub mod course;
pub mod notifications;
pub mod repositories;
pub mod review;
pub mod school;
pub mod user;
