// Mailer adapters

pub mod http_mailer;
pub mod log_mailer;
pub mod recording_mailer;

pub use http_mailer::HttpMailer;
pub use log_mailer::LogMailer;
pub use recording_mailer::RecordingMailer;
