pub mod prelude;

pub mod attachments;
pub mod jobs;
