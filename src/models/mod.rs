pub mod attachment;
pub mod job;

pub use attachment::{AttachmentFile, AttachmentMeta, FileKind, NewAttachment};
pub use job::{BatchCreateResult, Job, JobCreateInput, JobFilter, JobStatus, JobUpdate};
