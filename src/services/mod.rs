pub mod job_service;
pub use job_service::{JobError, JobService};

pub mod job_service_impl;
pub use job_service_impl::SeaOrmJobService;

pub mod attachment_service;
pub use attachment_service::{AttachmentError, AttachmentService};

pub mod attachment_service_impl;
pub use attachment_service_impl::SeaOrmAttachmentService;

pub mod search;
pub use search::{SearchError, SearchResult, SearchService};
