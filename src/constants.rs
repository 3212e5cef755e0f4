pub mod jobs {

    pub const DEFAULT_SOURCE: &str = "manual";

    pub const MAX_BATCH_SIZE: usize = 200;
}

pub mod attachments {

    /// 10 MiB.
    pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

    /// Request body ceiling for uploads; leaves room for multipart framing.
    pub const UPLOAD_BODY_LIMIT: usize = MAX_FILE_SIZE + 1024 * 1024;

    pub const ALLOWED_MIME_TYPES: &[&str] = &[
        "application/pdf",
        "application/msword",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ];

    pub const DEFAULT_FILE_TYPE: &str = "resume";
}

pub mod search {

    pub const DEFAULT_RESULTS_WANTED: i32 = 20;

    pub const DEFAULT_DISTANCE: i32 = 50;

    pub const DEFAULT_HOURS_OLD: i32 = 72;

    pub const DEFAULT_FORMAT: &str = "json";

    pub const GATEWAY_METHOD: &str = "search_jobs";
}
