pub mod job_search;
