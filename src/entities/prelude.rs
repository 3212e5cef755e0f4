pub use super::attachments::Entity as Attachments;
pub use super::jobs::Entity as Jobs;
