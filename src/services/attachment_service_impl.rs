use crate::db::{RepositoryError, Store};
use crate::domain::{AttachmentId, JobId};
use crate::models::{AttachmentFile, AttachmentMeta, NewAttachment};
use crate::services::attachment_service::{AttachmentError, AttachmentService, validate_upload};
use chrono::Utc;
use tracing::info;

pub struct SeaOrmAttachmentService {
    store: Store,
}

impl SeaOrmAttachmentService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl AttachmentService for SeaOrmAttachmentService {
    async fn create_attachment(
        &self,
        upload: NewAttachment,
    ) -> Result<AttachmentMeta, AttachmentError> {
        let mime_type = validate_upload(&upload)?;

        match self.store.get_job(&upload.job_id).await {
            Ok(_) => {}
            Err(RepositoryError::NotFound) => {
                return Err(AttachmentError::JobNotFound(upload.job_id));
            }
            Err(e) => return Err(AttachmentError::Database(e.to_string())),
        }

        let file_size = i64::try_from(upload.data.len())
            .map_err(|_| AttachmentError::InvalidInput("file too large".to_string()))?;

        let file = AttachmentFile {
            meta: AttachmentMeta {
                id: AttachmentId::generate(),
                job_id: upload.job_id,
                file_name: upload.file_name,
                file_type: upload.file_type,
                mime_type,
                file_size,
                created_at: Utc::now(),
            },
            data: upload.data,
        };

        self.store
            .create_attachment(&file)
            .await
            .map_err(|e| AttachmentError::Database(e.to_string()))?;

        info!(
            attachment_id = %file.meta.id,
            job_id = %file.meta.job_id,
            file_type = %file.meta.file_type,
            size = file.meta.file_size,
            "Attachment uploaded"
        );
        Ok(file.meta)
    }

    async fn get_attachment(&self, id: &AttachmentId) -> Result<AttachmentMeta, AttachmentError> {
        self.store
            .get_attachment(id)
            .await
            .map_err(|e| AttachmentError::from_repo(e, id))
    }

    async fn list_attachments(
        &self,
        job_id: &JobId,
    ) -> Result<Vec<AttachmentMeta>, AttachmentError> {
        self.store
            .list_attachments_for_job(job_id)
            .await
            .map_err(|e| AttachmentError::Database(e.to_string()))
    }

    async fn download_attachment(
        &self,
        id: &AttachmentId,
    ) -> Result<AttachmentFile, AttachmentError> {
        self.store
            .get_attachment_file(id)
            .await
            .map_err(|e| AttachmentError::from_repo(e, id))
    }

    async fn delete_attachment(&self, id: &AttachmentId) -> Result<(), AttachmentError> {
        self.store
            .delete_attachment(id)
            .await
            .map_err(|e| AttachmentError::from_repo(e, id))?;

        info!(attachment_id = %id, "Attachment deleted");
        Ok(())
    }
}
