use crate::domain::{AttachmentId, JobId};
use crate::entities::{attachments, prelude::*};
use crate::models::{AttachmentFile, AttachmentMeta};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, Select,
};
use tracing::debug;

use super::{RepoResult, RepositoryError};

/// Attachment row without the payload column.
#[derive(Debug, FromQueryResult)]
struct AttachmentMetaRow {
    id: String,
    job_id: String,
    file_name: String,
    file_type: String,
    mime_type: String,
    file_size: i64,
    created_at: DateTime<Utc>,
}

impl From<AttachmentMetaRow> for AttachmentMeta {
    fn from(row: AttachmentMetaRow) -> Self {
        Self {
            id: AttachmentId::from(row.id),
            job_id: JobId::from(row.job_id),
            file_name: row.file_name,
            file_type: row.file_type,
            mime_type: row.mime_type,
            file_size: row.file_size,
            created_at: row.created_at,
        }
    }
}

/// Repository for job attachments
pub struct AttachmentRepository {
    conn: DatabaseConnection,
}

impl AttachmentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn metadata_query() -> Select<Attachments> {
        Attachments::find().select_only().columns([
            attachments::Column::Id,
            attachments::Column::JobId,
            attachments::Column::FileName,
            attachments::Column::FileType,
            attachments::Column::MimeType,
            attachments::Column::FileSize,
            attachments::Column::CreatedAt,
        ])
    }

    pub async fn create(&self, file: &AttachmentFile) -> RepoResult<()> {
        let meta = &file.meta;
        let active_model = attachments::ActiveModel {
            id: Set(meta.id.as_str().to_string()),
            job_id: Set(meta.job_id.as_str().to_string()),
            file_name: Set(meta.file_name.clone()),
            file_type: Set(meta.file_type.clone()),
            mime_type: Set(meta.mime_type.clone()),
            data: Set(file.data.clone()),
            file_size: Set(meta.file_size),
            created_at: Set(meta.created_at),
        };

        Attachments::insert(active_model)
            .exec_without_returning(&self.conn)
            .await
            .map_err(RepositoryError::from_write)?;

        debug!(
            attachment_id = %meta.id,
            job_id = %meta.job_id,
            size = meta.file_size,
            "Stored attachment"
        );
        Ok(())
    }

    pub async fn get_meta(&self, id: &AttachmentId) -> RepoResult<AttachmentMeta> {
        Self::metadata_query()
            .filter(attachments::Column::Id.eq(id.as_str()))
            .into_model::<AttachmentMetaRow>()
            .one(&self.conn)
            .await?
            .map(AttachmentMeta::from)
            .ok_or(RepositoryError::NotFound)
    }

    pub async fn get_file(&self, id: &AttachmentId) -> RepoResult<AttachmentFile> {
        let row = Attachments::find_by_id(id.as_str())
            .one(&self.conn)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Ok(AttachmentFile {
            meta: AttachmentMeta {
                id: AttachmentId::from(row.id),
                job_id: JobId::from(row.job_id),
                file_name: row.file_name,
                file_type: row.file_type,
                mime_type: row.mime_type,
                file_size: row.file_size,
                created_at: row.created_at,
            },
            data: row.data,
        })
    }

    /// Newest first.
    pub async fn list_for_job(&self, job_id: &JobId) -> RepoResult<Vec<AttachmentMeta>> {
        let rows = Self::metadata_query()
            .filter(attachments::Column::JobId.eq(job_id.as_str()))
            .order_by_desc(attachments::Column::CreatedAt)
            .into_model::<AttachmentMetaRow>()
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(AttachmentMeta::from).collect())
    }

    pub async fn delete(&self, id: &AttachmentId) -> RepoResult<()> {
        let result = Attachments::delete_by_id(id.as_str())
            .exec(&self.conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
