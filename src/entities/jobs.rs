use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub job_title: String,

    pub company_name: String,

    pub location: String,

    #[sea_orm(unique)]
    pub job_url: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub salary: String,

    pub job_type: String,

    pub is_remote: bool,

    pub source: String,

    pub status: String,

    #[sea_orm(column_type = "Text")]
    pub notes: String,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attachments::Entity")]
    Attachments,
}

impl Related<super::attachments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attachments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
