//! Blog post entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blog_posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub author: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain BlogPost.
impl From<Model> for blog_core::domain::BlogPost {
    fn from(model: Model) -> Self {
        Self {
            id: model.id.to_string(),
            title: model.title,
            content: model.content,
            author: model.author,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}
