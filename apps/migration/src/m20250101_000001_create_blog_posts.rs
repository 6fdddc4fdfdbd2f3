use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlogPosts::Table)
                    .if_not_exists()
                    .col(uuid(BlogPosts::Id).primary_key())
                    .col(string(BlogPosts::Title))
                    .col(text(BlogPosts::Content))
                    .col(string(BlogPosts::Author))
                    .col(timestamp_with_time_zone(BlogPosts::CreatedAt))
                    .col(timestamp_with_time_zone(BlogPosts::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Backs the newest-first listing.
        manager
            .create_index(
                Index::create()
                    .name("idx_blog_posts_created_at")
                    .table(BlogPosts::Table)
                    .col(BlogPosts::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BlogPosts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BlogPosts {
    Table,
    Id,
    Title,
    Content,
    Author,
    CreatedAt,
    UpdatedAt,
}
