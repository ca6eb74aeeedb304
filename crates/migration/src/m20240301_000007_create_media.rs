//! Create `media` table.
//!
//! Uploaded file records; `owner_id` points at a course/module/lesson row
//! depending on `category`, so no FK is declared on it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Media::Table)
                    .if_not_exists()
                    .col(uuid(Media::Id).primary_key())
                    .col(uuid(Media::TenantId).not_null())
                    .col(string_len(Media::Category, 64).not_null())
                    .col(uuid(Media::OwnerId).not_null())
                    .col(string_len(Media::FileName, 255).not_null())
                    .col(string_len(Media::MimeType, 128).not_null())
                    .col(big_integer(Media::SizeBytes).not_null())
                    .col(string_len(Media::Storage, 16).not_null())
                    .col(string_len(Media::Path, 512).not_null())
                    .col(timestamp_with_time_zone(Media::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_tenant")
                            .from(Media::Table, Media::TenantId)
                            .to(Tenant::Table, Tenant::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Media::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Media {
    Table, Id, TenantId, Category, OwnerId, FileName, MimeType,
    SizeBytes, Storage, Path, CreatedAt,
}

#[derive(DeriveIden)]
enum Tenant { Table, Id }
