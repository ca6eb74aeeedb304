//! Create `course` table with FK to `tenant`.
//!
//! Alias uniqueness is per tenant and enforced by an index applied later.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Course::Table)
                    .if_not_exists()
                    .col(uuid(Course::Id).primary_key())
                    .col(uuid(Course::TenantId).not_null())
                    .col(string_len(Course::Title, 255).not_null())
                    .col(string_len(Course::Alias, 255).not_null())
                    .col(text_null(Course::Description))
                    .col(string_len(Course::Status, 32).not_null())
                    .col(timestamp_with_time_zone_null(Course::StartDate))
                    .col(timestamp_with_time_zone_null(Course::EndDate))
                    .col(timestamp_with_time_zone(Course::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Course::UpdatedAt).not_null())
                    // Explicitly define nullable deleted_at to avoid conflicting NULL/NOT NULL
                    .col(
                        ColumnDef::new(Course::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_tenant")
                            .from(Course::Table, Course::TenantId)
                            .to(Tenant::Table, Tenant::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Course::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Course {
    Table, Id, TenantId, Title, Alias, Description, Status,
    StartDate, EndDate, CreatedAt, UpdatedAt, DeletedAt,
}

#[derive(DeriveIden)]
enum Tenant { Table, Id }
