//! Create `module` table with FK to `course`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Module::Table)
                    .if_not_exists()
                    .col(uuid(Module::Id).primary_key())
                    .col(uuid(Module::TenantId).not_null())
                    .col(uuid(Module::CourseId).not_null())
                    .col(string_len(Module::Title, 255).not_null())
                    .col(string_len(Module::Alias, 255).not_null())
                    .col(integer(Module::Position).not_null())
                    .col(timestamp_with_time_zone(Module::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Module::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_module_course")
                            .from(Module::Table, Module::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Module::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Module { Table, Id, TenantId, CourseId, Title, Alias, Position, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Course { Table, Id }
