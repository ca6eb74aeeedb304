//! Create `lesson` table with FKs to `course` and `module`.
//!
//! `pass_score` is the optional test pass threshold; lessons without it
//! carry no test.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Lesson::Table)
                    .if_not_exists()
                    .col(uuid(Lesson::Id).primary_key())
                    .col(uuid(Lesson::TenantId).not_null())
                    .col(uuid(Lesson::CourseId).not_null())
                    .col(uuid(Lesson::ModuleId).not_null())
                    .col(string_len(Lesson::Title, 255).not_null())
                    .col(string_len(Lesson::Alias, 255).not_null())
                    .col(integer(Lesson::Position).not_null())
                    .col(text_null(Lesson::Content))
                    .col(integer_null(Lesson::PassScore))
                    .col(timestamp_with_time_zone(Lesson::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Lesson::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lesson_course")
                            .from(Lesson::Table, Lesson::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lesson_module")
                            .from(Lesson::Table, Lesson::ModuleId)
                            .to(Module::Table, Module::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Lesson::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Lesson {
    Table, Id, TenantId, CourseId, ModuleId, Title, Alias, Position,
    Content, PassScore, CreatedAt, UpdatedAt,
}

#[derive(DeriveIden)]
enum Course { Table, Id }

#[derive(DeriveIden)]
enum Module { Table, Id }
