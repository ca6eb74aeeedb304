//! Create `lesson_track` table.
//!
//! Per-user progress for a lesson, including test score and attempts; one
//! row per (user, lesson).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LessonTrack::Table)
                    .if_not_exists()
                    .col(uuid(LessonTrack::Id).primary_key())
                    .col(uuid(LessonTrack::TenantId).not_null())
                    .col(uuid(LessonTrack::UserId).not_null())
                    .col(uuid(LessonTrack::CourseId).not_null())
                    .col(uuid(LessonTrack::LessonId).not_null())
                    .col(string_len(LessonTrack::Status, 32).not_null())
                    .col(integer_null(LessonTrack::Score))
                    .col(boolean_null(LessonTrack::Passed))
                    .col(integer(LessonTrack::Attempts).not_null())
                    .col(timestamp_with_time_zone_null(LessonTrack::CompletedAt))
                    .col(timestamp_with_time_zone(LessonTrack::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(LessonTrack::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lesson_track_user")
                            .from(LessonTrack::Table, LessonTrack::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lesson_track_lesson")
                            .from(LessonTrack::Table, LessonTrack::LessonId)
                            .to(Lesson::Table, Lesson::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(LessonTrack::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum LessonTrack {
    Table, Id, TenantId, UserId, CourseId, LessonId, Status, Score,
    Passed, Attempts, CompletedAt, CreatedAt, UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Lesson { Table, Id }
