//! Create `course_track` table.
//!
//! Per-user progress record for a course; one row per (user, course),
//! uniqueness enforced by an index applied later.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CourseTrack::Table)
                    .if_not_exists()
                    .col(uuid(CourseTrack::Id).primary_key())
                    .col(uuid(CourseTrack::TenantId).not_null())
                    .col(uuid(CourseTrack::UserId).not_null())
                    .col(uuid(CourseTrack::CourseId).not_null())
                    .col(string_len(CourseTrack::Status, 32).not_null())
                    .col(timestamp_with_time_zone_null(CourseTrack::StartedAt))
                    .col(timestamp_with_time_zone_null(CourseTrack::EndedAt))
                    .col(integer(CourseTrack::LessonsTotal).not_null())
                    .col(integer(CourseTrack::LessonsCompleted).not_null())
                    .col(double(CourseTrack::CompletionPercent).not_null())
                    .col(boolean(CourseTrack::CertificateIssued).not_null())
                    .col(timestamp_with_time_zone_null(CourseTrack::CertificateIssuedAt))
                    .col(timestamp_with_time_zone(CourseTrack::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(CourseTrack::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_track_user")
                            .from(CourseTrack::Table, CourseTrack::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_track_course")
                            .from(CourseTrack::Table, CourseTrack::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CourseTrack::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CourseTrack {
    Table, Id, TenantId, UserId, CourseId, Status, StartedAt, EndedAt,
    LessonsTotal, LessonsCompleted, CompletionPercent,
    CertificateIssued, CertificateIssuedAt, CreatedAt, UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Course { Table, Id }
