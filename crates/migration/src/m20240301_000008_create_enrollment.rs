//! Create `enrollment` table with FKs to `user` and `course`.
//!
//! Cancelling keeps the row and stamps `cancelled_at`; at most one active
//! enrollment per (user, course) is enforced at the service layer.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Enrollment::Table)
                    .if_not_exists()
                    .col(uuid(Enrollment::Id).primary_key())
                    .col(uuid(Enrollment::TenantId).not_null())
                    .col(uuid(Enrollment::UserId).not_null())
                    .col(uuid(Enrollment::CourseId).not_null())
                    .col(string_len_null(Enrollment::Cohort, 64))
                    .col(string_len(Enrollment::Status, 32).not_null())
                    .col(timestamp_with_time_zone(Enrollment::EnrolledAt).not_null())
                    .col(timestamp_with_time_zone_null(Enrollment::CancelledAt))
                    .col(timestamp_with_time_zone(Enrollment::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Enrollment::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollment_user")
                            .from(Enrollment::Table, Enrollment::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollment_course")
                            .from(Enrollment::Table, Enrollment::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Enrollment::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Enrollment {
    Table, Id, TenantId, UserId, CourseId, Cohort, Status,
    EnrolledAt, CancelledAt, CreatedAt, UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Course { Table, Id }
