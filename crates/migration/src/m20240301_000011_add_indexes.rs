use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Users: index on tenant_id
        manager
            .create_index(
                Index::create()
                    .name("idx_user_tenant")
                    .table(User::Table)
                    .col(User::TenantId)
                    .to_owned(),
            )
            .await?;

        // Course: index on tenant_id, composite unique (tenant_id, alias)
        manager
            .create_index(
                Index::create()
                    .name("idx_course_tenant")
                    .table(Course::Table)
                    .col(Course::TenantId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("uniq_course_tenant_alias")
                    .table(Course::Table)
                    .col(Course::TenantId)
                    .col(Course::Alias)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Module/Lesson: ordering lookups by parent
        manager
            .create_index(
                Index::create()
                    .name("idx_module_course")
                    .table(Module::Table)
                    .col(Module::CourseId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_lesson_module")
                    .table(Lesson::Table)
                    .col(Lesson::ModuleId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_lesson_course")
                    .table(Lesson::Table)
                    .col(Lesson::CourseId)
                    .to_owned(),
            )
            .await?;

        // Media: lookup by owning entity
        manager
            .create_index(
                Index::create()
                    .name("idx_media_owner")
                    .table(Media::Table)
                    .col(Media::Category)
                    .col(Media::OwnerId)
                    .to_owned(),
            )
            .await?;

        // Enrollment: filters used by listing and reports
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollment_user")
                    .table(Enrollment::Table)
                    .col(Enrollment::UserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollment_course")
                    .table(Enrollment::Table)
                    .col(Enrollment::CourseId)
                    .to_owned(),
            )
            .await?;

        // Tracks: one row per (user, course) / (user, lesson)
        manager
            .create_index(
                Index::create()
                    .name("uniq_course_track_user_course")
                    .table(CourseTrack::Table)
                    .col(CourseTrack::UserId)
                    .col(CourseTrack::CourseId)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("uniq_lesson_track_user_lesson")
                    .table(LessonTrack::Table)
                    .col(LessonTrack::UserId)
                    .col(LessonTrack::LessonId)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_lesson_track_course")
                    .table(LessonTrack::Table)
                    .col(LessonTrack::CourseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table) in [
            ("idx_user_tenant", User::Table.into_iden()),
            ("idx_course_tenant", Course::Table.into_iden()),
            ("uniq_course_tenant_alias", Course::Table.into_iden()),
            ("idx_module_course", Module::Table.into_iden()),
            ("idx_lesson_module", Lesson::Table.into_iden()),
            ("idx_lesson_course", Lesson::Table.into_iden()),
            ("idx_media_owner", Media::Table.into_iden()),
            ("idx_enrollment_user", Enrollment::Table.into_iden()),
            ("idx_enrollment_course", Enrollment::Table.into_iden()),
            ("uniq_course_track_user_course", CourseTrack::Table.into_iden()),
            ("uniq_lesson_track_user_lesson", LessonTrack::Table.into_iden()),
            ("idx_lesson_track_course", LessonTrack::Table.into_iden()),
        ] {
            manager
                .drop_index(Index::drop().name(name).table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum User { Table, TenantId }

#[derive(DeriveIden)]
enum Course { Table, TenantId, Alias }

#[derive(DeriveIden)]
enum Module { Table, CourseId }

#[derive(DeriveIden)]
enum Lesson { Table, ModuleId, CourseId }

#[derive(DeriveIden)]
enum Media { Table, Category, OwnerId }

#[derive(DeriveIden)]
enum Enrollment { Table, UserId, CourseId }

#[derive(DeriveIden)]
enum CourseTrack { Table, UserId, CourseId }

#[derive(DeriveIden)]
enum LessonTrack { Table, UserId, LessonId, CourseId }
