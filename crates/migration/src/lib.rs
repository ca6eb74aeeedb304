//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied after the initial tables; later schema changes follow.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_tenant;
mod m20240301_000002_create_user;
mod m20240301_000003_create_tenant_settings;
mod m20240301_000004_create_course;
mod m20240301_000005_create_module;
mod m20240301_000006_create_lesson;
mod m20240301_000007_create_media;
mod m20240301_000008_create_enrollment;
mod m20240301_000009_create_course_track;
mod m20240301_000010_create_lesson_track;
mod m20240301_000011_add_indexes;
mod m20240520_000001_add_lesson_allow_resubmission;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_tenant::Migration),
            Box::new(m20240301_000002_create_user::Migration),
            Box::new(m20240301_000003_create_tenant_settings::Migration),
            Box::new(m20240301_000004_create_course::Migration),
            Box::new(m20240301_000005_create_module::Migration),
            Box::new(m20240301_000006_create_lesson::Migration),
            Box::new(m20240301_000007_create_media::Migration),
            Box::new(m20240301_000008_create_enrollment::Migration),
            Box::new(m20240301_000009_create_course_track::Migration),
            Box::new(m20240301_000010_create_lesson_track::Migration),
            // Indexes for the initial schema are applied last
            Box::new(m20240301_000011_add_indexes::Migration),
            Box::new(m20240520_000001_add_lesson_allow_resubmission::Migration),
        ]
    }
}
