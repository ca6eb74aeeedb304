/// CRUD operations tests for the content entities
pub mod crud_tests;

/// Integration tests combining multiple components
pub mod integration_tests {
    use crate::db::connect;
    use crate::{tenant, user, course, module, lesson, enrollment, course_track, lesson_track};
    use sea_orm::EntityTrait;
    use migration::MigratorTrait;
    use anyhow::Result;
    use uuid::Uuid;

    /// Test complete workflow: tenant -> user -> course -> module -> lesson -> enrollment -> tracks
    #[tokio::test]
    async fn test_complete_workflow() -> Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }

        let db = connect().await?;
        migration::Migrator::up(&db, None).await?;

        let tenant_name = format!("workflow_tenant_{}", Uuid::new_v4());
        let test_tenant = tenant::create(&db, &tenant_name).await?;

        let user_email = format!("workflow_{}@example.com", Uuid::new_v4());
        let test_user = user::create(&db, test_tenant.id, &user_email, "Workflow Learner").await?;

        let test_course = course::create(
            &db,
            test_tenant.id,
            "Workflow Course",
            &format!("workflow-course-{}", Uuid::new_v4()),
            Some("end to end".into()),
            None,
            None,
        )
        .await?;

        let test_module = module::create(&db, test_tenant.id, test_course.id, "Week 1", "week-1", 0).await?;
        let test_lesson = lesson::create(
            &db,
            test_tenant.id,
            test_course.id,
            test_module.id,
            "Intro",
            "intro",
            0,
            None,
            Some(60),
        )
        .await?;

        let test_enrollment = enrollment::create(&db, test_tenant.id, test_user.id, test_course.id, Some("spring".into())).await?;
        assert_eq!(test_enrollment.status, enrollment::STATUS_ACTIVE);

        let track = course_track::create_initial(&db, test_tenant.id, test_user.id, test_course.id, 1).await?;
        assert_eq!(track.completion_percent, 0.0);
        assert!(!track.certificate_issued);

        let lt = lesson_track::create_first_attempt(
            &db,
            test_tenant.id,
            test_user.id,
            test_course.id,
            test_lesson.id,
            lesson_track::STATUS_COMPLETED,
            Some(80),
            Some(true),
        )
        .await?;
        assert_eq!(lt.attempts, 1);
        assert!(lt.completed_at.is_some());

        // Verify linkage
        let found_lesson = lesson::Entity::find_by_id(test_lesson.id).one(&db).await?.unwrap();
        assert_eq!(found_lesson.module_id, test_module.id);
        assert_eq!(found_lesson.course_id, test_course.id);
        assert!(!found_lesson.allow_resubmission);

        let found_track = course_track::find_by_user_course(&db, test_user.id, test_course.id).await?;
        assert!(found_track.is_some());

        // Cleanup: deleting the tenant cascades through the whole graph
        tenant::Entity::delete_by_id(test_tenant.id).exec(&db).await?;
        let gone = course::Entity::find_by_id(test_course.id).one(&db).await?;
        assert!(gone.is_none());
        Ok(())
    }

    /// Cancelling an enrollment keeps the row and stamps cancelled_at.
    #[tokio::test]
    async fn test_enrollment_cancel_keeps_history() -> Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }

        let db = connect().await?;
        migration::Migrator::up(&db, None).await?;

        let t = tenant::create(&db, &format!("cancel_tenant_{}", Uuid::new_v4())).await?;
        let u = user::create(&db, t.id, &format!("cancel_{}@example.com", Uuid::new_v4()), "Learner").await?;
        let c = course::create(&db, t.id, "Cancelable", &format!("cancelable-{}", Uuid::new_v4()), None, None, None).await?;

        let e = enrollment::create(&db, t.id, u.id, c.id, None).await?;
        let cancelled = enrollment::cancel(&db, e.id).await?;
        assert_eq!(cancelled.status, enrollment::STATUS_CANCELLED);
        assert!(cancelled.cancelled_at.is_some());

        let still_there = enrollment::Entity::find_by_id(e.id).one(&db).await?;
        assert!(still_there.is_some());

        tenant::Entity::delete_by_id(t.id).exec(&db).await?;
        Ok(())
    }
}
