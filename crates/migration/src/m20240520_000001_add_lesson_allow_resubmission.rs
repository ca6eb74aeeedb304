//! Add `allow_resubmission` to `lesson`.
//!
//! Lessons created before this column existed default to rejecting repeat
//! submissions once completed.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Lesson::Table)
                    .add_column(
                        ColumnDef::new(Lesson::AllowResubmission)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Lesson::Table)
                    .drop_column(Lesson::AllowResubmission)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Lesson { Table, AllowResubmission }
