//! Create `tenant_settings` table.
//!
//! One row per tenant; carries the upload policy map (per-category size and
//! mime-type limits) and the storage backend selection.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TenantSettings::Table)
                    .if_not_exists()
                    .col(uuid(TenantSettings::Id).primary_key())
                    .col(uuid(TenantSettings::TenantId).unique_key().not_null())
                    .col(json_binary(TenantSettings::UploadPolicies).not_null())
                    .col(string_len(TenantSettings::StorageBackend, 16).not_null())
                    .col(timestamp_with_time_zone(TenantSettings::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(TenantSettings::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tenant_settings_tenant")
                            .from(TenantSettings::Table, TenantSettings::TenantId)
                            .to(Tenant::Table, Tenant::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(TenantSettings::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum TenantSettings { Table, Id, TenantId, UploadPolicies, StorageBackend, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Tenant { Table, Id }
