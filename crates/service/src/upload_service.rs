use std::path::{Path, PathBuf};
use std::str::FromStr;

use uuid::Uuid;
use serde::Deserialize;
use sea_orm::{DatabaseConnection, EntityTrait};
use tracing::{info, warn};

use models::{course, lesson, media, module, tenant_settings};
use crate::errors::ServiceError;

// Fixed messages so clients can match on upload failures.
pub const MSG_TENANT_SETTINGS_MISSING: &str = "tenant configuration missing";
pub const MSG_UPLOAD_POLICY_MISSING: &str = "upload policy not configured for this category";
pub const MSG_UPLOAD_TOO_LARGE: &str = "file exceeds the maximum allowed size";
pub const MSG_UPLOAD_MIME_NOT_ALLOWED: &str = "file mime type is not allowed";

/// Typed upload target; determines the owning table and the policy key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadCategory {
    Course,
    Module,
    Lesson,
    LessonMedia,
    LessonAssociatedMedia,
}

impl UploadCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::Module => "module",
            Self::Lesson => "lesson",
            Self::LessonMedia => "lessonMedia",
            Self::LessonAssociatedMedia => "lessonAssociatedMedia",
        }
    }
}

impl FromStr for UploadCategory {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "course" => Ok(Self::Course),
            "module" => Ok(Self::Module),
            "lesson" => Ok(Self::Lesson),
            "lessonMedia" => Ok(Self::LessonMedia),
            "lessonAssociatedMedia" => Ok(Self::LessonAssociatedMedia),
            other => Err(ServiceError::Validation(format!("unknown upload category: {}", other))),
        }
    }
}

/// Per-category limits as stored in `tenant_settings.upload_policies`.
#[derive(Clone, Debug, Deserialize)]
pub struct UploadPolicy {
    pub max_size_bytes: i64,
    pub allowed_mime_types: Vec<String>,
}

/// Extract the policy for a category from the tenant's settings JSON.
pub fn policy_for(policies: &serde_json::Value, category: UploadCategory) -> Option<UploadPolicy> {
    policies
        .get(category.as_str())
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

/// Enforce the tenant's upload policy. A missing policy is its own failure,
/// distinct from the size and mime checks.
pub fn check_policy(policy: Option<&UploadPolicy>, size_bytes: i64, mime_type: &str) -> Result<(), ServiceError> {
    let Some(policy) = policy else {
        return Err(ServiceError::Validation(MSG_UPLOAD_POLICY_MISSING.into()));
    };
    if size_bytes > policy.max_size_bytes {
        return Err(ServiceError::Validation(MSG_UPLOAD_TOO_LARGE.into()));
    }
    if !policy.allowed_mime_types.iter().any(|m| m == mime_type) {
        return Err(ServiceError::Validation(MSG_UPLOAD_MIME_NOT_ALLOWED.into()));
    }
    Ok(())
}

/// Strip anything but alphanumerics, dots, dashes and underscores so the
/// stored name is safe as a path segment.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() { "file".to_string() } else { trimmed.to_string() }
}

async fn owner_exists(db: &DatabaseConnection, tenant_id: Uuid, category: UploadCategory, owner_id: Uuid) -> Result<bool, ServiceError> {
    use sea_orm::{QueryFilter, ColumnTrait};
    let found = match category {
        UploadCategory::Course => course::Entity::find_by_id(owner_id)
            .filter(course::Column::TenantId.eq(tenant_id))
            .one(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .is_some(),
        UploadCategory::Module => module::Entity::find_by_id(owner_id)
            .filter(module::Column::TenantId.eq(tenant_id))
            .one(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .is_some(),
        UploadCategory::Lesson | UploadCategory::LessonMedia | UploadCategory::LessonAssociatedMedia => {
            lesson::Entity::find_by_id(owner_id)
                .filter(lesson::Column::TenantId.eq(tenant_id))
                .one(db)
                .await
                .map_err(|e| ServiceError::Db(e.to_string()))?
                .is_some()
        }
    };
    Ok(found)
}

/// Store an uploaded file under the tenant's policy and record a media row.
///
/// The backend comes from the tenant settings; only `local` storage is
/// implemented, the `cloud` backend is rejected as not implemented.
#[allow(clippy::too_many_arguments)]
pub async fn store_upload(
    db: &DatabaseConnection,
    uploads_root: &str,
    tenant_id: Uuid,
    category: UploadCategory,
    owner_id: Uuid,
    file_name: &str,
    mime_type: &str,
    bytes: &[u8],
) -> Result<media::Model, ServiceError> {
    let settings = tenant_settings::find_by_tenant(db, tenant_id)
        .await?
        .ok_or_else(|| ServiceError::Validation(MSG_TENANT_SETTINGS_MISSING.into()))?;

    let policy = policy_for(&settings.upload_policies, category);
    check_policy(policy.as_ref(), bytes.len() as i64, mime_type)?;

    if !owner_exists(db, tenant_id, category, owner_id).await? {
        return Err(ServiceError::not_found(category.as_str()));
    }

    if settings.storage_backend == media::STORAGE_CLOUD {
        return Err(ServiceError::NotImplemented("cloud file upload".into()));
    }

    let safe_name = sanitize_file_name(file_name);
    let dir: PathBuf = Path::new(uploads_root)
        .join(tenant_id.to_string())
        .join(category.as_str());
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| ServiceError::Db(format!("create upload dir: {}", e)))?;
    let target = dir.join(format!("{}_{}", Uuid::new_v4(), safe_name));
    tokio::fs::write(&target, bytes)
        .await
        .map_err(|e| ServiceError::Db(format!("write upload: {}", e)))?;

    let stored = media::create(
        db,
        tenant_id,
        category.as_str(),
        owner_id,
        &safe_name,
        mime_type,
        bytes.len() as i64,
        media::STORAGE_LOCAL,
        &target.to_string_lossy(),
    )
    .await?;
    info!(media_id = %stored.id, category = category.as_str(), size = stored.size_bytes, "file stored");
    Ok(stored)
}

/// Delete a media record and its file. Cloud-stored files are not deletable
/// yet and fail loudly rather than silently.
pub async fn delete_upload(db: &DatabaseConnection, tenant_id: Uuid, id: Uuid) -> Result<bool, ServiceError> {
    use sea_orm::{QueryFilter, ColumnTrait};
    let Some(found) = media::Entity::find_by_id(id)
        .filter(media::Column::TenantId.eq(tenant_id))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
    else {
        return Ok(false);
    };

    if found.storage == media::STORAGE_CLOUD {
        return Err(ServiceError::NotImplemented("cloud file deletion".into()));
    }

    if let Err(e) = tokio::fs::remove_file(&found.path).await {
        // Keep the database consistent even when the file is already gone
        warn!(media_id = %found.id, path = %found.path, err = %e, "stored file missing on delete");
    }
    media::hard_delete(db, id).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policies() -> serde_json::Value {
        serde_json::json!({
            "lessonMedia": {
                "max_size_bytes": 1024,
                "allowed_mime_types": ["video/mp4", "image/png"]
            }
        })
    }

    #[test]
    fn category_parse_roundtrip() {
        for name in ["course", "module", "lesson", "lessonMedia", "lessonAssociatedMedia"] {
            let cat: UploadCategory = name.parse().unwrap();
            assert_eq!(cat.as_str(), name);
        }
        assert!("avatar".parse::<UploadCategory>().is_err());
    }

    #[test]
    fn policy_lookup_by_category() {
        let p = policies();
        assert!(policy_for(&p, UploadCategory::LessonMedia).is_some());
        assert!(policy_for(&p, UploadCategory::Course).is_none());
    }

    #[test]
    fn check_policy_enforces_limits() {
        let p = policies();
        let policy = policy_for(&p, UploadCategory::LessonMedia);

        assert!(check_policy(policy.as_ref(), 512, "video/mp4").is_ok());

        let too_big = check_policy(policy.as_ref(), 4096, "video/mp4").unwrap_err();
        assert!(too_big.to_string().contains(MSG_UPLOAD_TOO_LARGE));

        let bad_mime = check_policy(policy.as_ref(), 512, "application/zip").unwrap_err();
        assert!(bad_mime.to_string().contains(MSG_UPLOAD_MIME_NOT_ALLOWED));
    }

    #[test]
    fn missing_policy_is_a_distinct_error() {
        let err = check_policy(None, 1, "image/png").unwrap_err();
        assert!(err.to_string().contains(MSG_UPLOAD_POLICY_MISSING));
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(sanitize_file_name("intro lesson.mp4"), "intro_lesson.mp4");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_file_name("..."), "file");
    }
}
