//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod pagination;
pub mod alias;
pub mod validate;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
pub mod tenant_service;
pub mod user_service;
pub mod course_service;
pub mod module_service;
pub mod lesson_service;
pub mod enrollment_service;
pub mod track_service;
pub mod report_service;
pub mod upload_service;
