//! Pagination utilities for service layer
//!
//! Provides a simple `Pagination` struct and helpers to normalize inputs.

/// Pagination parameters. An explicit `offset` wins over the page index.
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub limit: u32,
    /// explicit row offset; overrides `page` when present
    pub offset: Option<u64>,
}

impl Pagination {
    pub fn from_query(page: Option<u32>, limit: Option<u32>, offset: Option<u64>) -> Self {
        let d = Self::default();
        Self {
            page: page.unwrap_or(d.page),
            limit: limit.unwrap_or(d.limit),
            offset,
        }
    }

    /// Clamp to sane defaults and convert to `(skip, take)` for the query
    /// layer. `skip` equals `offset` when provided, else `(page-1)*limit`.
    pub fn normalize(self) -> (u64, u64) {
        let take = self.limit.clamp(1, 100) as u64;
        let skip = match self.offset {
            Some(off) => off,
            None => {
                let page = if self.page == 0 { 1 } else { self.page };
                (page as u64 - 1) * take
            }
        };
        (skip, take)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, limit: 20, offset: None } }
}

#[cfg(test)]
mod tests {
    use super::Pagination;

    #[test]
    fn skip_is_offset_when_provided() {
        let (skip, take) = Pagination { page: 7, limit: 10, offset: Some(3) }.normalize();
        assert_eq!(skip, 3);
        assert_eq!(take, 10);
    }

    #[test]
    fn skip_derives_from_page_without_offset() {
        let (skip, take) = Pagination { page: 4, limit: 25, offset: None }.normalize();
        assert_eq!(skip, 75);
        assert_eq!(take, 25);
    }

    #[test]
    fn normalize_clamps_zero_to_defaults() {
        let (skip, take) = Pagination { page: 0, limit: 0, offset: None }.normalize();
        assert_eq!(skip, 0);
        assert_eq!(take, 1);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let (skip, take) = Pagination { page: 5, limit: 1000, offset: None }.normalize();
        assert_eq!(skip, 400);
        assert_eq!(take, 100);
    }

    #[test]
    fn offset_zero_is_respected() {
        let (skip, _) = Pagination { page: 9, limit: 10, offset: Some(0) }.normalize();
        assert_eq!(skip, 0);
    }

    #[test]
    fn default_values_are_sane() {
        let d = Pagination::default();
        assert_eq!(d.page, 1);
        assert_eq!(d.limit, 20);
        assert!(d.offset.is_none());
    }
}
