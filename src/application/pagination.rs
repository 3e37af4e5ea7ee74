//! Offset pagination shared by every list and search operation.

use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Largest `offset + limit` the search engine serves (`index.max_result_window`).
pub const MAX_RESULT_WINDOW: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("page size must be greater than zero")]
    ZeroLimit,
    #[error("requested page reaches past the first {max} results")]
    WindowTooLarge { max: u64 },
}

/// Result window expressed as `limit` documents starting at `offset`.
///
/// `limit` is always positive; the constructor is the only way to build one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaginationParams {
    limit: u32,
    offset: u64,
}

impl PaginationParams {
    pub fn new(limit: u32, offset: u64) -> Result<Self, PaginationError> {
        if limit == 0 {
            return Err(PaginationError::ZeroLimit);
        }
        Ok(Self { limit, offset })
    }

    /// Translate 1-based page coordinates into a window.
    ///
    /// A missing or non-positive `page_size` falls back to [`DEFAULT_PAGE_SIZE`]; a missing
    /// or non-positive `page_number` selects the first page. Windows ending past
    /// [`MAX_RESULT_WINDOW`] are rejected.
    pub fn from_page(
        page_size: Option<i64>,
        page_number: Option<i64>,
    ) -> Result<Self, PaginationError> {
        let limit = page_size
            .filter(|size| *size > 0)
            .map(|size| u32::try_from(size).unwrap_or(u32::MAX))
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let offset = match page_number {
            Some(number) if number > 1 => {
                let preceding = u64::try_from(number - 1).unwrap_or(u64::MAX);
                preceding.saturating_mul(u64::from(limit))
            }
            _ => 0,
        };

        if offset.saturating_add(u64::from(limit)) > MAX_RESULT_WINDOW {
            return Err(PaginationError::WindowTooLarge {
                max: MAX_RESULT_WINDOW,
            });
        }

        Ok(Self { limit, offset })
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// The window immediately after this one.
    pub fn next_page(&self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset.saturating_add(u64::from(self.limit)),
        }
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_limit_is_rejected() {
        assert_eq!(
            PaginationParams::new(0, 10),
            Err(PaginationError::ZeroLimit)
        );
        assert!(PaginationParams::new(1, 0).is_ok());
    }

    #[test]
    fn defaults_to_first_page_of_twelve() {
        let params = PaginationParams::from_page(None, None).expect("first page");
        assert_eq!(params.limit(), 12);
        assert_eq!(params.offset(), 0);
        assert_eq!(params, PaginationParams::default());
    }

    #[test]
    fn page_number_scales_offset() {
        let params = PaginationParams::from_page(Some(8), Some(4)).expect("fourth page");
        assert_eq!(params.limit(), 8);
        assert_eq!(params.offset(), 24);
    }

    #[test]
    fn non_positive_values_fall_back() {
        let params = PaginationParams::from_page(Some(0), Some(-3)).expect("fallback page");
        assert_eq!(params.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(params.offset(), 0);

        let params = PaginationParams::from_page(Some(-5), Some(1)).expect("fallback page");
        assert_eq!(params.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn windows_past_engine_limit_are_rejected() {
        let too_large = Err(PaginationError::WindowTooLarge {
            max: MAX_RESULT_WINDOW,
        });
        assert_eq!(
            PaginationParams::from_page(Some(i64::MAX), Some(i64::MAX)),
            too_large
        );
        assert_eq!(PaginationParams::from_page(Some(10_001), None), too_large);
        assert_eq!(PaginationParams::from_page(Some(100), Some(101)), too_large);

        let last = PaginationParams::from_page(Some(100), Some(100)).expect("last full window");
        assert_eq!(last.offset(), 9_900);
    }

    #[test]
    fn next_page_advances_by_limit() {
        let first = PaginationParams::new(5, 0).expect("valid window");
        let second = first.next_page();
        assert_eq!(second.offset(), 5);
        assert_eq!(second.limit(), 5);
    }
}
