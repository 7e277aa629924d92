//! Pagination request and response types. Not persisted.

use serde::{Deserialize, Serialize};

/// Default page number (1-based)
pub const PAGE_DEFAULT_NUMBER: usize = 1;
/// Default page size
pub const PAGE_DEFAULT_SIZE: usize = 10;
/// Default sort column
pub const PAGE_DEFAULT_SORT_BY: &str = SORT_BY_CREATED_AT;
/// Default sort direction
pub const PAGE_DEFAULT_SORT_DIRECTION_DESC: bool = true;

pub const SORT_BY_CREATED_AT: &str = "created_at";
pub const SORT_BY_UPDATED_AT: &str = "updated_at";
pub const SORT_BY_NAME: &str = "name";
pub const SORT_BY_ID: &str = "id";

/// Requested page. Unset fields take the defaults above.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub number: Option<usize>,
    pub size: Option<usize>,
    pub sort_by: Option<String>,
    pub sort_direction_desc: Option<bool>,
}

impl Page {
    pub fn new(number: usize, size: usize, sort_by: &str, sort_direction_desc: bool) -> Self {
        Self {
            number: Some(number),
            size: Some(size),
            sort_by: Some(sort_by.to_string()),
            sort_direction_desc: Some(sort_direction_desc),
        }
    }

    /// Page with the default sorting
    pub fn with_default_sorting(number: usize, size: usize) -> Self {
        Self {
            number: Some(number),
            size: Some(size),
            ..Self::default()
        }
    }

    /// Fill every unset field with its default.
    pub fn with_defaults(self) -> Self {
        Self {
            number: Some(self.number.unwrap_or(PAGE_DEFAULT_NUMBER)),
            size: Some(self.size.unwrap_or(PAGE_DEFAULT_SIZE)),
            sort_by: Some(
                self.sort_by
                    .unwrap_or_else(|| PAGE_DEFAULT_SORT_BY.to_string()),
            ),
            sort_direction_desc: Some(
                self.sort_direction_desc
                    .unwrap_or(PAGE_DEFAULT_SORT_DIRECTION_DESC),
            ),
        }
    }

    pub fn number(&self) -> usize {
        self.number.unwrap_or(PAGE_DEFAULT_NUMBER).max(1)
    }

    pub fn size(&self) -> usize {
        self.size.unwrap_or(PAGE_DEFAULT_SIZE).max(1)
    }

    pub fn sort_by(&self) -> &str {
        self.sort_by.as_deref().unwrap_or(PAGE_DEFAULT_SORT_BY)
    }

    pub fn sort_direction_desc(&self) -> bool {
        self.sort_direction_desc
            .unwrap_or(PAGE_DEFAULT_SORT_DIRECTION_DESC)
    }
}

/// Pagination info returned alongside a page of results
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PageInfo {
    pub page: usize,
    pub size: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub total_count: u64,
}

impl PageInfo {
    pub fn new(page: &Page, total_count: u64) -> Self {
        let number = page.number();
        let size = page.size();
        Self {
            page: number,
            size,
            has_next_page: number.saturating_mul(size)
                < usize::try_from(total_count).unwrap_or(usize::MAX),
            has_previous_page: number > 1,
            total_count,
        }
    }
}

/// A page of items
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
}
