//! Paging and sorting parameters shared by the listing endpoints.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Errors produced while turning raw query parameters into a [`PageRequest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    #[error("page: must be a non-negative integer (got '{0}')")]
    InvalidPage(String),
    #[error("size: must be between 1 and {MAX_PAGE_SIZE} (got '{0}')")]
    InvalidSize(String),
    #[error("sortBy: unknown sort property '{0}'")]
    UnknownSortProperty(String),
    #[error("direction: invalid value '{0}', expected 'ASC' or 'DESC'")]
    InvalidDirection(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = PageRequestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(PageRequestError::InvalidDirection(value.to_string()))
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A property that listings can be ordered by.
///
/// Each key maps to a fixed column so the storage layer never interpolates
/// caller input into SQL.
pub trait SortKey: Copy + Sized {
    /// Key used when the caller does not pass `sortBy`.
    const DEFAULT: Self;

    /// Resolves the wire-level property name.
    fn from_property(property: &str) -> Option<Self>;

    /// Column name in the backing table.
    fn column(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseSort {
    Id,
    Name,
    Category,
    Status,
}

impl SortKey for CourseSort {
    const DEFAULT: Self = Self::Name;

    fn from_property(property: &str) -> Option<Self> {
        match property {
            "id" | "_id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "category" => Some(Self::Category),
            "status" => Some(Self::Status),
            _ => None,
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Category => "category",
            Self::Status => "status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonSort {
    Id,
    Name,
    YoutubeUrl,
}

impl SortKey for LessonSort {
    const DEFAULT: Self = Self::Name;

    fn from_property(property: &str) -> Option<Self> {
        match property {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "youtubeUrl" => Some(Self::YoutubeUrl),
            _ => None,
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::YoutubeUrl => "youtube_url",
        }
    }
}

/// Zero-based page selection with ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest<S> {
    pub page: u32,
    pub size: u32,
    pub sort: S,
    pub direction: SortDirection,
}

impl<S: SortKey> Default for PageRequest<S> {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: S::DEFAULT,
            direction: SortDirection::Asc,
        }
    }
}

impl<S: SortKey> PageRequest<S> {
    /// Builds a request from raw query values, applying defaults for absent ones.
    pub fn parse(
        page: Option<&str>,
        size: Option<&str>,
        sort_by: Option<&str>,
        direction: Option<&str>,
    ) -> Result<Self, PageRequestError> {
        let mut request = Self::default();

        if let Some(raw) = page {
            request.page = raw
                .trim()
                .parse::<u32>()
                .map_err(|_| PageRequestError::InvalidPage(raw.to_string()))?;
        }

        if let Some(raw) = size {
            request.size = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|size| (1..=MAX_PAGE_SIZE).contains(size))
                .ok_or_else(|| PageRequestError::InvalidSize(raw.to_string()))?;
        }

        if let Some(raw) = sort_by {
            request.sort = S::from_property(raw.trim())
                .ok_or_else(|| PageRequestError::UnknownSortProperty(raw.to_string()))?;
        }

        if let Some(raw) = direction {
            request.direction = raw.trim().parse()?;
        }

        Ok(request)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

/// One page of results plus the metadata needed to navigate the rest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: PageMetadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub size: u32,
    pub number: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new<S>(content: Vec<T>, request: &PageRequest<S>, total_elements: u64) -> Self {
        let size = u64::from(request.size.max(1));
        Self {
            content,
            page: PageMetadata {
                size: request.size,
                number: request.page,
                total_elements,
                total_pages: total_elements.div_ceil(size),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_defaults_when_parameters_are_missing() {
        let request = PageRequest::<CourseSort>::parse(None, None, None, None).expect("defaults");
        assert_eq!(request.page, 0);
        assert_eq!(request.size, DEFAULT_PAGE_SIZE);
        assert_eq!(request.sort, CourseSort::Name);
        assert_eq!(request.direction, SortDirection::Asc);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn direction_is_case_insensitive() {
        let request =
            PageRequest::<LessonSort>::parse(Some("2"), Some("5"), Some("youtubeUrl"), Some("desc"))
                .expect("valid");
        assert_eq!(request.direction, SortDirection::Desc);
        assert_eq!(request.sort, LessonSort::YoutubeUrl);
        assert_eq!(request.offset(), 10);
        assert_eq!("Asc".parse::<SortDirection>(), Ok(SortDirection::Asc));
    }

    #[test]
    fn rejects_unknown_direction() {
        let err = PageRequest::<CourseSort>::parse(None, None, Some("name"), Some("INVALID"))
            .unwrap_err();
        assert_eq!(err, PageRequestError::InvalidDirection("INVALID".to_string()));
    }

    #[test]
    fn rejects_out_of_range_numbers_and_unknown_properties() {
        assert!(matches!(
            PageRequest::<CourseSort>::parse(Some("-1"), None, None, None),
            Err(PageRequestError::InvalidPage(_))
        ));
        assert!(matches!(
            PageRequest::<CourseSort>::parse(None, Some("0"), None, None),
            Err(PageRequestError::InvalidSize(_))
        ));
        assert!(matches!(
            PageRequest::<CourseSort>::parse(None, Some("101"), None, None),
            Err(PageRequestError::InvalidSize(_))
        ));
        assert!(matches!(
            PageRequest::<CourseSort>::parse(None, None, Some("name; DROP TABLE courses"), None),
            Err(PageRequestError::UnknownSortProperty(_))
        ));
    }

    #[test]
    fn page_metadata_rounds_total_pages_up() {
        let request = PageRequest::<CourseSort>::default();
        let page = Page::new(vec![1, 2, 3], &request, 33);
        assert_eq!(page.page.total_pages, 4);

        let json = serde_json::to_value(page.map(|n| n * 10)).expect("serialize");
        assert_eq!(json["content"], serde_json::json!([10, 20, 30]));
        assert_eq!(json["page"]["totalElements"], 33);
        assert_eq!(json["page"]["number"], 0);
        assert_eq!(json["page"]["size"], 10);
    }

    #[test]
    fn empty_page_has_zero_pages() {
        let request = PageRequest::<LessonSort>::default();
        let page: Page<u8> = Page::new(Vec::new(), &request, 0);
        assert!(page.is_empty());
        assert_eq!(page.page.total_pages, 0);
    }
}
