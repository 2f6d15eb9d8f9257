//! Listing query construction.
//!
//! Turns the raw list parameters of one request into a filter, a single-field
//! sort and a page window, and computes the pagination metadata returned with
//! the results. Stores translate [`ListingFilter`] and [`ListingSort`] into
//! their own query language; nothing here knows about SQL.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::{IntoParams, ToSchema};

use super::validate::ValidationErrors;
use crate::models::Listing;

/// Page used when `page` is absent or unparseable.
pub const DEFAULT_PAGE: u32 = 1;

/// Raw list parameters as they arrive in the query string.
///
/// Everything is kept as text so that coercion rules live in one place
/// ([`ListingQuery::from_params`]) instead of in the extractor.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Page number, 1-indexed (default 1).
    pub page: Option<String>,
    /// Page size (default 10).
    pub limit: Option<String>,
    /// Exact title match.
    pub title: Option<String>,
    /// Exact size match.
    pub size: Option<String>,
    /// Exact price match.
    pub price: Option<String>,
    /// Sort field: createdAt, updatedAt, title, size, price or location.
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    /// Sort direction: asc or desc (default desc).
    pub sort: Option<String>,
    /// Case-insensitive title substring; overrides `title`.
    pub search: Option<String>,
}

/// Page-size policy taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// Used when `limit` is absent or unparseable.
    pub default_limit: u32,
    /// Larger requested limits are capped to this.
    pub max_limit: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

/// How the title is matched.
#[derive(Debug, Clone, PartialEq)]
pub enum TitleMatch {
    /// Whole-value equality.
    Exact(String),
    /// Case-insensitive literal substring.
    Contains(String),
}

impl TitleMatch {
    pub fn matches(&self, title: &str) -> bool {
        match self {
            TitleMatch::Exact(expected) => title == expected,
            TitleMatch::Contains(needle) => title.to_lowercase().contains(&needle.to_lowercase()),
        }
    }
}

/// Conjunction of the optional listing filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub title: Option<TitleMatch>,
    /// Exact equality, not a range.
    pub size: Option<f64>,
    /// Exact equality, not a range.
    pub price: Option<f64>,
}

impl ListingFilter {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.size.is_none() && self.price.is_none()
    }

    /// Evaluate the filter against one record.
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(title) = &self.title
            && !title.matches(&listing.title)
        {
            return false;
        }
        if let Some(size) = self.size
            && listing.size != size
        {
            return false;
        }
        if let Some(price) = self.price
            && listing.price != price
        {
            return false;
        }
        true
    }
}

/// Sortable listing attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
    Size,
    Price,
    Location,
}

impl SortField {
    /// Name used in the `sortBy` parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::Title => "title",
            SortField::Size => "size",
            SortField::Price => "price",
            SortField::Location => "location",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" | "created_at" => Ok(SortField::CreatedAt),
            "updatedAt" | "updated_at" => Ok(SortField::UpdatedAt),
            "title" => Ok(SortField::Title),
            "size" => Ok(SortField::Size),
            "price" => Ok(SortField::Price),
            "location" => Ok(SortField::Location),
            other => Err(format!(
                "\"sortBy\" must be one of [createdAt, updatedAt, title, size, price, location], got \"{other}\""
            )),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Absent means descending; `desc` in any case is descending; any other
    /// value sorts ascending.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => SortDirection::Desc,
            Some(v) if v.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            Some(_) => SortDirection::Asc,
        }
    }
}

/// Single-field sort. There is no tie-break field: rows with equal keys come
/// back in whatever order the store produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListingSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl ListingSort {
    /// Compare two records under this sort.
    pub fn compare(&self, a: &Listing, b: &Listing) -> Ordering {
        let ordering = match self.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Title => a.title.cmp(&b.title),
            SortField::Size => a.size.total_cmp(&b.size),
            SortField::Price => a.price.total_cmp(&b.price),
            SortField::Location => a.location.cmp(&b.location),
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Offset pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-indexed page number, at least 1.
    pub page: u32,
    /// Page size, at least 1.
    pub limit: u32,
}

impl PageRequest {
    /// Number of matching rows to skip: `(page - 1) * limit`.
    pub fn skip(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Fully resolved list request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub filter: ListingFilter,
    pub sort: ListingSort,
    pub page: PageRequest,
}

impl ListingQuery {
    /// Coerce raw parameters into a query.
    ///
    /// Unparseable `page`/`limit` fall back to their defaults; parseable
    /// values below 1 are rejected. When `search` is non-empty it replaces
    /// any exact `title` filter.
    pub fn from_params(params: &ListParams, limits: &PageLimits) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let page = coerce_positive(params.page.as_deref(), "page", DEFAULT_PAGE, &mut errors);
        let mut limit = coerce_positive(
            params.limit.as_deref(),
            "limit",
            limits.default_limit,
            &mut errors,
        );
        if limit > limits.max_limit {
            warn!(
                requested = limit,
                capped = limits.max_limit,
                "limit exceeds maximum, capping"
            );
            limit = limits.max_limit;
        }

        let mut filter = ListingFilter::default();
        if let Some(title) = non_empty(params.title.as_deref()) {
            filter.title = Some(TitleMatch::Exact(title.to_string()));
        }
        filter.size = parse_number(params.size.as_deref(), "size", &mut errors);
        filter.price = parse_number(params.price.as_deref(), "price", &mut errors);
        // Applied after the exact title so it always wins.
        if let Some(search) = non_empty(params.search.as_deref()) {
            filter.title = Some(TitleMatch::Contains(search.to_string()));
        }

        let field = match non_empty(params.sort_by.as_deref()) {
            None => SortField::default(),
            Some(raw) => raw.parse().unwrap_or_else(|message: String| {
                errors.push("sortBy", message);
                SortField::default()
            }),
        };
        let sort = ListingSort {
            field,
            direction: SortDirection::from_param(params.sort.as_deref()),
        };

        errors.into_result(Self {
            filter,
            sort,
            page: PageRequest { page, limit },
        })
    }
}

/// Pagination metadata returned next to a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Compute metadata for `request` given the total match count.
    pub fn new(request: PageRequest, total: u64) -> Self {
        let total_pages = total.div_ceil(u64::from(request.limit.max(1)));
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages,
            has_next: u64::from(request.page) < total_pages,
            has_prev: request.page > 1,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn coerce_positive(
    raw: Option<&str>,
    field: &str,
    default: u32,
    errors: &mut ValidationErrors,
) -> u32 {
    let Some(parsed) = non_empty(raw).and_then(|v| v.parse::<i64>().ok()) else {
        return default;
    };
    if parsed < 1 {
        errors.push(field, format!("\"{field}\" must be greater than or equal to 1"));
        return default;
    }
    u32::try_from(parsed).unwrap_or_else(|_| {
        errors.push(field, format!("\"{field}\" is too large"));
        default
    })
}

fn parse_number(raw: Option<&str>, field: &str, errors: &mut ValidationErrors) -> Option<f64> {
    let value = non_empty(raw)?;
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n),
        _ => {
            errors.push(field, format!("\"{field}\" must be a number"));
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn params() -> ListParams {
        ListParams::default()
    }

    fn resolve(params: &ListParams) -> ListingQuery {
        ListingQuery::from_params(params, &PageLimits::default()).unwrap()
    }

    #[test]
    fn defaults() {
        let query = resolve(&params());
        assert_eq!(query.page, PageRequest { page: 1, limit: 10 });
        assert_eq!(query.sort.field, SortField::CreatedAt);
        assert_eq!(query.sort.direction, SortDirection::Desc);
        assert!(query.filter.is_empty());
    }

    #[test]
    fn unparseable_page_and_limit_use_defaults() {
        let query = resolve(&ListParams {
            page: Some("abc".to_string()),
            limit: Some("ten".to_string()),
            ..params()
        });
        assert_eq!(query.page, PageRequest { page: 1, limit: 10 });
    }

    #[test]
    fn zero_limit_rejected() {
        let err = ListingQuery::from_params(
            &ListParams {
                limit: Some("0".to_string()),
                ..params()
            },
            &PageLimits::default(),
        )
        .unwrap_err();
        assert!(err.has_field("limit"));
    }

    #[test]
    fn negative_page_rejected() {
        let err = ListingQuery::from_params(
            &ListParams {
                page: Some("-2".to_string()),
                ..params()
            },
            &PageLimits::default(),
        )
        .unwrap_err();
        assert!(err.has_field("page"));
    }

    #[test]
    fn limit_capped_to_maximum() {
        let limits = PageLimits {
            default_limit: 10,
            max_limit: 50,
        };
        let query = ListingQuery::from_params(
            &ListParams {
                limit: Some("500".to_string()),
                ..params()
            },
            &limits,
        )
        .unwrap();
        assert_eq!(query.page.limit, 50);
    }

    #[test]
    fn skip_is_offset_arithmetic() {
        for page in 1..=5u32 {
            for limit in [1u32, 7, 10, 25] {
                let request = PageRequest { page, limit };
                assert_eq!(request.skip(), u64::from((page - 1) * limit));
            }
        }
    }

    #[test]
    fn search_overrides_exact_title() {
        let query = resolve(&ListParams {
            title: Some("Exact Title".to_string()),
            search: Some("villa".to_string()),
            ..params()
        });
        assert_eq!(
            query.filter.title,
            Some(TitleMatch::Contains("villa".to_string()))
        );
    }

    #[test]
    fn empty_search_keeps_exact_title() {
        let query = resolve(&ListParams {
            title: Some("Exact Title".to_string()),
            search: Some(String::new()),
            ..params()
        });
        assert_eq!(
            query.filter.title,
            Some(TitleMatch::Exact("Exact Title".to_string()))
        );
    }

    #[test]
    fn size_and_price_are_exact_numbers() {
        let query = resolve(&ListParams {
            size: Some("80".to_string()),
            price: Some("1500.5".to_string()),
            ..params()
        });
        assert_eq!(query.filter.size, Some(80.0));
        assert_eq!(query.filter.price, Some(1500.5));
    }

    #[test]
    fn non_numeric_size_rejected() {
        let err = ListingQuery::from_params(
            &ListParams {
                size: Some("large".to_string()),
                ..params()
            },
            &PageLimits::default(),
        )
        .unwrap_err();
        assert!(err.has_field("size"));
    }

    #[test]
    fn unknown_sort_field_rejected() {
        let err = ListingQuery::from_params(
            &ListParams {
                sort_by: Some("password".to_string()),
                ..params()
            },
            &PageLimits::default(),
        )
        .unwrap_err();
        assert!(err.has_field("sortBy"));
    }

    #[test]
    fn sort_direction_parsing() {
        assert_eq!(SortDirection::from_param(None), SortDirection::Desc);
        assert_eq!(SortDirection::from_param(Some("DESC")), SortDirection::Desc);
        assert_eq!(SortDirection::from_param(Some("asc")), SortDirection::Asc);
        assert_eq!(SortDirection::from_param(Some("up")), SortDirection::Asc);
    }

    #[test]
    fn title_contains_is_case_insensitive() {
        let m = TitleMatch::Contains("VIL".to_string());
        assert!(m.matches("Seaside villa"));
        assert!(!m.matches("Loft"));
        assert!(!TitleMatch::Exact("villa".to_string()).matches("Villa"));
    }

    #[test]
    fn pagination_last_page_of_twenty_five() {
        let meta = Pagination::new(PageRequest { page: 3, limit: 10 }, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(!meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn pagination_first_page() {
        let meta = Pagination::new(PageRequest { page: 1, limit: 10 }, 25);
        assert!(meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn pagination_empty_result() {
        let meta = Pagination::new(PageRequest { page: 1, limit: 10 }, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn pagination_page_beyond_end() {
        let meta = Pagination::new(PageRequest { page: 9, limit: 10 }, 25);
        assert!(!meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn total_pages_is_ceiling() {
        let cases = [(0u64, 10u32, 0u64), (1, 10, 1), (10, 10, 1), (11, 10, 2), (7, 3, 3)];
        for (total, limit, expected) in cases {
            let meta = Pagination::new(PageRequest { page: 1, limit }, total);
            assert_eq!(meta.total_pages, expected, "total={total} limit={limit}");
        }
    }

    #[test]
    fn pagination_serializes_camel_case() {
        let meta = Pagination::new(PageRequest { page: 2, limit: 10 }, 25);
        let json = serde_json::to_value(meta).unwrap();
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["hasNext"], true);
        assert_eq!(json["hasPrev"], true);
    }
}
