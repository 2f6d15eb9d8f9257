//! Listing SQL builder using SeaQuery.
//!
//! The SELECT and COUNT statements share one WHERE builder so that the page
//! and the total always describe the same filter.

use sea_query::{
    Asterisk, Expr, Iden, Order, PostgresQueryBuilder, Query, SelectStatement, SimpleExpr,
};

use crate::listing::{ListingFilter, ListingSort, SortDirection, SortField, TitleMatch};

/// `listing` table and its columns.
#[derive(Iden, Clone, Copy)]
pub enum ListingTable {
    #[iden = "listing"]
    Table,
    Id,
    Title,
    Size,
    Price,
    Location,
    Description,
    ThumbnailUrl,
    ImagesUrls,
    CreatedAt,
    UpdatedAt,
}

/// Columns selected for a full listing row, in table order.
pub const LISTING_COLUMNS: [ListingTable; 10] = [
    ListingTable::Id,
    ListingTable::Title,
    ListingTable::Size,
    ListingTable::Price,
    ListingTable::Location,
    ListingTable::Description,
    ListingTable::ThumbnailUrl,
    ListingTable::ImagesUrls,
    ListingTable::CreatedAt,
    ListingTable::UpdatedAt,
];

impl From<SortField> for ListingTable {
    fn from(field: SortField) -> Self {
        match field {
            SortField::CreatedAt => ListingTable::CreatedAt,
            SortField::UpdatedAt => ListingTable::UpdatedAt,
            SortField::Title => ListingTable::Title,
            SortField::Size => ListingTable::Size,
            SortField::Price => ListingTable::Price,
            SortField::Location => ListingTable::Location,
        }
    }
}

/// Query builder for listing reads.
pub struct ListingQueryBuilder<'a> {
    filter: &'a ListingFilter,
    sort: &'a ListingSort,
}

impl<'a> ListingQueryBuilder<'a> {
    pub fn new(filter: &'a ListingFilter, sort: &'a ListingSort) -> Self {
        Self { filter, sort }
    }

    /// Build the page SELECT.
    pub fn build(&self, skip: u64, limit: u64) -> String {
        let mut query = Query::select();

        query
            .columns(LISTING_COLUMNS.map(|c| (ListingTable::Table, c)))
            .from(ListingTable::Table);

        self.add_filters(&mut query);

        let order = match self.sort.direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };
        query.order_by(
            (ListingTable::Table, ListingTable::from(self.sort.field)),
            order,
        );

        query.limit(limit);
        query.offset(skip);

        query.to_string(PostgresQueryBuilder)
    }

    /// Build a COUNT over the same filter.
    pub fn build_count(&self) -> String {
        let mut query = Query::select();

        query
            .expr(Expr::col(Asterisk).count())
            .from(ListingTable::Table);

        self.add_filters(&mut query);

        query.to_string(PostgresQueryBuilder)
    }

    fn add_filters(&self, query: &mut SelectStatement) {
        for condition in self.conditions() {
            query.and_where(condition);
        }
    }

    fn conditions(&self) -> Vec<SimpleExpr> {
        let mut conditions = Vec::new();

        match &self.filter.title {
            Some(TitleMatch::Exact(title)) => {
                conditions.push(
                    Expr::col((ListingTable::Table, ListingTable::Title)).eq(title.as_str()),
                );
            }
            Some(TitleMatch::Contains(needle)) => {
                conditions.push(Expr::cust_with_values(
                    r#""listing"."title" ILIKE $1"#,
                    [format!("%{}%", escape_like_wildcards(needle))],
                ));
            }
            None => {}
        }

        if let Some(size) = self.filter.size {
            conditions.push(Expr::col((ListingTable::Table, ListingTable::Size)).eq(size));
        }
        if let Some(price) = self.filter.price {
            conditions.push(Expr::col((ListingTable::Table, ListingTable::Price)).eq(price));
        }

        conditions
    }
}

/// Escape SQL LIKE wildcard characters (`%`, `_`, `\`) in a value.
fn escape_like_wildcards(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
