use serde::Deserialize;
use utoipa::ToSchema;

/// Normalized paging values. axum's query deserializer cannot see through
/// `#[serde(flatten)]` (values arrive as strings), so the query structs carry
/// `page`/`per_page` inline and build this on demand.
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortBy {
    CreatedAt,
    Price,
    Name,
}

/// Stock buckets from the dashboard filter; "low" means below 10 units but
/// not sold out.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StockFilter {
    All,
    Available,
    Low,
    Out,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Matches against name and product code.
    pub q: Option<String>,
    pub color: Option<String>,
    pub stock: Option<StockFilter>,
    pub sort_by: Option<ProductSortBy>,
    pub sort_order: Option<SortOrder>,
}

impl ProductQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LogListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub action: Option<String>,
}

impl LogListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::Uri;

    #[test]
    fn pagination_clamps_and_offsets() {
        let p = Pagination {
            page: Some(0),
            per_page: Some(1000),
        };
        assert_eq!(p.normalize(), (1, 100, 0));

        let p = Pagination {
            page: Some(3),
            per_page: Some(10),
        };
        assert_eq!(p.normalize(), (3, 10, 20));

        let p = Pagination {
            page: None,
            per_page: None,
        };
        assert_eq!(p.normalize(), (1, 20, 0));
    }

    #[test]
    fn queries_deserialize_from_request_uris() {
        let uri: Uri = "/api/products?page=2&per_page=10&q=gamis&stock=low&sort_by=price&sort_order=asc"
            .parse()
            .unwrap();
        let Query(query) = Query::<ProductQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(query.pagination().normalize(), (2, 10, 10));
        assert_eq!(query.q.as_deref(), Some("gamis"));
        assert!(matches!(query.stock, Some(StockFilter::Low)));
        assert!(matches!(query.sort_by, Some(ProductSortBy::Price)));
        assert!(matches!(query.sort_order, Some(SortOrder::Asc)));

        let uri: Uri = "/api/logs?page=3&action=Pemindahan%20stok".parse().unwrap();
        let Query(query) = Query::<LogListQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(query.pagination().normalize(), (3, 20, 40));
        assert_eq!(query.action.as_deref(), Some("Pemindahan stok"));
    }
}
