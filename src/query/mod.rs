pub mod category;
pub mod customer;
pub mod order;
pub mod product;
pub mod review;

use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Debug;

pub use category::{CategoryFilters, CategorySort};
pub use customer::{CustomerFilters, CustomerSort};
pub use order::{OrderFilters, OrderSort};
pub use product::{ProductFilters, ProductSort};
pub use review::{ReviewFilters, ReviewSort};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 20;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl From<SortDirection> for sea_orm::Order {
    fn from(value: SortDirection) -> Self {
        match value {
            SortDirection::Asc => sea_orm::Order::Asc,
            SortDirection::Desc => sea_orm::Order::Desc,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort<K> {
    pub field: K,
    #[serde(default)]
    pub direction: SortDirection,
}

impl<K> Sort<K> {
    pub fn asc(field: K) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: K) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(bound(deserialize = "F: Deserialize<'de> + Default, K: Deserialize<'de>"))]
pub struct QueryOptions<F, K> {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    #[serde(default)]
    pub filters: F,
    pub sort: Option<Sort<K>>,
}

impl<F: Default, K> Default for QueryOptions<F, K> {
    fn default() -> Self {
        Self {
            page: None,
            limit: None,
            filters: F::default(),
            sort: None,
        }
    }
}

impl<F, K: SortKey> QueryOptions<F, K> {
    pub fn with_filters(filters: F) -> Self {
        Self {
            page: None,
            limit: None,
            filters,
            sort: None,
        }
    }

    pub fn page(mut self, page: u64, limit: u64) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    pub fn sorted(mut self, sort: Sort<K>) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Fills in defaults. Never fails: out-of-range pages yield empty results.
    pub fn normalize(self) -> QueryDescriptor<F, K> {
        QueryDescriptor {
            page: self.page.unwrap_or(DEFAULT_PAGE),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
            filters: self.filters,
            sort: self.sort.unwrap_or_else(K::default_sort),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QueryDescriptor<F, K> {
    pub page: u64,
    pub limit: u64,
    pub filters: F,
    pub sort: Sort<K>,
}

impl<F, K> QueryDescriptor<F, K> {
    pub fn offset(&self) -> Option<u64> {
        self.page
            .checked_sub(1)
            .and_then(|p| p.checked_mul(self.limit))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        Self {
            items,
            total,
            page,
            total_pages: total_pages(total, limit),
        }
    }

    pub fn empty(page: u64) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page,
            total_pages: 0,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            total_pages: self.total_pages,
        }
    }
}

pub fn total_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        0
    } else {
        total.div_ceil(limit)
    }
}

pub fn paginate<T>(rows: Vec<T>, page: u64, limit: u64) -> Paginated<T> {
    let total = rows.len() as u64;
    let offset = page.checked_sub(1).and_then(|p| p.checked_mul(limit));
    let items = match offset {
        Some(offset) if limit > 0 && offset < total => rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect(),
        _ => Vec::new(),
    };
    Paginated::new(items, total, page, limit)
}

pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn contains_ci_opt(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| contains_ci(h, needle))
}

/// `LOWER(col) LIKE '%needle%'` over any of `columns`. Wildcards in the
/// needle match literally.
pub fn search_condition<C: ColumnTrait>(columns: &[C], needle: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    columns.iter().fold(Condition::any(), |condition, column| {
        condition.add(
            Expr::expr(Func::lower(Expr::col((column.entity_name(), *column))))
                .like(LikeExpr::new(pattern.as_str()).escape(LIKE_ESCAPE)),
        )
    })
}

const LIKE_ESCAPE: char = '\\';

fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Search needles that are blank are treated as absent.
pub fn search_term(search: &Option<String>) -> Option<&str> {
    search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty())
}

pub trait SortKey: Copy + Debug + Send + Sync + 'static {
    fn default_sort() -> Sort<Self>;
}

pub trait Keyed {
    fn key(&self) -> i32;
}

pub trait RowFilter<M>: Send + Sync {
    fn condition(&self) -> Condition;

    /// Predicates only evaluable in process (cross-column comparisons).
    fn row_predicate(&self, _row: &M) -> bool {
        true
    }

    /// True when [`row_predicate`](Self::row_predicate) does anything, in which
    /// case pagination must wait for the in-process pass.
    fn needs_row_pass(&self) -> bool {
        false
    }

    fn matches(&self, row: &M) -> bool;
}

pub trait RowSort<M>: SortKey {
    type Entity: EntityTrait;

    fn column(self) -> <Self::Entity as EntityTrait>::Column;

    fn id_column() -> <Self::Entity as EntityTrait>::Column;

    fn compare(self, a: &M, b: &M) -> Ordering;
}

pub fn sort_rows<M: Keyed, K: RowSort<M>>(rows: &mut [&M], sort: Sort<K>) {
    rows.sort_by(|a, b| {
        sort.direction
            .apply(sort.field.compare(a, b))
            .then_with(|| a.key().cmp(&b.key()))
    });
}

pub fn run_in_memory<M, F, K>(rows: &[M], descriptor: &QueryDescriptor<F, K>) -> Paginated<M>
where
    M: Clone + Keyed,
    F: RowFilter<M>,
    K: RowSort<M>,
{
    let mut matched: Vec<&M> = rows
        .iter()
        .filter(|row| descriptor.filters.matches(row))
        .collect();
    sort_rows(&mut matched, descriptor.sort);
    paginate(
        matched.into_iter().cloned().collect(),
        descriptor.page,
        descriptor.limit,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_applies_defaults() {
        let descriptor = QueryOptions::<ProductFilters, ProductSort>::default().normalize();
        assert_eq!(descriptor.page, 1);
        assert_eq!(descriptor.limit, 20);
        assert_eq!(descriptor.sort, Sort::desc(ProductSort::CreatedAt));

        let descriptor = QueryOptions::<CategoryFilters, CategorySort>::default().normalize();
        assert_eq!(descriptor.sort, Sort::asc(CategorySort::SortOrder));
    }

    #[test]
    fn paginate_slices_and_counts() {
        let page = paginate((1..=45).collect::<Vec<i32>>(), 3, 20);
        assert_eq!(page.items, (41..=45).collect::<Vec<i32>>());
        assert_eq!(page.total, 45);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let rows: Vec<i32> = (1..=5).collect();
        assert!(paginate(rows.clone(), 4, 2).items.is_empty());
        assert_eq!(paginate(rows.clone(), 4, 2).total, 5);
        assert!(paginate(rows.clone(), 0, 2).items.is_empty());

        let zero_limit = paginate(rows, 1, 0);
        assert!(zero_limit.items.is_empty());
        assert_eq!(zero_limit.total_pages, 0);
    }

    #[test]
    fn page_length_matches_formula() {
        let total = 7u64;
        let limit = 3u64;
        for page in 1..=4u64 {
            let result = paginate((0..total).collect::<Vec<u64>>(), page, limit);
            let expected = limit.min(total.saturating_sub((page - 1) * limit));
            assert_eq!(result.items.len() as u64, expected);
        }
    }

    #[test]
    fn contains_is_case_insensitive() {
        assert!(contains_ci("Granola Artesanal", "ARTES"));
        assert!(!contains_ci("Granola", "miel"));
        assert!(contains_ci_opt(Some("Café de Origen"), "café"));
        assert!(!contains_ci_opt(None, "x"));
    }

    #[test]
    fn blank_search_is_ignored() {
        assert_eq!(search_term(&Some("   ".to_string())), None);
        assert_eq!(search_term(&Some(" miel ".to_string())), Some("miel"));
    }

    #[test]
    fn options_deserialize_from_json() {
        let options: QueryOptions<ProductFilters, ProductSort> = serde_json::from_value(
            serde_json::json!({
                "page": 2,
                "filters": { "is_active": true },
                "sort": { "field": "price", "direction": "asc" }
            }),
        )
        .expect("valid options");
        let descriptor = options.normalize();
        assert_eq!(descriptor.page, 2);
        assert_eq!(descriptor.limit, 20);
        assert_eq!(descriptor.filters.is_active, Some(true));
        assert_eq!(descriptor.sort, Sort::asc(ProductSort::Price));
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("granola"), "granola");
    }
}
