//! Table-scoped query descriptions.
//!
//! Queries are plain data so the same description can be rendered to
//! PostgREST query parameters or evaluated against in-memory rows.

use std::fmt;

/// Tables in the hosted data store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Restaurants,
    RestaurantAdmins,
    Categories,
    Products,
}

impl Table {
    /// Table name as exposed by the REST endpoint.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Restaurants => "restaurants",
            Self::RestaurantAdmins => "restaurant_admins",
            Self::Categories => "categories",
            Self::Products => "products",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A column predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `column = value`
    Eq(&'static str, String),
    /// `column <> value`
    Neq(&'static str, String),
}

impl Filter {
    /// Equality predicate.
    #[must_use]
    pub fn eq(column: &'static str, value: impl ToString) -> Self {
        Self::Eq(column, value.to_string())
    }

    /// Inequality predicate.
    #[must_use]
    pub fn neq(column: &'static str, value: impl ToString) -> Self {
        Self::Neq(column, value.to_string())
    }

    /// Column this predicate applies to.
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Eq(column, _) | Self::Neq(column, _) => column,
        }
    }

    /// PostgREST operator form, e.g. `eq.42`.
    #[must_use]
    pub fn to_param(&self) -> String {
        match self {
            Self::Eq(_, value) => format!("eq.{value}"),
            Self::Neq(_, value) => format!("neq.{value}"),
        }
    }

    /// Evaluate against the textual form of a stored value.
    #[must_use]
    pub fn matches(&self, stored: Option<&str>) -> bool {
        match self {
            Self::Eq(_, value) => stored == Some(value.as_str()),
            Self::Neq(_, value) => stored != Some(value.as_str()),
        }
    }
}

/// Result ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub ascending: bool,
}

impl Order {
    #[must_use]
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            ascending: true,
        }
    }

    #[must_use]
    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            ascending: false,
        }
    }

    /// PostgREST `order` parameter value.
    #[must_use]
    pub fn to_param(&self) -> String {
        let direction = if self.ascending { "asc" } else { "desc" };
        format!("{}.{direction}", self.column)
    }
}

/// A `SELECT *` against one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub table: Table,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
}

impl SelectQuery {
    /// Start a query over `table`.
    #[must_use]
    pub const fn from(table: Table) -> Self {
        Self {
            table,
            filters: Vec::new(),
            order: None,
        }
    }

    /// Add an equality filter.
    #[must_use]
    pub fn eq(mut self, column: &'static str, value: impl ToString) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    /// Order the result.
    #[must_use]
    pub fn order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    /// Query string pairs for the REST endpoint.
    #[must_use]
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(filter_params(&self.filters));
        if let Some(order) = &self.order {
            params.push(("order".to_string(), order.to_param()));
        }
        params
    }
}

/// Query string pairs for a filter list.
#[must_use]
pub fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|f| (f.column().to_string(), f.to_param()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_params() {
        let query = SelectQuery::from(Table::Categories)
            .eq("restaurant_id", "r1")
            .eq("is_active", true)
            .order(Order::asc("display_order"));

        assert_eq!(
            query.to_params(),
            vec![
                ("select".to_string(), "*".to_string()),
                ("restaurant_id".to_string(), "eq.r1".to_string()),
                ("is_active".to_string(), "eq.true".to_string()),
                ("order".to_string(), "display_order.asc".to_string()),
            ]
        );
    }

    #[test]
    fn test_filter_matching() {
        let owner_guard = Filter::neq("role", "owner");
        assert!(owner_guard.matches(Some("editor")));
        assert!(!owner_guard.matches(Some("owner")));
        assert!(owner_guard.matches(None));

        assert!(!Filter::eq("id", "a").matches(None));
    }

    #[test]
    fn test_order_param() {
        assert_eq!(Order::desc("created_at").to_param(), "created_at.desc");
    }
}
