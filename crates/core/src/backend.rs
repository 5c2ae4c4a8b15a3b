//! Backend abstraction: session/auth plus tabular data access.
//!
//! The desktop client talks to the hosted service over HTTP; tests plug in an
//! in-memory implementation. Everything above this trait only sees typed
//! records and [`JbkError`].

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{JbkError, Result};
use crate::models::{MatchFilter, Profile, Record, Session, Table};

/// Equality filter on one column (`column=eq.value`)
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub descending: bool,
}

/// Select parameters for one table
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub columns: String,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(mut self, columns: &str) -> Self {
        self.columns = columns.to_string();
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push(Filter {
            column: column.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn order(mut self, column: &str, descending: bool) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            descending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
pub trait Backend: Send + Sync {
    /// Session stored by the client, if it is still valid
    async fn current_session(&self) -> Result<Option<Session>>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session>;

    async fn sign_out(&self) -> Result<()>;

    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Value>>;

    /// Inserts one row and returns the stored representation
    async fn insert(&self, table: Table, row: Value) -> Result<Vec<Value>>;

    /// Updates the row with `id` and returns the stored representation
    async fn update(&self, table: Table, id: i64, row: Value) -> Result<Vec<Value>>;

    async fn delete(&self, table: Table, id: i64) -> Result<()>;

    /// Deletes every row matching the query's filters
    async fn delete_where(&self, table: Table, query: &Query) -> Result<()>;
}

// ============================================================================
// Typed access
// ============================================================================

fn decode_rows<T: Record>(rows: Vec<Value>) -> Result<Vec<T>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(JbkError::from))
        .collect()
}

pub async fn fetch_all<T: Record>(backend: &dyn Backend, query: &Query) -> Result<Vec<T>> {
    let rows = backend.select(T::TABLE, query).await?;
    decode_rows(rows)
}

pub fn matches_query(filter: MatchFilter) -> Query {
    let query = Query::new().order("date", true);
    match filter.category() {
        Some(category) => query.eq("category", category.as_str()),
        None => query,
    }
}

pub fn players_query() -> Query {
    Query::new().order("last_name", false)
}

pub fn trainings_query() -> Query {
    Query::new().order("date", true)
}

pub fn call_ups_query(match_id: Option<i64>) -> Query {
    let query = Query::new().order("player_id", false);
    match match_id {
        Some(id) => query.eq("match_id", id),
        None => query,
    }
}

/// Resolve a login name to its profile with a single-row lookup
pub async fn lookup_profile(backend: &dyn Backend, username: &str) -> Result<Profile> {
    let query = Query::new()
        .columns("username,email,role")
        .eq("username", username)
        .limit(1);
    let rows = backend
        .select(Table::Profiles, &query)
        .await
        .map_err(|e| {
            tracing::warn!("Profile lookup for {} failed: {}", username, e);
            JbkError::UsernameNotFound
        })?;
    let row = rows.into_iter().next().ok_or(JbkError::UsernameNotFound)?;
    serde_json::from_value(row).map_err(|_| JbkError::UsernameNotFound)
}

/// Insert when `id` is `None`, otherwise update that row only
pub async fn save_record<T: Record>(backend: &dyn Backend, record: &T, id: Option<i64>) -> Result<()> {
    let mut row = serde_json::to_value(record)?;
    if let Value::Object(map) = &mut row {
        map.remove("id");
    }
    match id {
        Some(id) => {
            backend.update(T::TABLE, id, row).await?;
        }
        None => {
            backend.insert(T::TABLE, row).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchCategory;

    #[test]
    fn matches_query_adds_category_filter() {
        let all = matches_query(MatchFilter::All);
        assert!(all.filters.is_empty());
        assert_eq!(all.order.as_ref().map(|o| o.descending), Some(true));

        let tournaments = matches_query(MatchFilter::Category(MatchCategory::Tournament));
        assert_eq!(
            tournaments.filters,
            vec![Filter { column: "category".into(), value: "tornei".into() }]
        );
    }

    #[test]
    fn call_ups_query_filters_by_match() {
        assert!(call_ups_query(None).filters.is_empty());
        assert_eq!(
            call_ups_query(Some(7)).filters,
            vec![Filter { column: "match_id".into(), value: "7".into() }]
        );
    }

    #[test]
    fn query_builder_defaults_to_all_columns() {
        let q = Query::new().eq("username", "coach").limit(1);
        assert_eq!(q.columns, "*");
        assert_eq!(q.limit, Some(1));
        assert_eq!(q.filters[0].value, "coach");
    }
}
