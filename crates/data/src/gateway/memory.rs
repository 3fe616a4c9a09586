//! In-memory [`Gateway`] for tests and dry runs.
//!
//! Behaves like the hosted store for everything the services rely on:
//! generated ids and `created_at`, filters and ordering, products removed
//! with their category, password sign-in and object storage. Every call is
//! counted, and individual operations can be made to fail.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use qr_menu_core::{Email, ImageUpload};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use super::{
    AccessToken, AuthSession, AuthUser, Filter, Gateway, GatewayError, Order, SelectQuery, Table,
};

/// Gateway operations that can be counted and made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
    Upload,
}

#[derive(Debug)]
struct Failure {
    operation: Operation,
    table: Option<Table>,
    message: String,
}

#[derive(Debug)]
struct Account {
    password: String,
    user: AuthUser,
}

#[derive(Debug, Default)]
struct MemoryState {
    tables: HashMap<Table, Vec<Value>>,
    next_id: u64,
    ticks: i64,
    blobs: BTreeMap<String, ImageUpload>,
    accounts: HashMap<Email, Account>,
    sessions: HashMap<String, AuthUser>,
    calls: HashMap<Operation, usize>,
    total_calls: usize,
    failures: Vec<Failure>,
}

impl MemoryState {
    fn record(&mut self, operation: Option<Operation>) {
        self.total_calls += 1;
        if let Some(operation) = operation {
            *self.calls.entry(operation).or_default() += 1;
        }
    }

    fn check_failure(&self, operation: Operation, table: Option<Table>) -> Result<(), GatewayError> {
        let failure = self.failures.iter().find(|f| {
            f.operation == operation && (f.table.is_none() || f.table == table)
        });
        match failure {
            Some(f) if operation == Operation::Upload => Err(GatewayError::Storage(f.message.clone())),
            Some(f) => Err(GatewayError::Status {
                status: 500,
                message: f.message.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Next `created_at`; strictly increasing.
    fn tick(&mut self) -> String {
        self.ticks += 1;
        let base = Utc.timestamp_opt(1_704_067_200, 0).single().unwrap_or_default();
        let at: DateTime<Utc> = base + Duration::seconds(self.ticks);
        at.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn insert(&mut self, table: Table, row: Value) -> Result<String, GatewayError> {
        let Value::Object(mut fields) = row else {
            return Err(GatewayError::Status {
                status: 400,
                message: "row must be a JSON object".to_string(),
            });
        };

        self.next_id += 1;
        let id = match fields.get("id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => format!("{table}-{}", self.next_id),
        };
        fields.insert("id".to_string(), Value::String(id.clone()));
        if !fields.contains_key("created_at") {
            let created_at = self.tick();
            fields.insert("created_at".to_string(), Value::String(created_at));
        }

        self.tables.entry(table).or_default().push(Value::Object(fields));
        Ok(id)
    }

    fn select(&self, query: &SelectQuery) -> Vec<Value> {
        let mut rows: Vec<Value> = self
            .tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_all(row, &query.filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            sort_rows(&mut rows, order);
        }
        rows
    }

    fn delete(&mut self, table: Table, filters: &[Filter]) {
        let Some(rows) = self.tables.get_mut(&table) else {
            return;
        };

        let mut removed_ids = Vec::new();
        rows.retain(|row| {
            let matched = matches_all(row, filters);
            if matched && let Some(id) = row.get("id").and_then(Value::as_str) {
                removed_ids.push(id.to_string());
            }
            !matched
        });

        // Products reference their category with ON DELETE CASCADE
        if table == Table::Categories
            && let Some(products) = self.tables.get_mut(&Table::Products)
        {
            products.retain(|p| {
                p.get("category_id")
                    .and_then(Value::as_str)
                    .is_none_or(|c| !removed_ids.iter().any(|id| id == c))
            });
        }
    }
}

fn value_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn matches_all(row: &Value, filters: &[Filter]) -> bool {
    filters
        .iter()
        .all(|f| f.matches(value_text(row.get(f.column())).as_deref()))
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        // Nulls sort last, as in Postgres ascending order
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn sort_rows(rows: &mut [Value], order: &Order) {
    rows.sort_by(|a, b| {
        let ordering = compare_values(a.get(order.column), b.get(order.column));
        if order.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
}

/// In-memory data store.
///
/// Clones share the same state; [`Gateway::with_access_token`] returns a
/// clone acting as a different session.
#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    state: Arc<Mutex<MemoryState>>,
    access_token: Option<AccessToken>,
}

impl MemoryGateway {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a row without counting a call. Returns the row's id.
    ///
    /// # Errors
    ///
    /// Returns an error if `row` is not a JSON object.
    pub fn insert_row(&self, table: Table, row: Value) -> Result<String, GatewayError> {
        self.state().insert(table, row)
    }

    /// Every row of `table`, in insertion order.
    #[must_use]
    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.state().tables.get(&table).cloned().unwrap_or_default()
    }

    /// Create a sign-in account.
    #[must_use]
    pub fn register_user(&self, email: &Email, password: &str) -> AuthUser {
        let mut state = self.state();
        state.next_id += 1;
        let user = AuthUser {
            id: format!("user-{}", state.next_id),
            email: email.clone(),
        };
        state.accounts.insert(
            email.clone(),
            Account {
                password: password.to_string(),
                user: user.clone(),
            },
        );
        user
    }

    /// Keys of stored objects as `{bucket}/{key}`, sorted.
    #[must_use]
    pub fn blob_keys(&self) -> Vec<String> {
        self.state().blobs.keys().cloned().collect()
    }

    /// Total number of gateway calls made so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.state().total_calls
    }

    /// Number of calls of one kind made so far.
    #[must_use]
    pub fn calls_of(&self, operation: Operation) -> usize {
        self.state().calls.get(&operation).copied().unwrap_or_default()
    }

    /// Make every `operation` (optionally only on `table`) fail until cleared.
    pub fn fail(&self, operation: Operation, table: Option<Table>, message: &str) {
        self.state().failures.push(Failure {
            operation,
            table,
            message: message.to_string(),
        });
    }

    /// Remove all injected failures.
    pub fn clear_failures(&self) {
        self.state().failures.clear();
    }
}

impl Gateway for MemoryGateway {
    async fn select(&self, query: SelectQuery) -> Result<Vec<Value>, GatewayError> {
        let mut state = self.state();
        state.record(Some(Operation::Select));
        state.check_failure(Operation::Select, Some(query.table))?;
        Ok(state.select(&query))
    }

    async fn select_single(&self, query: SelectQuery) -> Result<Value, GatewayError> {
        let mut state = self.state();
        state.record(Some(Operation::Select));
        state.check_failure(Operation::Select, Some(query.table))?;

        let mut rows = state.select(&query);
        match rows.len() {
            0 => Err(GatewayError::NotFound),
            1 => Ok(rows.remove(0)),
            n => Err(GatewayError::Status {
                status: 406,
                message: format!("{n} rows returned for a single-row query"),
            }),
        }
    }

    async fn insert(&self, table: Table, row: Value) -> Result<(), GatewayError> {
        let mut state = self.state();
        state.record(Some(Operation::Insert));
        state.check_failure(Operation::Insert, Some(table))?;
        state.insert(table, row).map(|_| ())
    }

    async fn update(&self, table: Table, filters: Vec<Filter>, changes: Value) -> Result<(), GatewayError> {
        let mut state = self.state();
        state.record(Some(Operation::Update));
        state.check_failure(Operation::Update, Some(table))?;

        let Value::Object(changes) = changes else {
            return Err(GatewayError::Status {
                status: 400,
                message: "changes must be a JSON object".to_string(),
            });
        };

        if let Some(rows) = state.tables.get_mut(&table) {
            for row in rows.iter_mut().filter(|row| matches_all(row, &filters)) {
                if let Value::Object(fields) = row {
                    for (key, value) in &changes {
                        fields.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, table: Table, filters: Vec<Filter>) -> Result<(), GatewayError> {
        let mut state = self.state();
        state.record(Some(Operation::Delete));
        state.check_failure(Operation::Delete, Some(table))?;
        state.delete(table, &filters);
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<AuthUser>, GatewayError> {
        let mut state = self.state();
        state.record(None);
        Ok(self
            .access_token
            .as_ref()
            .and_then(|token| state.sessions.get(token.expose()).cloned()))
    }

    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthSession, GatewayError> {
        let mut state = self.state();
        state.record(None);

        let user = state
            .accounts
            .get(email)
            .filter(|account| account.password == password.expose_secret())
            .map(|account| account.user.clone())
            .ok_or_else(|| GatewayError::Unauthorized("Invalid login credentials".to_string()))?;

        state.next_id += 1;
        let token = format!("token-{}", state.next_id);
        state.sessions.insert(token.clone(), user.clone());

        Ok(AuthSession {
            access_token: AccessToken::new(token),
            user,
        })
    }

    async fn sign_out(&self) -> Result<(), GatewayError> {
        let mut state = self.state();
        state.record(None);
        if let Some(token) = &self.access_token {
            state.sessions.remove(token.expose());
        }
        Ok(())
    }

    async fn upload(&self, bucket: &str, key: &str, file: &ImageUpload) -> Result<(), GatewayError> {
        let mut state = self.state();
        state.record(Some(Operation::Upload));
        state.check_failure(Operation::Upload, None)?;
        state.blobs.insert(format!("{bucket}/{key}"), file.clone());
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("memory://{bucket}/{key}")
    }

    fn with_access_token(&self, token: &AccessToken) -> Self {
        Self {
            state: Arc::clone(&self.state),
            access_token: Some(token.clone()),
        }
    }
}
