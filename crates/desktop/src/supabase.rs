//! Supabase client: GoTrue auth and PostgREST table access over HTTP
//!
//! The signed-in session is written to a JSON file so that the stored-session
//! check survives restarts.

use async_trait::async_trait;
use jbk_core::{Backend, JbkError, Query, Result, Session, Table};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::Duration;

use crate::config::Config;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl TokenResponse {
    fn into_session(self) -> Session {
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            user_id: self.user.id,
            email: self.user.email,
        }
    }
}

/// Human-readable message from an error body, falling back to the status
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["error_description", "msg", "message"] {
            if let Some(text) = map.get(key).and_then(Value::as_str) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }
    format!("HTTP {}", status)
}

fn filter_params(query: &Query) -> Vec<String> {
    query
        .filters
        .iter()
        .map(|filter| {
            format!(
                "{}=eq.{}",
                urlencoding::encode(&filter.column),
                urlencoding::encode(&filter.value)
            )
        })
        .collect()
}

/// `{base}/rest/v1/{table}?select=..&col=eq.val&order=..&limit=..`
pub fn rest_url(base_url: &str, table: Table, query: &Query) -> String {
    let mut params = vec![format!("select={}", urlencoding::encode(&query.columns))];
    params.extend(filter_params(query));
    if let Some(order) = &query.order {
        let direction = if order.descending { "desc" } else { "asc" };
        params.push(format!("order={}.{}", urlencoding::encode(&order.column), direction));
    }
    if let Some(limit) = query.limit {
        params.push(format!("limit={}", limit));
    }
    format!("{}/rest/v1/{}?{}", base_url, table.name(), params.join("&"))
}

fn row_url(base_url: &str, table: Table, id: i64) -> String {
    format!("{}/rest/v1/{}?id=eq.{}", base_url, table.name(), id)
}

/// Filters only; a bare table URL would target every row
pub fn delete_url(base_url: &str, table: Table, query: &Query) -> Result<String> {
    if query.filters.is_empty() {
        return Err(JbkError::InvalidData(format!(
            "Eliminazione senza filtri su {} non consentita",
            table.name()
        )));
    }
    Ok(format!(
        "{}/rest/v1/{}?{}",
        base_url,
        table.name(),
        filter_params(query).join("&")
    ))
}

/// An expired access token on a table request earns one refresh and retry
pub fn should_refresh(status: StatusCode, session: Option<&Session>) -> bool {
    status == StatusCode::UNAUTHORIZED && session.is_some_and(|s| s.refresh_token.is_some())
}

// ============================================================================
// Session file
// ============================================================================

pub fn load_session(path: &Path) -> Option<Session> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!("Ignoring unreadable session file {}: {}", path.display(), e);
            None
        }
    }
}

pub fn store_session(path: &Path, session: &Session) -> Result<()> {
    let content = serde_json::to_string_pretty(session)?;
    fs::write(path, content).map_err(|e| JbkError::InvalidData(e.to_string()))
}

pub fn clear_session(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!("Could not remove {}: {}", path.display(), e);
        }
    }
}

// ============================================================================
// Client
// ============================================================================

pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    session_file: PathBuf,
    session: RwLock<Option<Session>>,
}

impl SupabaseClient {
    /// Fails when the configuration cannot describe a project
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| JbkError::Config(format!("Failed to create HTTP client: {}", e)))?;
        let session_file = PathBuf::from(&config.session_file);
        let session = load_session(&session_file);
        Ok(Self {
            http,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
            session_file,
            session: RwLock::new(session),
        })
    }

    fn stored_session(&self) -> Option<Session> {
        self.session.read().ok().and_then(|s| s.clone())
    }

    fn set_session(&self, session: Option<Session>) {
        match &session {
            Some(s) => {
                if let Err(e) = store_session(&self.session_file, s) {
                    tracing::warn!("Could not persist session: {}", e);
                }
            }
            None => clear_session(&self.session_file),
        }
        if let Ok(mut guard) = self.session.write() {
            *guard = session;
        }
    }

    fn request(&self, method: Method, url: &str, token: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", token))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        builder.send().await.map_err(|e| JbkError::Network(e.to_string()))
    }

    /// Non-2xx responses become `make(message)`
    async fn check(response: Response, make: fn(String) -> JbkError) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(make(error_message(status, &body)))
    }

    async fn rows(response: Response) -> Result<Vec<Value>> {
        let response = Self::check(response, JbkError::Backend).await?;
        let text = response.text().await.map_err(|e| JbkError::Network(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str::<Value>(&text)? {
            Value::Array(rows) => Ok(rows),
            other => Ok(vec![other]),
        }
    }

    async fn token(&self, grant_type: &str, body: Value) -> Result<Session> {
        let url = format!("{}/auth/v1/token?grant_type={}", self.base_url, grant_type);
        let response = self.send(self.request(Method::POST, &url, &self.anon_key).json(&body)).await?;
        let response = Self::check(response, JbkError::Auth).await?;
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| JbkError::InvalidData(e.to_string()))?;
        Ok(token.into_session())
    }

    async fn refresh(&self, session: &Session) -> Result<Session> {
        let refresh_token = session.refresh_token.clone().ok_or(JbkError::NotAuthenticated)?;
        self.token("refresh_token", json!({ "refresh_token": refresh_token })).await
    }

    fn table_request(&self, method: Method, url: &str, token: &str, body: Option<&Value>) -> RequestBuilder {
        let builder = self.request(method, url, token);
        match body {
            Some(body) => builder.header("Prefer", "return=representation").json(body),
            None => builder,
        }
    }

    /// Table request with the user token (anon key when signed out). A 401
    /// refreshes the session once and repeats the request with the new token.
    async fn send_table(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Response> {
        let session = self.stored_session();
        let token = session
            .as_ref()
            .map(|s| s.access_token.as_str())
            .unwrap_or(self.anon_key.as_str());
        let response = self.send(self.table_request(method.clone(), url, token, body)).await?;

        let session = match session {
            Some(session) if should_refresh(response.status(), Some(&session)) => session,
            _ => return Ok(response),
        };

        tracing::info!("Access token rejected, refreshing session");
        let fresh = match self.refresh(&session).await {
            Ok(fresh) => fresh,
            Err(e) => {
                tracing::warn!("Session refresh failed: {}", e);
                return Ok(response);
            }
        };
        self.set_session(Some(fresh.clone()));
        self.send(self.table_request(method, url, &fresh.access_token, body)).await
    }

    /// Health endpoint reachable
    pub async fn health(&self) -> bool {
        let url = format!("{}/auth/v1/health", self.base_url);
        match self.request(Method::GET, &url, &self.anon_key).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Health check failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl Backend for SupabaseClient {
    async fn current_session(&self) -> Result<Option<Session>> {
        let Some(session) = self.stored_session() else {
            return Ok(None);
        };

        let url = format!("{}/auth/v1/user", self.base_url);
        let response = match self.send(self.request(Method::GET, &url, &session.access_token)).await {
            Ok(response) => response,
            Err(e) => {
                // offline start: keep the session, loads will report the failure
                tracing::warn!("Could not validate stored session: {}", e);
                return Ok(Some(session));
            }
        };

        if response.status().is_success() {
            return Ok(Some(session));
        }

        tracing::info!("Stored session rejected ({}), refreshing", response.status());
        match self.refresh(&session).await {
            Ok(fresh) => {
                self.set_session(Some(fresh.clone()));
                Ok(Some(fresh))
            }
            Err(e) => {
                tracing::info!("Session refresh failed: {}", e);
                self.set_session(None);
                Ok(None)
            }
        }
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let session = self
            .token("password", json!({ "email": email, "password": password }))
            .await?;
        self.set_session(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        let Some(session) = self.stored_session() else {
            return Ok(());
        };
        // the local session goes away whatever the server says
        self.set_session(None);
        let url = format!("{}/auth/v1/logout", self.base_url);
        let response = self.send(self.request(Method::POST, &url, &session.access_token)).await?;
        Self::check(response, JbkError::Auth).await?;
        Ok(())
    }

    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Value>> {
        let url = rest_url(&self.base_url, table, query);
        Self::rows(self.send_table(Method::GET, &url, None).await?).await
    }

    async fn insert(&self, table: Table, row: Value) -> Result<Vec<Value>> {
        let url = format!("{}/rest/v1/{}", self.base_url, table.name());
        Self::rows(self.send_table(Method::POST, &url, Some(&row)).await?).await
    }

    async fn update(&self, table: Table, id: i64, row: Value) -> Result<Vec<Value>> {
        let url = row_url(&self.base_url, table, id);
        Self::rows(self.send_table(Method::PATCH, &url, Some(&row)).await?).await
    }

    async fn delete(&self, table: Table, id: i64) -> Result<()> {
        let url = row_url(&self.base_url, table, id);
        let response = self.send_table(Method::DELETE, &url, None).await?;
        Self::check(response, JbkError::Backend).await?;
        Ok(())
    }

    async fn delete_where(&self, table: Table, query: &Query) -> Result<()> {
        let url = delete_url(&self.base_url, table, query)?;
        let response = self.send_table(Method::DELETE, &url, None).await?;
        Self::check(response, JbkError::Backend).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jbk_core::backend::matches_query;
    use jbk_core::{MatchCategory, MatchFilter};

    #[test]
    fn error_message_prefers_description() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(error_message(StatusCode::BAD_REQUEST, body), "Invalid login credentials");

        let body = r#"{"code":"42501","message":"permission denied for table matches"}"#;
        assert_eq!(error_message(StatusCode::FORBIDDEN, body), "permission denied for table matches");

        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "<html>"), "HTTP 502 Bad Gateway");
    }

    #[test]
    fn filtered_matches_url() {
        let query = matches_query(MatchFilter::Category(MatchCategory::RegularSeason));
        assert_eq!(
            rest_url("https://jbk.supabase.co", Table::Matches, &query),
            "https://jbk.supabase.co/rest/v1/matches?select=%2A&category=eq.stagione%20regolare&order=date.desc"
        );
    }

    #[test]
    fn profile_lookup_url_is_limited() {
        let query = Query::new().columns("username,email,role").eq("username", "coach").limit(1);
        assert_eq!(
            rest_url("https://jbk.supabase.co", Table::Profiles, &query),
            "https://jbk.supabase.co/rest/v1/profiles?select=username%2Cemail%2Crole&username=eq.coach&limit=1"
        );
    }

    fn session(refresh_token: Option<&str>) -> Session {
        Session {
            access_token: "expired".into(),
            refresh_token: refresh_token.map(String::from),
            user_id: "u1".into(),
            email: Some("coach@jbk.it".into()),
        }
    }

    #[test]
    fn only_unauthorized_with_refresh_token_retries() {
        let refreshable = session(Some("r1"));
        assert!(should_refresh(StatusCode::UNAUTHORIZED, Some(&refreshable)));
        assert!(!should_refresh(StatusCode::OK, Some(&refreshable)));
        assert!(!should_refresh(StatusCode::FORBIDDEN, Some(&refreshable)));
        assert!(!should_refresh(StatusCode::UNAUTHORIZED, Some(&session(None))));
        assert!(!should_refresh(StatusCode::UNAUTHORIZED, None));
    }

    #[test]
    fn delete_url_requires_a_filter() {
        let query = jbk_core::backend::call_ups_query(Some(7));
        assert_eq!(
            delete_url("https://jbk.supabase.co", Table::CallUps, &query).unwrap(),
            "https://jbk.supabase.co/rest/v1/call_ups?match_id=eq.7"
        );
        assert!(delete_url("https://jbk.supabase.co", Table::CallUps, &Query::new()).is_err());
    }

    #[test]
    fn session_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        assert!(load_session(&path).is_none());

        let session = Session {
            access_token: "abc".into(),
            refresh_token: Some("def".into()),
            user_id: "u1".into(),
            email: Some("coach@jbk.it".into()),
        };
        store_session(&path, &session).unwrap();
        assert_eq!(load_session(&path), Some(session));

        clear_session(&path);
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_session_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        assert!(load_session(&path).is_none());
    }

    #[test]
    fn client_requires_valid_config() {
        let config = Config::default();
        assert!(matches!(SupabaseClient::new(&config), Err(JbkError::Config(_))));
    }
}
