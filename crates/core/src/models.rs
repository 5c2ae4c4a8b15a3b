//! Team data models as stored in the hosted database

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Tables exposed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Matches,
    Players,
    Trainings,
    CallUps,
    Profiles,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Matches => "matches",
            Table::Players => "players",
            Table::Trainings => "trainings",
            Table::CallUps => "call_ups",
            Table::Profiles => "profiles",
        }
    }
}

/// A row type that lives in one backend table and is identified by `id`
pub trait Record: Serialize + DeserializeOwned + Clone + Send + 'static {
    const TABLE: Table;
}

// ============================================================================
// Matches
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MatchCategory {
    #[serde(rename = "pre-stagione")]
    PreSeason,
    #[default]
    #[serde(rename = "stagione regolare")]
    RegularSeason,
    #[serde(rename = "post-stagione")]
    PostSeason,
    #[serde(rename = "tornei")]
    Tournament,
}

impl MatchCategory {
    pub const ALL: [MatchCategory; 4] = [
        MatchCategory::PreSeason,
        MatchCategory::RegularSeason,
        MatchCategory::PostSeason,
        MatchCategory::Tournament,
    ];

    /// Value stored in the `category` column
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchCategory::PreSeason => "pre-stagione",
            MatchCategory::RegularSeason => "stagione regolare",
            MatchCategory::PostSeason => "post-stagione",
            MatchCategory::Tournament => "tornei",
        }
    }

    /// Case-insensitive match on the stored value
    pub fn parse(text: &str) -> Option<MatchCategory> {
        let text = text.trim();
        MatchCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(text))
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchCategory::PreSeason => "Pre-stagione",
            MatchCategory::RegularSeason => "Stagione regolare",
            MatchCategory::PostSeason => "Post-stagione",
            MatchCategory::Tournament => "Tornei",
        }
    }
}

/// Category filter on the matches view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchFilter {
    #[default]
    All,
    Category(MatchCategory),
}

impl MatchFilter {
    pub fn options() -> Vec<MatchFilter> {
        std::iter::once(MatchFilter::All)
            .chain(MatchCategory::ALL.into_iter().map(MatchFilter::Category))
            .collect()
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchFilter::All => "Tutte",
            MatchFilter::Category(c) => c.label(),
        }
    }

    pub fn category(&self) -> Option<MatchCategory> {
        match self {
            MatchFilter::All => None,
            MatchFilter::Category(c) => Some(*c),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub opponent: String,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub is_home: bool,
    #[serde(default, deserialize_with = "lenient_category")]
    pub category: MatchCategory,
    #[serde(default)]
    pub our_score: Option<i32>,
    #[serde(default)]
    pub opponent_score: Option<i32>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Record for Match {
    const TABLE: Table = Table::Matches;
}

impl Match {
    pub fn score_display(&self) -> String {
        match (self.our_score, self.opponent_score) {
            (Some(ours), Some(theirs)) => format!("{} - {}", ours, theirs),
            _ => "—".to_string(),
        }
    }

    pub fn home_away_label(&self) -> &'static str {
        if self.is_home { "Casa" } else { "Trasferta" }
    }
}

// ============================================================================
// Players
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerRole {
    #[serde(rename = "Playmaker")]
    PointGuard,
    #[serde(rename = "Guardia")]
    ShootingGuard,
    #[serde(rename = "Ala piccola")]
    SmallForward,
    #[serde(rename = "Ala grande")]
    PowerForward,
    #[serde(rename = "Centro")]
    Center,
}

impl PlayerRole {
    pub const ALL: [PlayerRole; 5] = [
        PlayerRole::PointGuard,
        PlayerRole::ShootingGuard,
        PlayerRole::SmallForward,
        PlayerRole::PowerForward,
        PlayerRole::Center,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PlayerRole::PointGuard => "Playmaker",
            PlayerRole::ShootingGuard => "Guardia",
            PlayerRole::SmallForward => "Ala piccola",
            PlayerRole::PowerForward => "Ala grande",
            PlayerRole::Center => "Centro",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Option<PlayerRole>,
    #[serde(default)]
    pub jersey_number: Option<i32>,
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fitness_cleared: bool,
    #[serde(default)]
    pub clearance_expiry: Option<String>,
}

impl Record for Player {
    const TABLE: Table = Table::Players;
}

impl Player {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn role_label(&self) -> &'static str {
        self.role.map(|r| r.label()).unwrap_or("Non specificato")
    }
}

// ============================================================================
// Trainings
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Training {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Ids of players who attended
    #[serde(default, deserialize_with = "id_list")]
    pub attendance: Vec<i64>,
    /// Ids of players whose absence was justified
    #[serde(default, deserialize_with = "id_list")]
    pub excused: Vec<i64>,
}

impl Record for Training {
    const TABLE: Table = Table::Trainings;
}

// ============================================================================
// Call-ups
// ============================================================================

/// One player called up for one match. `refused` marks a call-up the player
/// turned down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallUp {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub match_id: i64,
    pub player_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub starter: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub refused: bool,
}

impl Record for CallUp {
    const TABLE: Table = Table::CallUps;
}

// ============================================================================
// Auth
// ============================================================================

/// Authenticated session returned by the backend. Only its presence matters to
/// the view layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

impl UserRole {
    pub fn can_write(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Admin => "Amministratore",
            UserRole::User => "Utente",
        }
    }
}

/// Row of the read-only `profiles` table used to resolve a login name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub username: Option<String>,
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: UserRole,
}

// ============================================================================
// Serde helpers
// ============================================================================

fn default_true() -> bool {
    true
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_true<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// Unknown role strings are treated as unspecified rather than failing the row
fn lenient_role<'de, D>(deserializer: D) -> std::result::Result<Option<PlayerRole>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Unknown or differently cased categories fall back to the regular season
fn lenient_category<'de, D>(deserializer: D) -> std::result::Result<MatchCategory, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let category = value
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(MatchCategory::parse)
        .unwrap_or_default();
    Ok(category)
}

/// Accepts `[1, 2]`, `"[1, 2]"`, `""` or `null`
fn id_list<'de, D>(deserializer: D) -> std::result::Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let ids = match value {
        Some(serde_json::Value::Array(items)) => items.iter().filter_map(|v| v.as_i64()).collect(),
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => {
            serde_json::from_str::<Vec<i64>>(&s).unwrap_or_default()
        }
        _ => Vec::new(),
    };
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn match_row_with_nulls_deserializes() {
        let row = json!({
            "id": 7,
            "date": "2025-03-01",
            "time": "18:30:00",
            "opponent": "Virtus",
            "venue": null,
            "is_home": null,
            "category": "tornei",
            "our_score": null,
            "opponent_score": null,
            "result": null,
            "notes": null
        });
        let m: Match = serde_json::from_value(row).unwrap();
        assert_eq!(m.id, Some(7));
        assert!(m.is_home);
        assert_eq!(m.category, MatchCategory::Tournament);
        assert_eq!(m.score_display(), "—");
    }

    #[test]
    fn insert_payload_omits_id_and_keeps_null_scores() {
        let m = Match {
            id: None,
            date: "2025-03-01".into(),
            time: "18:30".into(),
            opponent: "Virtus".into(),
            venue: None,
            is_home: false,
            category: MatchCategory::PreSeason,
            our_score: None,
            opponent_score: None,
            result: None,
            notes: None,
        };
        let value = serde_json::to_value(&m).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["our_score"], serde_json::Value::Null);
        assert_eq!(value["category"], "pre-stagione");
    }

    #[test]
    fn attendance_accepts_array_and_encoded_string() {
        let a: Training = serde_json::from_value(json!({
            "date": "2025-01-10", "time": "19:00", "attendance": [1, 2], "excused": "[3]"
        }))
        .unwrap();
        assert_eq!(a.attendance, vec![1, 2]);
        assert_eq!(a.excused, vec![3]);

        let b: Training = serde_json::from_value(json!({
            "date": "2025-01-10", "time": "19:00", "attendance": "", "excused": null
        }))
        .unwrap();
        assert!(b.attendance.is_empty());
        assert!(b.excused.is_empty());
    }

    #[test]
    fn unknown_role_becomes_unspecified() {
        let p: Player = serde_json::from_value(json!({
            "id": 1, "first_name": "Marco", "last_name": "Rossi", "role": "Allenatore"
        }))
        .unwrap();
        assert_eq!(p.role, None);
        assert_eq!(p.role_label(), "Non specificato");
    }

    #[test]
    fn unknown_category_falls_back_to_regular_season() {
        let rows: Vec<Match> = serde_json::from_value(json!([
            { "id": 1, "date": "2025-03-01", "opponent": "Virtus", "category": "TORNEI" },
            { "id": 2, "date": "2025-03-08", "opponent": "Fortitudo", "category": "Amichevole" },
            { "id": 3, "date": "2025-03-15", "opponent": "Aquila", "category": null }
        ]))
        .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].category, MatchCategory::Tournament);
        assert_eq!(rows[1].category, MatchCategory::RegularSeason);
        assert_eq!(rows[2].category, MatchCategory::RegularSeason);
    }

    #[test]
    fn call_up_flags_default_to_false() {
        let c: CallUp = serde_json::from_value(json!({
            "id": 4, "match_id": 7, "player_id": 10, "starter": null
        }))
        .unwrap();
        assert!(!c.starter);
        assert!(!c.refused);
        assert_eq!(serde_json::to_value(CallUp { id: None, ..c }).unwrap().get("id"), None);
    }

    #[test]
    fn match_filter_options_start_with_all() {
        let options = MatchFilter::options();
        assert_eq!(options.len(), 5);
        assert_eq!(options[0], MatchFilter::All);
        assert_eq!(options[4].category(), Some(MatchCategory::Tournament));
    }
}
