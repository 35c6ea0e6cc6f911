// Request data model: teams, weekly matchups, playoff bracket entries and
// league context, as posted by the league client.
//
// Every optional field decodes to a sensible default so that a minimal
// payload (just `teams`) is accepted. Identifiers arrive as either JSON
// strings or numbers and are normalized to strings here, so every lookup
// downstream works on `&str`. Display-only numbers keep their JSON text.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

/// Per-team generated text keyed by team id.
pub type RoastResult = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Season phase
// ---------------------------------------------------------------------------

/// Which part of the season the league is in.
///
/// Unknown values decode as `RegularSeason`, as does a missing or `null`
/// field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", rename_all = "snake_case")]
pub enum SeasonPhase {
    #[default]
    RegularSeason,
    Playoffs,
    Offseason,
}

impl SeasonPhase {
    pub fn parse(value: &str) -> Self {
        match value {
            "playoffs" => SeasonPhase::Playoffs,
            "offseason" => SeasonPhase::Offseason,
            _ => SeasonPhase::RegularSeason,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SeasonPhase::RegularSeason => "regular_season",
            SeasonPhase::Playoffs => "playoffs",
            SeasonPhase::Offseason => "offseason",
        }
    }
}

impl From<Option<String>> for SeasonPhase {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(SeasonPhase::parse).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// A season-aggregate player line shown in the team data block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub name: String,
    pub position: String,
    pub points: Number,
}

/// One fantasy team, as ranked by the caller. Order in the request is the
/// standings order and is never re-sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    pub owner: String,
    pub record: String,
    #[serde(default)]
    pub points_for: Option<Number>,
    #[serde(default)]
    pub points_against: Option<Number>,
    #[serde(default)]
    pub streak: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_players: Vec<PlayerSummary>,
}

// ---------------------------------------------------------------------------
// Matchups
// ---------------------------------------------------------------------------

/// A player's stat line for a single week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStat {
    #[serde(default = "unknown_player")]
    pub name: String,
    #[serde(default = "unknown_position")]
    pub position: String,
    #[serde(default)]
    pub points: f64,
    #[serde(default)]
    pub is_starter: bool,
}

/// One head-to-head game for the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyMatchup {
    #[serde(default, deserialize_with = "id_string")]
    pub home_team_id: String,
    #[serde(default, deserialize_with = "id_string")]
    pub away_team_id: String,
    #[serde(default)]
    pub home_score: f64,
    #[serde(default)]
    pub away_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub home_players: Vec<PlayerStat>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub away_players: Vec<PlayerStat>,
}

// ---------------------------------------------------------------------------
// Playoff bracket
// ---------------------------------------------------------------------------

/// One team's position in the playoff bracket snapshot.
///
/// `is_eliminated` and `is_consolation` are independent and may both be set.
/// `seed` and `current_round` are only ever displayed, so they accept
/// strings or numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayoffBracketEntry {
    #[serde(default, deserialize_with = "id_string")]
    pub team_id: String,
    #[serde(default, deserialize_with = "optional_scalar_string")]
    pub seed: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar_string")]
    pub current_round: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar_string")]
    pub opponent_team_id: Option<String>,
    #[serde(default)]
    pub is_eliminated: bool,
    #[serde(default)]
    pub is_consolation: bool,
    #[serde(default)]
    pub is_championship: bool,
}

// ---------------------------------------------------------------------------
// League context
// ---------------------------------------------------------------------------

/// Placeholder used for unset free-text league fields.
pub const NOT_SPECIFIED: &str = "not specified";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsideJoke {
    pub term: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    pub player_name: String,
    pub description: String,
}

/// League flavor the roasts should lean on. Entirely optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueContext {
    #[serde(default, deserialize_with = "null_as_default")]
    pub inside_jokes: Vec<InsideJoke>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub personalities: Vec<Personality>,
    #[serde(default)]
    pub sacko_punishment: Option<String>,
    #[serde(default)]
    pub culture_notes: Option<String>,
}

impl LeagueContext {
    /// The sacko punishment, or `"not specified"` when unset.
    pub fn sacko_text(&self) -> &str {
        self.sacko_punishment.as_deref().unwrap_or(NOT_SPECIFIED)
    }

    /// True when a real punishment was supplied (anything other than the
    /// placeholder).
    pub fn has_sacko(&self) -> bool {
        self.sacko_text() != NOT_SPECIFIED
    }

    pub fn culture_text(&self) -> &str {
        self.culture_notes.as_deref().unwrap_or(NOT_SPECIFIED)
    }
}

// ---------------------------------------------------------------------------
// Top-level request
// ---------------------------------------------------------------------------

/// Everything needed to roast a league for one week.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoastRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub teams: Vec<Team>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub context: LeagueContext,
    #[serde(default, deserialize_with = "null_as_default")]
    pub matchups: Vec<WeeklyMatchup>,
    /// Week label as sent. `0`, `""` and `null` all mean no week.
    #[serde(default, deserialize_with = "week_text")]
    pub week_number: Option<String>,
    #[serde(default)]
    pub season_phase: SeasonPhase,
    #[serde(default, deserialize_with = "null_as_default")]
    pub playoff_bracket: Vec<PlayoffBracketEntry>,
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

/// A JSON string or number, rendered the way it was sent (`7` stays `7`,
/// `7.0` stays `7.0`).
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(Number),
}

impl Scalar {
    fn is_zero_or_empty(&self) -> bool {
        match self {
            Scalar::Text(s) => s.is_empty(),
            Scalar::Number(n) => n.as_f64() == Some(0.0),
        }
    }
}

impl From<Scalar> for String {
    fn from(raw: Scalar) -> Self {
        match raw {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
        }
    }
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(String::from)
}

fn optional_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(String::from))
}

fn week_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .filter(|week| !week.is_zero_or_empty())
        .map(String::from))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn unknown_player() -> String {
    "Unknown".to_string()
}

fn unknown_position() -> String {
    "??".to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
