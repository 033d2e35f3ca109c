use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Division {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub name: String,
}

impl Schedule {
    pub fn is_playoff(&self) -> bool {
        self.name.to_uppercase().contains("PLAYOFF")
    }
}

/// The season chosen for a run and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeasonChoice {
    Found { season: Season, year: i32 },
    Fallback(String),
    Override(String),
}

impl SeasonChoice {
    pub fn id(&self) -> &str {
        match self {
            SeasonChoice::Found { season, .. } => &season.id,
            SeasonChoice::Fallback(id) | SeasonChoice::Override(id) => id,
        }
    }
}

/// One data line of a team's schedule search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRow {
    pub date: String,
    pub day: String,
    pub time: String,
    pub season: String,
    pub division: String,
    pub location: String,
    pub teams: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEvent {
    pub uid: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub summary: String,
    pub location: String,
    pub description: String,
}
