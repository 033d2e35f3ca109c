//! Turns a team's schedule rows into an iCalendar document.

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, Component, EventLike, Property};
use tracing::debug;

use crate::{
    error::RowError,
    schedule::ScheduleData,
    types::{GameEvent, GameRow},
};

pub const UID_DOMAIN: &str = "plainville";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %I:%M %p";
const ICS_LOCAL_FORMAT: &str = "%Y%m%dT%H%M%S";

pub fn game_duration() -> Duration {
    Duration::hours(1)
}

#[derive(Debug, Clone)]
pub struct TeamCalendar {
    pub events: Vec<GameEvent>,
    pub skipped: usize,
    pub document: String,
}

pub struct CalendarBuilder<'a> {
    team: &'a str,
    location: String,
    timezone: Tz,
    generated_at: DateTime<Utc>,
}

impl<'a> CalendarBuilder<'a> {
    pub fn new(team: &'a str, location: String, timezone: Tz, generated_at: DateTime<Utc>) -> Self {
        Self {
            team,
            location,
            timezone,
            generated_at,
        }
    }

    /// Identifies row `index` of this team's fetch. Uses the generation year, not the game's.
    pub fn uid(&self, season: &str, index: usize) -> String {
        format!(
            "{}-{}-{}-{}@{}",
            self.team,
            self.generated_at.year(),
            season,
            index,
            UID_DOMAIN
        )
    }

    pub fn event_for(&self, index: usize, line: &str) -> Result<GameEvent, RowError> {
        let row = GameRow::parse(line)?;
        let input = format!("{} {}", row.date, row.time);
        let start = NaiveDateTime::parse_from_str(&input, DATE_TIME_FORMAT)
            .map_err(|source| RowError::InvalidDateTime { input, source })?;

        Ok(GameEvent {
            uid: self.uid(&row.season, index),
            start,
            end: start + game_duration(),
            summary: format!("{} - {}", row.division, self.team),
            location: self.location.clone(),
            description: format!("{} Season - {} Division", row.season, row.division),
        })
    }

    pub fn build(&self, data: &ScheduleData) -> TeamCalendar {
        let mut events = Vec::new();
        let mut skipped = 0;

        for (index, line) in data.candidate_rows() {
            match self.event_for(index, line) {
                Ok(event) => events.push(event),
                Err(e) => {
                    debug!("Skipping row {} for {}: {}", index, self.team, e);
                    skipped += 1;
                }
            }
        }

        let document = self.render(&events);
        TeamCalendar {
            events,
            skipped,
            document,
        }
    }

    pub fn render(&self, events: &[GameEvent]) -> String {
        let mut cal = Calendar::new();
        let dtstamp = self.generated_at.format("%Y%m%dT%H%M%SZ").to_string();

        for event in events {
            let mut ics_event = icalendar::Event::new();
            ics_event.uid(&event.uid);
            ics_event.add_property("DTSTAMP", &dtstamp);
            ics_event.append_property(self.local_time_property("DTSTART", &event.start));
            ics_event.append_property(self.local_time_property("DTEND", &event.end));
            ics_event.summary(&event.summary);
            ics_event.location(&event.location);
            ics_event.description(&event.description);
            cal.push(ics_event.done());
        }

        set_product_id(&cal.done().to_string(), self.team)
    }

    fn local_time_property(&self, name: &str, time: &NaiveDateTime) -> Property {
        let mut prop = Property::new(name, time.format(ICS_LOCAL_FORMAT).to_string());
        prop.add_parameter("TZID", self.timezone.name());
        prop
    }
}

/// Replaces the library's PRODID with one naming the team and drops the default CALSCALE.
fn set_product_id(ics: &str, team: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") || line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");

        if line == "VERSION:2.0" {
            result.push_str(&format!("PRODID:-//{} Schedule//EN\r\n", team));
        }
    }

    result
}
