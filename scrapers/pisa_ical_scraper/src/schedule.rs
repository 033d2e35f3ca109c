use tracing::debug;

use crate::{
    client::{Fetcher, SEARCH_PATH},
    error::{RowError, ScrapeResult},
    types::GameRow,
};

/// Lines at the top of a search result that are never game rows.
pub const HEADER_LINES: usize = 2;
pub const ROW_FIELDS: usize = 7;

/// The schedule search form, as submitted by the site's own search button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm<'a> {
    pub search_year: i32,
    pub season_id: &'a str,
    pub division_id: &'a str,
    pub schedule_id: &'a str,
    pub team: &'a str,
}

impl SearchForm<'_> {
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("searchYear", self.search_year.to_string()),
            ("iSSSeasonId", self.season_id.to_string()),
            ("iDivisionId", self.division_id.to_string()),
            ("iScheduleId", self.schedule_id.to_string()),
            ("vTeamName", self.team.to_string()),
            ("btn_search_x", "54".to_string()),
            ("btn_search_y", "22".to_string()),
            ("btn_search", String::new()),
        ]
    }
}

/// Raw comma-separated search result for one team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleData {
    body: String,
}

impl ScheduleData {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Candidate game rows, numbered among the non-blank lines after the header.
    pub fn candidate_rows(&self) -> impl Iterator<Item = (usize, &str)> {
        self.body
            .trim()
            .lines()
            .skip(HEADER_LINES)
            .map(str::trim_end)
            .filter(|line| !line.trim().is_empty())
            .enumerate()
    }
}

impl GameRow {
    /// Reads the first seven comma-separated fields; anything after them is ignored.
    pub fn parse(line: &str) -> Result<GameRow, RowError> {
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() < ROW_FIELDS {
            return Err(RowError::TooFewFields {
                expected: ROW_FIELDS,
                found: parts.len(),
            });
        }

        Ok(GameRow {
            date: parts[0].to_string(),
            day: parts[1].to_string(),
            time: parts[2].to_string(),
            season: parts[3].to_string(),
            division: parts[4].to_string(),
            location: parts[5].to_string(),
            teams: parts[6].to_string(),
        })
    }
}

pub struct ScheduleFetcher<'a, F: Fetcher> {
    fetcher: &'a F,
}

impl<'a, F: Fetcher> ScheduleFetcher<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    pub fn fetch(&self, form: &SearchForm<'_>) -> ScrapeResult<ScheduleData> {
        let body = self.fetcher.post_form(SEARCH_PATH, &form.fields())?;
        let data = ScheduleData::new(body);
        debug!(
            "Schedule for {} has {} candidate rows",
            form.team,
            data.candidate_rows().count()
        );
        Ok(data)
    }
}
