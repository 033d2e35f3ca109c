use tracing::debug;

use crate::{
    client::{Fetcher, DIVISIONS_PATH, SCHEDULES_PATH, TEAMS_PATH},
    error::ScrapeResult,
    records::{extract_field, extract_pairs, Pairing},
    types::{Division, Schedule},
};

/// Walks season → divisions → schedules → teams.
pub struct CatalogWalker<'a, F: Fetcher> {
    fetcher: &'a F,
    pairing: Pairing,
}

impl<'a, F: Fetcher> CatalogWalker<'a, F> {
    pub fn new(fetcher: &'a F, pairing: Pairing) -> Self {
        Self { fetcher, pairing }
    }

    pub fn list_divisions(&self, season_id: &str) -> ScrapeResult<Vec<Division>> {
        let text = self
            .fetcher
            .get(DIVISIONS_PATH, &[("seasonid", season_id.to_string())])?;
        let divisions: Vec<Division> = extract_pairs(&text, "divisionid", "divisionname", self.pairing)?
            .into_iter()
            .map(|(id, name)| Division { id, name })
            .collect();
        debug!("Season {} has {} divisions", season_id, divisions.len());
        Ok(divisions)
    }

    pub fn list_schedules(&self, division_id: &str) -> ScrapeResult<Vec<Schedule>> {
        let text = self
            .fetcher
            .get(SCHEDULES_PATH, &[("divid", division_id.to_string())])?;
        Ok(extract_pairs(&text, "scheduleid", "schedulename", self.pairing)?
            .into_iter()
            .map(|(id, name)| Schedule { id, name })
            .collect())
    }

    pub fn list_teams(&self, division_id: &str, schedule_id: &str) -> ScrapeResult<Vec<String>> {
        let text = self.fetcher.get(
            TEAMS_PATH,
            &[
                ("divisionid", division_id.to_string()),
                ("scheduleid", schedule_id.to_string()),
            ],
        )?;
        extract_field(&text, "teamname")
    }
}
