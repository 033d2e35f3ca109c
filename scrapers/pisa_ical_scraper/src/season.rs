use tracing::{info, warn};

use crate::{
    client::{Fetcher, SEASONS_PATH},
    config::SiteConfig,
    error::{ScrapeError, ScrapeResult},
    records::{extract_pairs, Pairing},
    types::{Season, SeasonChoice},
};

/// Years searched for a season, most likely first.
pub fn candidate_years(current_year: i32) -> [i32; 3] {
    [current_year, current_year + 1, current_year - 1]
}

pub struct SeasonResolver<'a, F: Fetcher> {
    fetcher: &'a F,
    site: &'a SiteConfig,
    pairing: Pairing,
}

impl<'a, F: Fetcher> SeasonResolver<'a, F> {
    pub fn new(fetcher: &'a F, site: &'a SiteConfig, pairing: Pairing) -> Self {
        Self { fetcher, site, pairing }
    }

    /// Every season the site lists for `year`, allow-listed or not.
    pub fn seasons_for_year(&self, year: i32) -> ScrapeResult<Vec<Season>> {
        let text = self.fetcher.get(
            SEASONS_PATH,
            &[("ddname", "Year".to_string()), ("iYearId", year.to_string())],
        )?;

        Ok(extract_pairs(&text, "seasonid", "seasonname", self.pairing)?
            .into_iter()
            .map(|(id, name)| Season { id, name })
            .collect())
    }

    /// The first allow-listed season for `year`.
    pub fn find_in_year(&self, year: i32) -> ScrapeResult<Season> {
        self.seasons_for_year(year)?
            .into_iter()
            .find(|season| self.site.is_valid_season(&season.name))
            .ok_or_else(|| ScrapeError::NoData(format!("no allow-listed season for {}", year)))
    }

    pub fn resolve(&self, current_year: i32) -> SeasonChoice {
        for year in candidate_years(current_year) {
            match self.find_in_year(year) {
                Ok(season) => {
                    info!("Found {} season (ID: {}) for {}", season.name, season.id, year);
                    return SeasonChoice::Found { season, year };
                }
                Err(e) => warn!("No season for {}: {}", year, e),
            }
        }

        warn!(
            "No allow-listed season found, falling back to season ID {}",
            self.site.fallback_season_id
        );
        SeasonChoice::Fallback(self.site.fallback_season_id.clone())
    }
}
