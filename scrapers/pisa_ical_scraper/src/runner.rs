use std::{fs, path::PathBuf};

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use tracing::{error, info};

use crate::{
    calendar::CalendarBuilder,
    catalog::CatalogWalker,
    client::Fetcher,
    config::ScraperConfig,
    error::{ScrapeError, ScrapeResult},
    index::{calendar_file_name, write_index},
    records::Pairing,
    schedule::{ScheduleFetcher, SearchForm},
    season::SeasonResolver,
    types::{Division, Schedule, SeasonChoice},
};

#[derive(Debug)]
pub struct TeamFailure {
    pub division: String,
    pub team: String,
    pub error: ScrapeError,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub season_id: String,
    pub written: Vec<PathBuf>,
    pub failures: Vec<TeamFailure>,
    pub skipped_playoffs: Vec<String>,
    pub events: usize,
    pub index: Option<PathBuf>,
}

/// One sequential pass over the tracked divisions.
pub struct ScheduleRunner<'a, F: Fetcher> {
    fetcher: &'a F,
    config: &'a ScraperConfig,
    timezone: Tz,
    generated_at: DateTime<Utc>,
}

impl<'a, F: Fetcher> ScheduleRunner<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a ScraperConfig, timezone: Tz, generated_at: DateTime<Utc>) -> Self {
        Self {
            fetcher,
            config,
            timezone,
            generated_at,
        }
    }

    fn pairing(&self) -> Pairing {
        Pairing::from_strict(self.config.scraping.strict_pairing)
    }

    pub fn resolve_season(&self) -> SeasonChoice {
        SeasonResolver::new(self.fetcher, &self.config.site, self.pairing()).resolve(self.generated_at.year())
    }

    /// Resolves the season unless one is given, writes every calendar, then rebuilds the index.
    pub fn run(&self, season_override: Option<String>) -> ScrapeResult<RunSummary> {
        let season = match season_override {
            Some(id) => SeasonChoice::Override(id),
            None => self.resolve_season(),
        };
        info!("Using season ID: {}", season.id());

        let mut summary = self.generate(season.id())?;
        summary.index = Some(write_index(
            &self.config.publish.output_dir,
            &self.config.publish.base_url,
        )?);
        Ok(summary)
    }

    /// Listing failures abort; a failure for one team is recorded and the run moves on.
    pub fn generate(&self, season_id: &str) -> ScrapeResult<RunSummary> {
        let walker = CatalogWalker::new(self.fetcher, self.pairing());
        let divisions = walker.list_divisions(season_id)?;
        info!("Found {} divisions", divisions.len());

        let mut summary = RunSummary {
            season_id: season_id.to_string(),
            ..RunSummary::default()
        };

        for division in &divisions {
            if self.config.teams_for(&division.name).is_none() {
                continue;
            }
            info!("Processing {} (ID: {})", division.name, division.id);

            for schedule in walker.list_schedules(&division.id)? {
                if schedule.is_playoff() {
                    info!("Skipping playoff schedule: {}", schedule.name);
                    summary.skipped_playoffs.push(schedule.name);
                    continue;
                }
                info!("Schedule: {}", schedule.name);

                let teams = walker.list_teams(&division.id, &schedule.id)?;
                info!("Found {} teams", teams.len());

                for team in teams.iter().filter(|t| self.config.wants_team(&division.name, t)) {
                    match self.write_team_calendar(season_id, division, &schedule, team) {
                        Ok((path, events)) => {
                            info!("Generated {} ({} games)", path.display(), events);
                            summary.events += events;
                            summary.written.push(path);
                        }
                        Err(e) => {
                            error!("Error generating {}: {}", team, e);
                            summary.failures.push(TeamFailure {
                                division: division.name.clone(),
                                team: team.clone(),
                                error: e,
                            });
                        }
                    }
                }
            }
        }

        Ok(summary)
    }

    fn write_team_calendar(
        &self,
        season_id: &str,
        division: &Division,
        schedule: &Schedule,
        team: &str,
    ) -> ScrapeResult<(PathBuf, usize)> {
        let form = SearchForm {
            search_year: self.generated_at.year(),
            season_id,
            division_id: &division.id,
            schedule_id: &schedule.id,
            team,
        };
        let data = ScheduleFetcher::new(self.fetcher).fetch(&form)?;

        let builder = CalendarBuilder::new(team, self.config.arena.location(), self.timezone, self.generated_at);
        let calendar = builder.build(&data);
        if calendar.skipped > 0 {
            info!("Skipped {} unreadable rows for {}", calendar.skipped, team);
        }

        let path = self
            .config
            .publish
            .output_dir
            .join(calendar_file_name(&division.name, team));
        fs::write(&path, &calendar.document)?;
        Ok((path, calendar.events.len()))
    }
}
