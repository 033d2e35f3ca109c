use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, env, fs, path::Path, path::PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
    pub fallback_season_id: String,
    /// Season names accepted by the resolver, compared case-insensitively.
    pub valid_seasons: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://plainvillearena.com".to_string(),
            fallback_season_id: "95".to_string(),
            valid_seasons: ["winter", "spring", "summer", "fall"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl SiteConfig {
    pub fn is_valid_season(&self, name: &str) -> bool {
        let name = name.trim().to_lowercase();
        self.valid_seasons.iter().any(|s| s.to_lowercase() == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ArenaConfig {
    pub name: String,
    pub address: String,
    pub timezone: String,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            name: "Plainville Indoor Sports Arena".to_string(),
            address: "161 Woodford Ave Ste 59, Plainville, CT 06062, USA".to_string(),
            timezone: "America/New_York".to_string(),
        }
    }
}

impl ArenaConfig {
    pub fn location(&self) -> String {
        format!("{}, {}", self.name, self.address)
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("Invalid arena timezone {:?}: {}", self.timezone, e))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PublishConfig {
    pub base_url: String,
    pub output_dir: PathBuf,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            base_url: "https://iansym.github.io/pisa_ical".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScrapingConfig {
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// Fail a listing when its paired field lists differ in length instead of truncating.
    pub strict_pairing: bool,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (compatible; PisaIcal/1.0)".to_string(),
            request_timeout_secs: 30,
            strict_pairing: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScraperConfig {
    pub site: SiteConfig,
    /// Division name to team names. An empty list selects every team in the division.
    pub targets: BTreeMap<String, Vec<String>>,
    pub arena: ArenaConfig,
    pub publish: PublishConfig,
    pub scraping: ScrapingConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        let mut targets = BTreeMap::new();
        targets.insert("F1R".to_string(), vec!["HOOLIGANS".to_string()]);
        targets.insert("F2".to_string(), vec!["SCREAMING MONKEYS".to_string()]);

        Self {
            site: SiteConfig::default(),
            targets,
            arena: ArenaConfig::default(),
            publish: PublishConfig::default(),
            scraping: ScrapingConfig::default(),
        }
    }
}

impl ScraperConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Defaults, then the optional JSON file, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_env_overrides();
        config.arena.tz()?;
        Ok(config)
    }

    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base_url) = env::var("PISA_BASE_URL") {
            self.site.base_url = base_url;
        }
        if let Ok(publish_url) = env::var("PISA_PUBLISH_URL") {
            self.publish.base_url = publish_url;
        }
        if let Ok(output_dir) = env::var("PISA_OUTPUT_DIR") {
            self.publish.output_dir = PathBuf::from(output_dir);
        }
        if let Ok(user_agent) = env::var("SCRAPER_USER_AGENT") {
            self.scraping.user_agent = user_agent;
        }
        if let Ok(Some(timeout)) = env::var("SCRAPER_TIMEOUT_SECS").map_or(Ok(None), |t| t.parse::<u64>().map(Some)) {
            self.scraping.request_timeout_secs = timeout;
        }

        self
    }

    /// Team allow-list for a division, or `None` when the division is not tracked.
    pub fn teams_for(&self, division: &str) -> Option<&[String]> {
        self.targets.get(division).map(Vec::as_slice)
    }

    pub fn wants_team(&self, division: &str, team: &str) -> bool {
        match self.teams_for(division) {
            Some([]) => true,
            Some(teams) => teams.iter().any(|t| t == team),
            None => false,
        }
    }
}
