use std::time::Duration;

use tracing::debug;

use crate::{
    config::ScraperConfig,
    error::{ScrapeError, ScrapeResult},
};

pub const SEASONS_PATH: &str = "/ajax_update.php";
pub const DIVISIONS_PATH: &str = "/getdivision.php";
pub const SCHEDULES_PATH: &str = "/sspanel/getSchedule.php";
pub const TEAMS_PATH: &str = "/sspanel/getTeam.php";
pub const SEARCH_PATH: &str = "/schedules.html";

/// Blocking access to the league site. Paths are relative to the site's base URL.
pub trait Fetcher {
    fn get(&self, path: &str, query: &[(&str, String)]) -> ScrapeResult<String>;

    fn post_form(&self, path: &str, form: &[(&str, String)]) -> ScrapeResult<String>;
}

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(&config.scraping.user_agent)
            .timeout(Duration::from_secs(config.scraping.request_timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: config.site.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn read_body(url: String, response: reqwest::Result<reqwest::blocking::Response>) -> ScrapeResult<String> {
        let response = response.map_err(|source| ScrapeError::Transport { url: url.clone(), source })?;

        if !response.status().is_success() {
            return Err(ScrapeError::Status {
                url,
                status: response.status(),
            });
        }

        let text = response
            .text()
            .map_err(|source| ScrapeError::Transport { url: url.clone(), source })?;
        debug!("Got response from {} ({} bytes)", url, text.len());
        Ok(text)
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, path: &str, query: &[(&str, String)]) -> ScrapeResult<String> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, query);
        let response = self.client.get(&url).query(query).send();
        Self::read_body(url, response)
    }

    fn post_form(&self, path: &str, form: &[(&str, String)]) -> ScrapeResult<String> {
        let url = self.url(path);
        debug!("POST {} {:?}", url, form);
        let response = self.client.post(&url).form(form).send();
        Self::read_body(url, response)
    }
}
