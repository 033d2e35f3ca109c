//! The static `index.html` listing every generated calendar.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::{debug, info};

pub const INDEX_FILE: &str = "index.html";
const GOOGLE_SUBSCRIBE_URL: &str = "https://calendar.google.com/calendar/render?cid=";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CalendarFile {
    pub division: String,
    pub team: String,
    pub file_name: String,
}

pub fn calendar_file_name(division: &str, team: &str) -> String {
    format!("{}_{}.ics", division, team.replace(' ', "_"))
}

/// Inverse of [`calendar_file_name`]: splits on the first underscore.
pub fn parse_file_name(file_name: &str) -> Option<CalendarFile> {
    let stem = file_name.strip_suffix(".ics")?;
    let (division, team) = stem.split_once('_')?;
    if division.is_empty() || team.is_empty() {
        return None;
    }

    Some(CalendarFile {
        division: division.to_string(),
        team: team.replace('_', " "),
        file_name: file_name.to_string(),
    })
}

pub fn scan_calendars(dir: &Path) -> std::io::Result<Vec<CalendarFile>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        match name.to_str().and_then(parse_file_name) {
            Some(file) => files.push(file),
            None => debug!("Ignoring {:?}", name),
        }
    }
    files.sort();
    Ok(files)
}

pub fn group_by_division(files: Vec<CalendarFile>) -> BTreeMap<String, Vec<CalendarFile>> {
    let mut groups: BTreeMap<String, Vec<CalendarFile>> = BTreeMap::new();
    for file in files {
        groups.entry(file.division.clone()).or_default().push(file);
    }
    groups
}

/// Links for one published calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeLinks {
    pub download: String,
    pub webcal: String,
    pub google: String,
}

impl SubscribeLinks {
    pub fn new(publish_url: &str, file_name: &str) -> Self {
        let download = format!(
            "{}/{}",
            publish_url.trim_end_matches('/'),
            urlencoding::encode(file_name)
        );
        let webcal = match download.split_once("://") {
            Some((_, rest)) => format!("webcal://{}", rest),
            None => format!("webcal://{}", download),
        };
        let google = format!("{}{}", GOOGLE_SUBSCRIBE_URL, urlencoding::encode(&webcal));

        Self {
            download,
            webcal,
            google,
        }
    }
}

pub fn render_index(groups: &BTreeMap<String, Vec<CalendarFile>>, publish_url: &str) -> String {
    let mut html = String::from(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>Plainville Arena Team Calendars</title>
</head>
<body>
    <h1>Plainville Arena Team Calendars</h1>
    <p>Subscribe to a team's calendar to keep its game schedule up to date.</p>
"#,
    );

    if groups.is_empty() {
        html.push_str("    <p>No calendars have been generated yet.</p>\n");
    }

    for (division, files) in groups {
        html.push_str(&format!(
            "    <section class=\"division\">\n        <h2>{} Division</h2>\n",
            encode_text(division)
        ));
        for file in files {
            let links = SubscribeLinks::new(publish_url, &file.file_name);
            html.push_str(&format!(
                r#"        <div class="team">
            <h3>{team}</h3>
            <a href="{download}">Download</a> |
            <a href="{webcal}">Subscribe</a> |
            <a href="{google}">Add to Google Calendar</a>
            <p><code>{subscribe}</code></p>
        </div>
"#,
                team = encode_text(&file.team),
                download = encode_double_quoted_attribute(&links.download),
                webcal = encode_double_quoted_attribute(&links.webcal),
                google = encode_double_quoted_attribute(&links.google),
                subscribe = encode_text(&links.download),
            ));
        }
        html.push_str("    </section>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Rebuilds `index.html` in `dir` from the calendars already there.
pub fn write_index(dir: &Path, publish_url: &str) -> std::io::Result<PathBuf> {
    let files = scan_calendars(dir)?;
    let count = files.len();
    let groups = group_by_division(files);
    let path = dir.join(INDEX_FILE);
    fs::write(&path, render_index(&groups, publish_url))?;
    info!(
        "Wrote {} with {} calendars in {} divisions",
        path.display(),
        count,
        groups.len()
    );
    Ok(path)
}
