use chrono::{TimeZone, Utc};
use mockito::{Matcher, Mock, Server, ServerGuard};
use pretty_assertions::assert_eq;
use std::fs;

use pisa_ical_scraper::{
    client::{Fetcher, HttpFetcher},
    config::ScraperConfig,
    error::FailureKind,
    runner::ScheduleRunner,
    types::SeasonChoice,
};

fn query(pairs: &[(&str, &str)]) -> Matcher {
    Matcher::AllOf(
        pairs
            .iter()
            .map(|(k, v)| Matcher::UrlEncoded(k.to_string(), v.to_string()))
            .collect(),
    )
}

fn mock_get(server: &mut ServerGuard, path: &str, pairs: &[(&str, &str)], body: &str) -> Mock {
    server
        .mock("GET", path)
        .match_query(query(pairs))
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(body)
        .create()
}

fn mock_search(server: &mut ServerGuard, team: &str, body: &str) -> Mock {
    server
        .mock("POST", "/schedules.html")
        .match_body(query(&[
            ("searchYear", "2026"),
            ("iSSSeasonId", "102"),
            ("vTeamName", team),
            ("btn_search_x", "54"),
            ("btn_search_y", "22"),
        ]))
        .with_status(200)
        .with_body(body)
        .create()
}

fn config_for(server: &ServerGuard, output_dir: &std::path::Path) -> ScraperConfig {
    let mut config = ScraperConfig::default();
    config.site.base_url = server.url();
    config.publish.output_dir = output_dir.to_path_buf();
    config.publish.base_url = "https://example.github.io/pisa_ical".to_string();
    config
}

#[test_log::test]
fn test_full_run_against_site() {
    let mut server = Server::new();
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&server, dir.path());

    let year_2026 = mock_get(
        &mut server,
        "/ajax_update.php",
        &[("ddname", "Year"), ("iYearId", "2026")],
        include_str!("fixtures/seasons_2026.xml"),
    );
    let year_2027 = server
        .mock("GET", "/ajax_update.php")
        .match_query(query(&[("iYearId", "2027")]))
        .with_status(503)
        .create();
    let year_2025 = mock_get(
        &mut server,
        "/ajax_update.php",
        &[("ddname", "Year"), ("iYearId", "2025")],
        include_str!("fixtures/seasons_2025.xml"),
    );
    let _divisions = mock_get(&mut server, "/getdivision.php", &[("seasonid", "102")], include_str!("fixtures/divisions_102.xml"));
    let _schedules_12 = mock_get(&mut server, "/sspanel/getSchedule.php", &[("divid", "12")], include_str!("fixtures/schedules_12.xml"));
    let _schedules_13 = mock_get(&mut server, "/sspanel/getSchedule.php", &[("divid", "13")], include_str!("fixtures/schedules_13.xml"));
    let _teams_12 = mock_get(
        &mut server,
        "/sspanel/getTeam.php",
        &[("divisionid", "12"), ("scheduleid", "500")],
        include_str!("fixtures/teams_12_500.xml"),
    );
    let _teams_13 = mock_get(
        &mut server,
        "/sspanel/getTeam.php",
        &[("divisionid", "13"), ("scheduleid", "600")],
        include_str!("fixtures/teams_13_600.xml"),
    );
    let playoff_teams = server
        .mock("GET", "/sspanel/getTeam.php")
        .match_query(query(&[("scheduleid", "501")]))
        .expect(0)
        .create();
    let hooligans = mock_search(&mut server, "HOOLIGANS", include_str!("fixtures/schedule_hooligans.csv"));
    let monkeys = mock_search(
        &mut server,
        "SCREAMING MONKEYS",
        include_str!("fixtures/schedule_screaming_monkeys.csv"),
    );

    let fetcher = HttpFetcher::new(&config).unwrap();
    let runner = ScheduleRunner::new(
        &fetcher,
        &config,
        chrono_tz::America::New_York,
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap(),
    );

    let season = runner.resolve_season();
    assert!(matches!(season, SeasonChoice::Found { year: 2025, .. }));
    assert_eq!(season.id(), "102");
    year_2026.assert();
    year_2027.assert();
    year_2025.assert();

    let summary = runner.run(Some(season.id().to_string())).unwrap();
    hooligans.assert();
    monkeys.assert();
    playoff_teams.assert();

    assert!(summary.failures.is_empty());
    assert_eq!(summary.skipped_playoffs, vec!["F1R PLAYOFFS".to_string()]);
    assert_eq!(summary.written.len(), 2);
    assert_eq!(summary.events, 4);

    let ics = fs::read_to_string(dir.path().join("F1R_HOOLIGANS.ics")).unwrap();
    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 3);
    assert!(ics.contains("UID:HOOLIGANS-2026-winter-0@plainville"));
    assert!(ics.contains("UID:HOOLIGANS-2026-winter-2@plainville"));
    assert!(ics.contains("UID:HOOLIGANS-2026-winter-4@plainville"));
    assert!(ics.contains("20250124T211500"));
    assert!(ics.contains("20250124T221500"));
    assert!(ics.contains("20250309T023000"));
    assert!(ics.contains("DESCRIPTION:winter Season - F1R Division"));

    let ics = fs::read_to_string(dir.path().join("F2_SCREAMING_MONKEYS.ics")).unwrap();
    assert!(ics.contains("PRODID:-//SCREAMING MONKEYS Schedule//EN"));
    assert!(ics.contains("SUMMARY:F2 - SCREAMING MONKEYS"));

    assert!(!dir.path().join("F1R_RAIDERS.ics").exists());
    assert!(!dir.path().join("F2_SHARKS.ics").exists());

    let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(index.contains("<h2>F1R Division</h2>"));
    assert!(index.contains("<h2>F2 Division</h2>"));
    assert!(index.contains("https://example.github.io/pisa_ical/F2_SCREAMING_MONKEYS.ics"));
    assert!(index.contains("webcal://example.github.io/pisa_ical/F1R_HOOLIGANS.ics"));
}

#[test]
fn test_season_falls_back_when_site_is_down() {
    let mut server = Server::new();
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&server, dir.path());

    let seasons = server
        .mock("GET", "/ajax_update.php")
        .match_query(Matcher::Any)
        .with_status(500)
        .expect(3)
        .create();

    let fetcher = HttpFetcher::new(&config).unwrap();
    let runner = ScheduleRunner::new(&fetcher, &config, chrono_tz::America::New_York, Utc::now());

    assert_eq!(runner.resolve_season(), SeasonChoice::Fallback("95".to_string()));
    seasons.assert();
}

#[test]
fn test_team_failure_does_not_stop_run() {
    let mut server = Server::new();
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&server, dir.path());

    let _divisions = mock_get(&mut server, "/getdivision.php", &[("seasonid", "102")], include_str!("fixtures/divisions_102.xml"));
    let _schedules_12 = mock_get(&mut server, "/sspanel/getSchedule.php", &[("divid", "12")], include_str!("fixtures/schedules_12.xml"));
    let _schedules_13 = mock_get(&mut server, "/sspanel/getSchedule.php", &[("divid", "13")], include_str!("fixtures/schedules_13.xml"));
    let _teams_12 = mock_get(
        &mut server,
        "/sspanel/getTeam.php",
        &[("divisionid", "12"), ("scheduleid", "500")],
        include_str!("fixtures/teams_12_500.xml"),
    );
    let _teams_13 = mock_get(
        &mut server,
        "/sspanel/getTeam.php",
        &[("divisionid", "13"), ("scheduleid", "600")],
        include_str!("fixtures/teams_13_600.xml"),
    );
    let _hooligans = server
        .mock("POST", "/schedules.html")
        .match_body(Matcher::UrlEncoded("vTeamName".to_string(), "HOOLIGANS".to_string()))
        .with_status(500)
        .create();
    let _monkeys = mock_search(
        &mut server,
        "SCREAMING MONKEYS",
        include_str!("fixtures/schedule_screaming_monkeys.csv"),
    );

    let fetcher = HttpFetcher::new(&config).unwrap();
    let runner = ScheduleRunner::new(
        &fetcher,
        &config,
        chrono_tz::America::New_York,
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap(),
    );

    let summary = runner.generate("102").unwrap();
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].team, "HOOLIGANS");
    assert_eq!(summary.failures[0].error.kind(), FailureKind::Transport);
    assert_eq!(summary.written.len(), 1);
    assert!(!dir.path().join("F1R_HOOLIGANS.ics").exists());
    assert!(dir.path().join("F2_SCREAMING_MONKEYS.ics").exists());
}

#[test]
fn test_http_status_is_reported() {
    let mut server = Server::new();
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&server, dir.path());
    let _divisions = server
        .mock("GET", "/getdivision.php")
        .match_query(Matcher::Any)
        .with_status(404)
        .create();

    let fetcher = HttpFetcher::new(&config).unwrap();
    let err = fetcher
        .get("/getdivision.php", &[("seasonid", "102".to_string())])
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Transport);
    assert!(err.to_string().contains("404"));
}
