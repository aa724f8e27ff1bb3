use chrono::{DateTime, TimeZone, Utc};
use httpmock::prelude::*;
use std::time::Duration;
use sysconf_tracker::adapters::http::build_client;
use sysconf_tracker::adapters::search::build_search_provider;
use sysconf_tracker::domain::model::{CfpOutput, DateOutput, TBA};
use sysconf_tracker::{CfpPipeline, HttpFetcher, LocalStorage, TrackerConfig, TrackerEngine};
use tempfile::TempDir;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap()
}

fn offline_config() -> TrackerConfig {
    let mut config = TrackerConfig::default();
    config.tracker.input_path = "conferences.json".to_string();
    config.tracker.output_dir = "generated".to_string();
    config.tracker.request_delay_ms = 0;
    config.search.engine = "none".to_string();
    config.templates.urls.clear();
    config.known_homepages.0.clear();
    config
}

fn build_engine(
    temp_dir: &TempDir,
    config: TrackerConfig,
) -> TrackerEngine<CfpPipeline<LocalStorage, TrackerConfig>> {
    let client = build_client("sysconf-tracker-test", Duration::from_secs(5)).unwrap();
    let search = build_search_provider(&config.search.engine, None, 5, client.clone()).unwrap();
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap());

    TrackerEngine::new(CfpPipeline::new(
        storage,
        config,
        Box::new(HttpFetcher::new(client)),
        search,
        now(),
    ))
}

fn read_outputs(temp_dir: &TempDir) -> (Vec<CfpOutput>, Vec<DateOutput>) {
    let cfp = std::fs::read(temp_dir.path().join("generated/cfp.json")).unwrap();
    let dates = std::fs::read(temp_dir.path().join("generated/confdates.json")).unwrap();
    (
        serde_json::from_slice(&cfp).unwrap(),
        serde_json::from_slice(&dates).unwrap(),
    )
}

#[tokio::test]
async fn test_end_to_end_with_mock_conference_site() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();

    let home_mock = server.mock(|when, then| {
        when.method(GET).path("/osdi26/");
        then.status(200)
            .header("Content-Type", "text/html")
            .body(
                r#"<html><body>
<nav><a href="/osdi26/call-for-papers">Call for Papers</a></nav>
<p>Welcome to OSDI '26.</p>
</body></html>"#,
            );
    });
    let cfp_mock = server.mock(|when, then| {
        when.method(GET).path("/osdi26/call-for-papers");
        then.status(200)
            .header("Content-Type", "text/html")
            .body(
                r#"<html><head><script>var deadline = "1 January 2020";</script></head><body>
<p>The symposium is located in Seattle, WA, USA.</p>
<ul>
<li>Abstract registration: April 9, 2026</li>
<li>Full paper submission deadline: April 16, 2026</li>
</ul>
<h3>Conference dates</h3>
<p>July 13-15, 2026</p>
</body></html>"#,
            );
    });
    let missing_mock = server.mock(|when, then| {
        when.method(GET).path("/gone/");
        then.status(404);
    });

    let conferences = serde_json::json!([
        {"name": "OSDI", "core_rank": "A*", "base_url": server.url("/osdi26/")},
        {"name": "GONE", "core_rank": "B", "base_url": server.url("/gone/")}
    ]);
    std::fs::write(
        temp_dir.path().join("conferences.json"),
        serde_json::to_vec(&conferences).unwrap(),
    )
    .unwrap();

    let engine = build_engine(&temp_dir, offline_config());
    let paths = engine.run().await.unwrap();

    home_mock.assert();
    cfp_mock.assert();
    missing_mock.assert();
    assert_eq!(paths, vec!["generated/cfp.json", "generated/confdates.json"]);

    let (cfp, dates) = read_outputs(&temp_dir);
    assert_eq!(cfp.len(), 2);
    assert_eq!(dates.len(), 2);

    assert_eq!(cfp[0].name, "OSDI");
    assert_eq!(cfp[0].core_rank, "A*");
    assert_eq!(cfp[0].cfp_deadline, "April 16, 2026");
    assert_eq!(cfp[0].cfp_url, server.url("/osdi26/call-for-papers"));
    assert_eq!(cfp[0].note, "");
    assert_eq!(dates[0].location, "Seattle, WA, USA");
    assert_eq!(dates[0].conference_dates, "July 13, 2026 - July 15, 2026");

    assert_eq!(cfp[1].name, "GONE");
    assert_eq!(cfp[1].cfp_deadline, TBA);
    assert_eq!(cfp[1].cfp_url, TBA);
    assert_eq!(dates[1].location, TBA);
    assert_eq!(dates[1].conference_dates, TBA);
}

#[tokio::test]
async fn test_all_tba_outputs_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("conferences.json"),
        r#"[{"name": "HotOS", "core_rank": "B"}, {"name": "SoCC", "core_rank": "A"}]"#,
    )
    .unwrap();

    let engine = build_engine(&temp_dir, offline_config());
    engine.run().await.unwrap();

    let (cfp, dates) = read_outputs(&temp_dir);
    let names: Vec<&str> = cfp.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names, vec!["HotOS", "SoCC"]);

    for row in &cfp {
        assert_eq!(row.cfp_deadline, TBA);
        assert_eq!(row.cfp_url, TBA);
        assert_eq!(row.note, "");
    }
    for row in &dates {
        assert_eq!(row.conference_dates, TBA);
        assert_eq!(row.location, TBA);
        assert_eq!(row.conf_url, TBA);
    }

    let raw: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(temp_dir.path().join("generated/cfp.json")).unwrap(),
    )
    .unwrap();
    let keys: Vec<&String> = raw[0].as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 5);

    let rewritten = serde_json::to_string_pretty(&cfp).unwrap();
    let reparsed: Vec<CfpOutput> = serde_json::from_str(&rewritten).unwrap();
    assert_eq!(reparsed, cfp);
}

#[tokio::test]
async fn test_missing_input_fails_run() {
    let temp_dir = TempDir::new().unwrap();
    let engine = build_engine(&temp_dir, offline_config());

    let result = engine.run().await;
    assert!(matches!(
        result,
        Err(sysconf_tracker::TrackerError::InputError { .. })
    ));
    assert!(!temp_dir.path().join("generated/cfp.json").exists());
}
