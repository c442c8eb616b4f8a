use serde_json::json;
use tmdbtrack_core::types::{
    MediaIdentity, MediaKind, SearchQuery, SiteConfig, SiteOutcome, SiteSchema, parse_terms,
};
use tmdbtrack_search::backend::HttpBackend;
use tmdbtrack_search::dispatch::Dispatcher;
use tmdbtrack_search::present::ResultGroups;
use tmdbtrack_search::registry::SiteRegistry;
use tmdbtrack_search::report::OutcomeReporter;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn site(server: &MockServer, key: &str, schema: SiteSchema) -> SiteConfig {
    let route = match schema {
        SiteSchema::Unit3d => format!("/{}/api/torrents/filter", key.to_lowercase()),
        SiteSchema::BeyondHd => format!("/{}/api/torrents", key.to_lowercase()),
    };
    SiteConfig {
        site_key: key.to_string(),
        name: format!("{key} Tracker"),
        search_url: format!("{}{route}", server.uri()),
        api_key: format!("{}-key", key.to_lowercase()),
        enabled: true,
        schema,
    }
}

fn inception(terms: &str) -> SearchQuery {
    SearchQuery::new(
        MediaIdentity {
            kind: MediaKind::Movie,
            provider_id: 27205,
            title: "Inception".into(),
            year: Some(2010),
        },
        parse_terms(terms),
    )
}

fn unit3d_body(names: &[&str]) -> serde_json::Value {
    json!({
        "data": names.iter().map(|n| json!({
            "type": "torrent",
            "attributes": {
                "name": n,
                "size": 21_474_836_480u64,
                "seeders": 10,
                "leechers": 2,
                "freeleech": "0%",
                "type": "Encode",
                "category": "Movie"
            }
        })).collect::<Vec<_>>()
    })
}

#[tokio::test]
async fn two_sites_match_and_one_server_error_is_reported() {
    console::set_colors_enabled(false);
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ath/api/torrents/filter"))
        .and(query_param("tmdbId", "27205"))
        .and(header("authorization", "Bearer ath-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(unit3d_body(&[
            "Inception 2010 1080p BluRay DD5.1 x264-ATH",
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/blu/api/torrents/filter"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/bhd/api/torrents/bhd-key"))
        .and(body_json(json!({ "action": "search", "tmdb_id": "movie/27205" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status_code": 1,
            "success": true,
            "results": [
                { "name": "Inception 2010 2160p UHD BluRay REMUX-BHD", "size": 80_000_000_000u64,
                  "seeders": 30, "leechers": 1, "freeleech": 0, "type": "UHD Remux", "category": "Movies" }
            ]
        })))
        .mount(&server)
        .await;

    let registry = SiteRegistry::new(vec![
        site(&server, "ATH", SiteSchema::Unit3d),
        site(&server, "BHD", SiteSchema::BeyondHd),
        site(&server, "BLU", SiteSchema::Unit3d),
    ]);
    let query = inception("");
    let dispatcher = Dispatcher::new(HttpBackend::new().unwrap());
    let outcomes = dispatcher.dispatch(&query, &registry.list_enabled()).await;

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes.success_count(), 2);
    assert_eq!(
        outcomes.get("BLU"),
        Some(&SiteOutcome::Failure("HTTP 500 Internal Server Error".into()))
    );

    let groups = ResultGroups::from_outcomes(&outcomes);
    assert_eq!(groups.matched.len(), 2);
    assert_eq!(groups.failed.len(), 1);

    let out = OutcomeReporter::new(&registry).render(&groups, &query);
    assert!(out.contains("ATH Tracker (ATH) Results"));
    assert!(out.contains("BHD Tracker (BHD) Results"));
    assert!(out.contains("BLU Tracker (BLU)"));
    assert!(out.contains("HTTP 500 Internal Server Error"));
}

#[tokio::test]
async fn term_filtered_run_by_id_shows_only_matching_names() {
    console::set_colors_enabled(false);
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blu/api/torrents/filter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(unit3d_body(&[
            "Inception.2010.2160p.WEB-DL.DDP5.1.HDR.H.265-FLUX",
            "Inception.2010.2160p.BluRay.REMUX-OtherGroup",
            "Inception.2010.1080p.WEB-DL-FLUX",
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fnp/api/torrents/filter"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(unit3d_body(&["Inception.720p.HDTV-GRP"])),
        )
        .mount(&server)
        .await;

    let registry = SiteRegistry::new(vec![
        site(&server, "BLU", SiteSchema::Unit3d),
        site(&server, "FNP", SiteSchema::Unit3d),
    ]);
    let query = inception("2160p^FLUX");
    let outcomes = Dispatcher::new(HttpBackend::new().unwrap())
        .dispatch(&query, &registry.list_enabled())
        .await;

    let Some(SiteOutcome::Success(results)) = outcomes.get("BLU") else {
        panic!("BLU should match");
    };
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Inception.2010.2160p.WEB-DL.DDP5.1.HDR.H.265-FLUX");
    assert_eq!(outcomes.get("FNP"), Some(&SiteOutcome::EmptyMissingType));

    let out = OutcomeReporter::new(&registry)
        .render(&ResultGroups::from_outcomes(&outcomes), &query);
    assert!(!out.contains("Missing Media Types"));
    assert!(!out.contains("OtherGroup"));
}

#[tokio::test]
async fn unreachable_site_is_a_failure_not_a_panic() {
    let server = MockServer::start().await;
    let mut dead = site(&server, "OE", SiteSchema::Unit3d);
    // Nothing listens on port 9 on the loopback interface.
    dead.search_url = "http://127.0.0.1:9/api/torrents/filter".into();

    let registry = SiteRegistry::new(vec![dead]);
    let outcomes = Dispatcher::new(HttpBackend::new().unwrap())
        .dispatch(&inception(""), &registry.list_enabled())
        .await;
    assert!(matches!(outcomes.get("OE"), Some(SiteOutcome::Failure(_))));
}

#[tokio::test]
async fn failure_reasons_do_not_expose_api_keys() {
    let server = MockServer::start().await;
    let mut bhd = site(&server, "BHD", SiteSchema::BeyondHd);
    bhd.search_url = "http://127.0.0.1:9/api/torrents".into();
    bhd.api_key = "BHDSECRET".into();
    let mut oe = site(&server, "OE", SiteSchema::Unit3d);
    oe.search_url = "http://127.0.0.1:9/api/torrents/filter".into();
    oe.api_key = "OESECRET".into();

    let registry = SiteRegistry::new(vec![bhd, oe]);
    let query = inception("");
    let outcomes = Dispatcher::new(HttpBackend::new().unwrap())
        .dispatch(&query, &registry.list_enabled())
        .await;

    for key in ["BHD", "OE"] {
        let Some(SiteOutcome::Failure(reason)) = outcomes.get(key) else {
            panic!("{key} should fail");
        };
        assert!(!reason.contains("SECRET"), "{key}: {reason}");
    }

    let report = OutcomeReporter::new(&registry)
        .render(&ResultGroups::from_outcomes(&outcomes), &query);
    assert!(!report.contains("SECRET"));
}
