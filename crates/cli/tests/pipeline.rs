use std::sync::Arc;

use serde_json::json;
use tmdbtrack_cli::pipeline::{Pipeline, RunRequest};
use tmdbtrack_cli::state::RunState;
use tmdbtrack_core::error::RunError;
use tmdbtrack_core::types::{MediaKind, SiteConfig, SiteSchema, parse_terms};
use tmdbtrack_metadata::resolver::{IdentityQuery, IdentityResolver};
use tmdbtrack_metadata::tmdb::TmdbClient;
use tmdbtrack_search::backend::HttpBackend;
use tmdbtrack_search::dispatch::Dispatcher;
use tmdbtrack_search::present::ScriptedSelector;
use tmdbtrack_search::registry::SiteRegistry;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn site(server: &MockServer, key: &str, name: &str) -> SiteConfig {
    SiteConfig {
        site_key: key.to_string(),
        name: name.to_string(),
        search_url: format!("{}/{}/api/torrents/filter", server.uri(), key.to_lowercase()),
        api_key: format!("{}-key", key.to_lowercase()),
        enabled: true,
        schema: SiteSchema::Unit3d,
    }
}

fn pipeline<'a>(
    tmdb: &MockServer,
    trackers: &MockServer,
    selector: &'a ScriptedSelector,
) -> Pipeline<'a, HttpBackend> {
    let client = TmdbClient::new("tmdb-key".into(), &format!("{}/3/", tmdb.uri())).unwrap();
    let registry = SiteRegistry::new(vec![
        site(trackers, "ATH", "Aither"),
        site(trackers, "BLU", "Blutopia"),
    ]);
    Pipeline::new(
        IdentityResolver::new(Arc::new(client)),
        Dispatcher::new(HttpBackend::new().unwrap()),
        registry,
        selector,
    )
}

fn torrents(items: &[(&str, &str)]) -> serde_json::Value {
    json!({
        "data": items.iter().map(|(name, kind)| json!({
            "attributes": {
                "name": name,
                "size": 32_212_254_720u64,
                "seeders": 25,
                "leechers": 1,
                "freeleech": "0%",
                "type": kind,
                "category": "Movie"
            }
        })).collect::<Vec<_>>()
    })
}

async fn mount_inception_details(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/3/movie/27205"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 27205,
            "title": "Inception",
            "release_date": "2010-07-15",
            "runtime": 148,
            "genres": [{ "id": 28, "name": "Action" }],
            "overview": "Cobb, a skilled thief, steals secrets from dreams."
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn title_search_disambiguates_then_reports_every_site() {
    console::set_colors_enabled(false);
    let tmdb = MockServer::start().await;
    let trackers = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .and(query_param("query", "Inception"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                { "id": 27205, "title": "Inception", "release_date": "2010-07-15" },
                { "id": 64956, "title": "Inception: The Cobol Job", "release_date": "2010-12-07" }
            ]
        })))
        .mount(&tmdb)
        .await;
    mount_inception_details(&tmdb).await;

    Mock::given(method("GET"))
        .and(path("/ath/api/torrents/filter"))
        .and(query_param("tmdbId", "27205"))
        .respond_with(ResponseTemplate::new(200).set_body_json(torrents(&[
            ("Inception 2010 1080p BluRay REMUX AVC DTS-HD MA 5.1-ATH", "Remux"),
            ("Inception 2010 1080p BluRay DD5.1 x264-ATH", "Encode"),
        ])))
        .expect(1)
        .mount(&trackers)
        .await;
    Mock::given(method("GET"))
        .and(path("/blu/api/torrents/filter"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&trackers)
        .await;

    let selector = ScriptedSelector::new([Some(0), None]);
    let request = RunRequest {
        query: IdentityQuery::ByName("Inception".into()),
        kind: MediaKind::Movie,
        terms: vec![],
    };
    let mut out: Vec<u8> = Vec::new();
    let summary = pipeline(&tmdb, &trackers, &selector)
        .run(&request, &mut out)
        .await
        .unwrap();

    assert_eq!(summary.identity.provider_id, 27205);
    assert_eq!(summary.sites_queried, 2);
    assert_eq!(summary.sites_succeeded, 1);
    assert_eq!(summary.sites_failed, 1);
    assert_eq!(summary.results, 2);
    assert!(summary.selected.is_none());
    assert_eq!(selector.prompts_shown(), 2);
    assert!(summary.states.contains(&RunState::Disambiguating));
    assert_eq!(summary.states.last(), Some(&RunState::Done));

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("2h 28m"));
    assert!(out.contains("Aither (ATH) Results"));
    assert!(out.contains("Missing Media Types"));
    assert!(out.contains("Failed Sites"));
    assert!(out.contains("Blutopia (BLU)"));
    assert!(!out.contains("No successful queries."));
}

#[tokio::test]
async fn id_lookup_with_terms_filters_results_and_auto_selects() {
    console::set_colors_enabled(false);
    let tmdb = MockServer::start().await;
    let trackers = MockServer::start().await;
    mount_inception_details(&tmdb).await;

    Mock::given(method("GET"))
        .and(path("/ath/api/torrents/filter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(torrents(&[
            ("Inception 2010 2160p UHD BluRay REMUX HDR HEVC-FLUX", "Remux"),
            ("Inception 2010 1080p BluRay x264-FLUX", "Encode"),
        ])))
        .mount(&trackers)
        .await;
    Mock::given(method("GET"))
        .and(path("/blu/api/torrents/filter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(torrents(&[(
            "Inception 2010 2160p UHD BluRay x265-W4NK3R",
            "Encode",
        )])))
        .mount(&trackers)
        .await;

    let selector = ScriptedSelector::default();
    let request = RunRequest {
        query: IdentityQuery::ById(27205),
        kind: MediaKind::Movie,
        terms: parse_terms("2160p^FLUX"),
    };
    let mut out: Vec<u8> = Vec::new();
    let summary = pipeline(&tmdb, &trackers, &selector)
        .run(&request, &mut out)
        .await
        .unwrap();

    assert_eq!(summary.results, 1);
    assert_eq!(summary.sites_succeeded, 1);
    assert_eq!(summary.sites_failed, 0);
    assert_eq!(selector.prompts_shown(), 0);
    assert_eq!(
        summary.states,
        vec![
            RunState::Init,
            RunState::ResolvingIdentity,
            RunState::Dispatching,
            RunState::Normalizing,
            RunState::Presenting,
            RunState::Reporting,
            RunState::Done,
        ]
    );
    let selected = summary.selected.unwrap();
    assert_eq!(selected.name, "Inception 2010 2160p UHD BluRay REMUX HDR HEVC-FLUX");

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("No results matching '2160p^FLUX' on: Blutopia (BLU)"));
    assert!(!out.contains("Missing Media Types"));
    assert!(out.contains("Selected:"));
}

#[tokio::test]
async fn unknown_title_aborts_before_any_site_is_queried() {
    let tmdb = MockServer::start().await;
    let trackers = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&tmdb)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(torrents(&[])))
        .expect(0)
        .mount(&trackers)
        .await;

    let selector = ScriptedSelector::default();
    let request = RunRequest {
        query: IdentityQuery::ByName("Qwxzv Plorb".into()),
        kind: MediaKind::Movie,
        terms: vec![],
    };
    let mut out: Vec<u8> = Vec::new();
    let err = pipeline(&tmdb, &trackers, &selector)
        .run(&request, &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, RunError::NotFound(_)));
    assert_ne!(err.exit_code(), 0);
    assert_eq!(selector.prompts_shown(), 0);
    assert!(out.is_empty());
}

#[tokio::test]
async fn rejected_api_key_is_a_provider_error() {
    let tmdb = MockServer::start().await;
    let trackers = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/3/movie/27205"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&tmdb)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&trackers)
        .await;

    let selector = ScriptedSelector::default();
    let request = RunRequest {
        query: IdentityQuery::ById(27205),
        kind: MediaKind::Movie,
        terms: vec![],
    };
    let err = pipeline(&tmdb, &trackers, &selector)
        .run(&request, &mut Vec::<u8>::new())
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::Provider(_)));
}

#[tokio::test]
async fn declining_every_candidate_ends_cleanly_without_dispatch() {
    let tmdb = MockServer::start().await;
    let trackers = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                { "id": 438631, "title": "Dune", "release_date": "2021-09-15" },
                { "id": 841, "title": "Dune", "release_date": "1984-12-14" }
            ]
        })))
        .mount(&tmdb)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&trackers)
        .await;

    let selector = ScriptedSelector::new([None]);
    let request = RunRequest {
        query: IdentityQuery::ByName("Dune".into()),
        kind: MediaKind::Movie,
        terms: vec![],
    };
    let err = pipeline(&tmdb, &trackers, &selector)
        .run(&request, &mut Vec::<u8>::new())
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::NoSelection));
    assert_eq!(err.exit_code(), 0);
}
