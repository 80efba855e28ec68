//! End-to-end enrichment against a mocked Spotify API.

use std::time::Duration;

use linernotes_core::model::InputRow;
use linernotes_core::Credentials;
use linernotes_etl::{EngineSettings, EnrichmentEngine, SessionManager, SessionSettings, SpotifyApi};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn connect(server: &MockServer) -> SpotifyApi {
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok"})))
        .mount(server)
        .await;

    let settings = SessionSettings {
        api_base_url: format!("{}/v1", server.uri()),
        token_url: format!("{}/api/token", server.uri()),
        request_timeout: Duration::from_secs(5),
        max_reauth_attempts: 3,
        default_retry_after: Duration::from_secs(1),
        transport_retries: 1,
    };
    let session = SessionManager::connect(Credentials::new("id", "secret"), settings)
        .await
        .unwrap();
    SpotifyApi::new(session)
}

fn track(id: &str, artist_id: &str) -> Value {
    json!({
        "id": id,
        "duration_ms": 245000,
        "popularity": 64,
        "explicit": false,
        "album": {"id": format!("alb-{id}"), "release_date": "2001-06-12"},
        "artists": [{"id": artist_id, "name": "Band"}]
    })
}

fn page(items: Vec<Value>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"tracks": {"items": items}}))
}

async fn mount_search(server: &MockServer, q: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("q", q))
        .and(query_param("type", "track"))
        .and(query_param("limit", "5"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn requests_to(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == request_path)
        .count()
}

#[tokio::test]
async fn test_batch_enrichment_end_to_end() {
    let server = MockServer::start().await;
    let api = connect(&server).await;

    mount_search(
        &server,
        "track:Song artist:Band",
        page(vec![track("t1", "a1"), track("t-other", "a9")]),
    )
    .await;
    mount_search(&server, "track:Other artist:Band", page(vec![track("t2", "a1")])).await;
    Mock::given(method("GET"))
        .and(path("/v1/artists/a1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "a1", "genres": ["pop", "k-pop"]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let rows = vec![
        InputRow::new("Song", "Band").with_track_id("yt1").with_source("history"),
        InputRow::new("Other", "Band").with_track_id("yt2").with_source("history"),
        InputRow::new("Song", "Band").with_track_id("yt3").with_source("history"),
    ];

    let mut engine = EnrichmentEngine::new(api, &EngineSettings::default());
    let report = engine.run(&rows).await.unwrap();

    assert_eq!(report.rows.len(), 3);
    let first = &report.rows[0];
    assert_eq!(first.source_track_id.as_deref(), Some("yt1"));
    assert_eq!(first.spotify_track_id, "t1");
    assert_eq!(first.spotify_artist_id.as_deref(), Some("a1"));
    assert_eq!(first.spotify_album_id.as_deref(), Some("alb-t1"));
    assert_eq!(first.release_year, "2001");
    assert_eq!(first.duration_seconds, Some(245.0));
    assert_eq!(first.genres.as_deref(), Some("pop, k-pop"));
    assert_eq!(report.rows[2].spotify_track_id, "t1");

    // Two distinct keys searched once each; one artist looked up once.
    assert_eq!(requests_to(&server, "/v1/search").await, 2);
    assert_eq!(report.stats.match_cache_size, 2);
    assert_eq!(report.stats.genre_cache_size, 1);
    assert_eq!(engine.api().session_stats().requests, 3);
}

#[tokio::test]
async fn test_fallback_search_and_negative_cache() {
    let server = MockServer::start().await;
    let api = connect(&server).await;

    mount_search(&server, "track:Girl! artist:Typo Band", page(vec![])).await;
    mount_search(&server, "track:Girl!", page(vec![track("t-fb", "a2")])).await;
    mount_search(&server, "track:Nothing artist:Nobody", page(vec![])).await;
    mount_search(&server, "track:Nothing", page(vec![])).await;
    Mock::given(method("GET"))
        .and(path("/v1/artists/a2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "a2"})))
        .mount(&server)
        .await;

    let rows = vec![
        InputRow::new("Girl!", "Typo Band"),
        InputRow::new("Nothing", "Nobody"),
        InputRow::new("Nothing", "Nobody"),
    ];

    let mut engine = EnrichmentEngine::new(api, &EngineSettings::default());
    let report = engine.run(&rows).await.unwrap();

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].spotify_track_id, "t-fb");
    assert!(report.rows[0].genres.is_none());
    assert_eq!(report.stats.unmatched, 2);
    assert_eq!(report.stats.fallback_searches, 2);
    // Primary + fallback for each distinct key; the repeat is cached.
    assert_eq!(requests_to(&server, "/v1/search").await, 4);
}

#[tokio::test]
async fn test_failed_artist_lookup_degrades_to_no_genres() {
    let server = MockServer::start().await;
    let api = connect(&server).await;

    mount_search(&server, "track:Song artist:Band", page(vec![track("t1", "a1")])).await;
    Mock::given(method("GET"))
        .and(path("/v1/artists/a1"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let rows = vec![InputRow::new("Song", "Band"), InputRow::new("Song", "Band")];
    let mut engine = EnrichmentEngine::new(api, &EngineSettings::default());
    let report = engine.run(&rows).await.unwrap();

    assert_eq!(report.rows.len(), 2);
    assert!(report.rows.iter().all(|r| r.genres.is_none()));
    assert_eq!(report.stats.genre_cache_size, 1);
}
