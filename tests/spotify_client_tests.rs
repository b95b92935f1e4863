//! Spotify adapter tests, mostly for the destination direction.

use plsync::{
    builder::{self, MutationBatch},
    resolver::Resolver,
    service::MusicService,
    spotify::SpotifyClient,
    types::{Credential, ItemType, Song},
};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credential() -> Credential {
    Credential::with_user("spotify-token", "u1")
}

fn search_track(name: &str, uri: &str) -> Value {
    json!({
        "name": name,
        "uri": uri,
        "album": {"name": "Album"},
        "artists": [{"name": "Artist X"}]
    })
}

#[tokio::test]
async fn test_current_user() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("authorization", "Bearer spotify-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "display_name": "Test User"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = SpotifyClient::with_base_url(format!("{}/", mock_server.uri()));
    let user = client.current_user(&credential()).await.expect("user");

    assert_eq!(user.id, "u1");
    assert_eq!(user.display_name.as_deref(), Some("Test User"));
}

#[tokio::test]
async fn test_search_candidates_are_tracks() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Artist X - Song A"))
        .and(query_param("type", "track"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tracks": {"items": [
                search_track("Song A", "spotify:track:aaa"),
                search_track("Song A (Live)", "spotify:track:bbb")
            ]}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = SpotifyClient::with_base_url(mock_server.uri());
    let result = client
        .search_track(&credential(), "Artist X - Song A")
        .await
        .expect("search");

    assert!(result.suggested_query.is_none());
    assert_eq!(result.candidates.len(), 2);
    assert!(result.candidates.iter().all(|c| c.item_type == ItemType::Track));

    let service = MusicService::Spotify(client);
    let resolver = Resolver::new(service, credential());
    let song = Song::new("Song A", "Album", &["Artist X"]);
    assert_eq!(
        resolver.resolve(&song).await.expect("resolve"),
        "spotify:track:aaa"
    );
}

#[tokio::test]
async fn test_create_playlist() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/u1/playlists"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "sp-pl",
            "name": "Road Trip"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = SpotifyClient::with_base_url(mock_server.uri());
    let id = client
        .create_playlist(&credential(), "Road Trip", "from gpm")
        .await
        .expect("create");
    assert_eq!(id, "sp-pl");

    let requests = mock_server.received_requests().await.expect("recording");
    let body: Value = serde_json::from_slice(&requests[0].body).expect("json body");
    assert_eq!(body["name"], "Road Trip");
    assert_eq!(body["public"], true);
}

#[tokio::test]
async fn test_add_tracks_in_chunks_of_100() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/playlists/sp-pl/tracks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "snapshot_id": "snap"
        })))
        .expect(3)
        .mount(&mock_server)
        .await;

    let service = MusicService::Spotify(SpotifyClient::with_base_url(mock_server.uri()));
    let resolved = (0..250)
        .map(|i| Ok(format!("spotify:track:{}", i)))
        .collect();
    let batch = MutationBatch::build("sp-pl", resolved);
    let outcome = builder::submit(&service, &credential(), batch).await;

    assert_eq!(outcome.added, 250);
    assert!(outcome.errors.is_empty());

    let requests = mock_server.received_requests().await.expect("recording");
    let sizes: Vec<usize> = requests
        .iter()
        .map(|r| {
            let body: Value = serde_json::from_slice(&r.body).expect("json body");
            body["uris"].as_array().map(Vec::len).unwrap_or(0)
        })
        .collect();
    assert_eq!(sizes, vec![100, 100, 50]);

    let first: Value = serde_json::from_slice(&requests[0].body).expect("json body");
    assert_eq!(first["uris"][0], "spotify:track:0");
}

#[tokio::test]
async fn test_failed_chunk_rejects_its_tracks() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/playlists/sp-pl/tracks"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid track uri"))
        .mount(&mock_server)
        .await;

    let service = MusicService::Spotify(SpotifyClient::with_base_url(mock_server.uri()));
    let batch = MutationBatch::build(
        "sp-pl",
        vec![Ok("spotify:track:a".to_string()), Ok("bogus".to_string())],
    );
    let outcome = builder::submit(&service, &credential(), batch).await;

    assert_eq!(outcome.added, 0);
    assert_eq!(outcome.errors.len(), 2);
    assert!(outcome.errors[1].to_string().contains("Invalid track uri"));
}
