//! Google Play Music adapter tests against a mock `sj/v2.5` server.

use plsync::{
    builder::{self, MutationBatch},
    error::SyncError,
    gpm::GpmClient,
    resolver::Resolver,
    service::MusicService,
    types::{Credential, Song},
};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn credential() -> Credential {
    Credential::new("gpm-token")
}

fn track_entry(store_id: &str, title: &str) -> Value {
    json!({
        "type": "1",
        "track": {
            "title": title,
            "artist": "Artist X",
            "album": "Album",
            "storeId": store_id
        }
    })
}

/// Answers a mutation batch with one OK per mutation.
fn all_ok(request: &Request) -> ResponseTemplate {
    let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
    let count = body["mutations"].as_array().map(Vec::len).unwrap_or(0);
    let responses: Vec<Value> = (0..count)
        .map(|i| json!({"id": format!("entry-{}", i), "response_code": "OK"}))
        .collect();
    ResponseTemplate::new(200).set_body_json(json!({ "mutate_response": responses }))
}

fn last_body(requests: &[Request], wanted: &str) -> Value {
    let request = requests
        .iter()
        .rev()
        .find(|r| r.url.path() == wanted)
        .expect("request to path");
    serde_json::from_slice(&request.body).expect("json body")
}

mod create_playlist {
    use super::*;

    #[tokio::test]
    async fn test_sends_exact_mutation() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/playlistbatch"))
            .and(query_param("tier", "aa"))
            .and(query_param("hl", "en_US"))
            .and(query_param("dv", "0"))
            .and(query_param("alt", "json"))
            .and(header("authorization", "GoogleLogin auth=gpm-token"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "mutate_response": [{"id": "pl123", "response_code": "OK"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GpmClient::with_base_url(mock_server.uri());
        let id = client
            .create_playlist(&credential(), "Road Trip", "Songs for the car")
            .await
            .expect("create");
        assert_eq!(id, "pl123");

        let requests = mock_server.received_requests().await.expect("recording");
        let body = last_body(&requests, "/playlistbatch");
        assert_eq!(
            body,
            json!({
                "mutations": [{
                    "create": {
                        "creationTimestamp": "-1",
                        "deleted": false,
                        "lastModifiedTimestamp": "0",
                        "name": "Road Trip",
                        "description": "Songs for the car",
                        "type": "USER_GENERATED",
                        "shareState": "PUBLIC"
                    }
                }]
            })
        );
    }

    #[tokio::test]
    async fn test_http_error_keeps_status_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/playlistbatch"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Token expired"))
            .mount(&mock_server)
            .await;

        let client = GpmClient::with_base_url(mock_server.uri());
        let result = client.create_playlist(&credential(), "Mix", "").await;

        match result {
            Err(SyncError::Transport {
                path,
                status,
                message,
            }) => {
                assert_eq!(path, "playlistbatch");
                assert_eq!(status, Some(401));
                assert!(message.contains("Token expired"));
            }
            other => panic!("Expected Transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/playlistbatch"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
            .mount(&mock_server)
            .await;

        let client = GpmClient::with_base_url(mock_server.uri());
        let result = client.create_playlist(&credential(), "Mix", "").await;

        assert!(matches!(result, Err(SyncError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_rejected_create() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/playlistbatch"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "mutate_response": [{"id": "", "response_code": "INVALID_REQUEST"}]
            })))
            .mount(&mock_server)
            .await;

        let client = GpmClient::with_base_url(mock_server.uri());
        let err = client
            .create_playlist(&credential(), "Mix", "")
            .await
            .expect_err("rejected");

        assert!(err.to_string().contains("INVALID_REQUEST"));
    }
}

mod search {
    use super::*;

    #[tokio::test]
    async fn test_search_params_and_candidates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("q", "Artist X - Song A"))
            .and(query_param("max-results", "10"))
            .and(query_param("ct", "1"))
            .and(query_param("tier", "aa"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "entries": [
                    {"type": "3"},
                    track_entry("Tsong-a", "Song A")
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GpmClient::with_base_url(mock_server.uri());
        let result = client
            .search_track(&credential(), "Artist X - Song A")
            .await
            .expect("search");

        assert!(result.suggested_query.is_none());
        assert_eq!(result.candidates.len(), 2);
        assert_eq!(result.candidates[1].external_id, "Tsong-a");
    }

    #[tokio::test]
    async fn test_resolver_follows_suggestion() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("q", "Artsit X - Song A"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "suggestedQuery": "Artist X - Song A",
                "entries": [track_entry("Twrong", "Something Else")]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("q", "Artist X - Song A"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "entries": [track_entry("Tright", "Song A")]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let service = MusicService::Gpm(GpmClient::with_base_url(mock_server.uri()));
        let resolver = Resolver::new(service, credential());
        let song = Song::new("Song A", "Album", &["Artsit X"]);

        assert_eq!(resolver.resolve(&song).await.expect("resolve"), "Tright");
    }

    #[tokio::test]
    async fn test_resolver_gives_up_on_endless_suggestions() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(|request: &Request| {
                let q = request
                    .url
                    .query_pairs()
                    .find(|(k, _)| k == "q")
                    .map(|(_, v)| v.into_owned())
                    .unwrap_or_default();
                ResponseTemplate::new(200).set_body_json(json!({
                    "suggestedQuery": format!("{} again", q),
                    "entries": []
                }))
            })
            .mount(&mock_server)
            .await;

        let service = MusicService::Gpm(GpmClient::with_base_url(mock_server.uri()));
        let resolver = Resolver::new(service, credential()).with_suggestion_rounds(3);
        let song = Song::new("Loop", "Album", &["Echo"]);

        match resolver.resolve(&song).await {
            Err(SyncError::AmbiguousQuery { rounds, .. }) => assert_eq!(rounds, 3),
            other => panic!("Expected AmbiguousQuery, got {:?}", other),
        }

        let requests = mock_server.received_requests().await.expect("recording");
        assert_eq!(requests.len(), 4);
    }

    #[tokio::test]
    async fn test_repeated_suggestion_uses_current_entries() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "suggestedQuery": "Echo - Loop",
                "entries": [track_entry("Tloop", "Loop")]
            })))
            .mount(&mock_server)
            .await;

        let service = MusicService::Gpm(GpmClient::with_base_url(mock_server.uri()));
        let resolver = Resolver::new(service, credential());
        let song = Song::new("Loop", "Album", &["Echo"]);

        assert_eq!(resolver.resolve(&song).await.expect("resolve"), "Tloop");
        let requests = mock_server.received_requests().await.expect("recording");
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn test_no_track_candidate_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "entries": [{"type": "2"}, {"type": "3"}]
            })))
            .mount(&mock_server)
            .await;

        let service = MusicService::Gpm(GpmClient::with_base_url(mock_server.uri()));
        let resolver = Resolver::new(service, credential());
        let song = Song::new("Song B", "Album", &[]);

        let err = resolver.resolve(&song).await.expect_err("not found");
        assert!(err.is_not_found());
    }
}

mod add_tracks {
    use super::*;

    #[tokio::test]
    async fn test_chain_payload() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/plentriesbatch"))
            .and(query_param("alt", "json"))
            .and(header("authorization", "GoogleLogin auth=gpm-token"))
            .respond_with(all_ok)
            .expect(1)
            .mount(&mock_server)
            .await;

        let service = MusicService::Gpm(GpmClient::with_base_url(mock_server.uri()));
        let batch = MutationBatch::build(
            "pl123",
            vec![
                Ok("Tstore".to_string()),
                Ok("lib-1".to_string()),
                Ok("Tlast".to_string()),
            ],
        );
        let outcome = builder::submit(&service, &credential(), batch).await;

        assert_eq!(outcome.added, 3);
        assert!(outcome.errors.is_empty());

        let requests = mock_server.received_requests().await.expect("recording");
        let body = last_body(&requests, "/plentriesbatch");
        let mutations = body["mutations"].as_array().expect("mutations");
        assert_eq!(mutations.len(), 3);

        let first = &mutations[0]["create"];
        let middle = &mutations[1]["create"];
        let last = &mutations[2]["create"];

        assert!(first.get("precedingEntryId").is_none());
        assert_eq!(first["followingEntryId"], middle["clientId"]);
        assert_eq!(middle["precedingEntryId"], first["clientId"]);
        assert_eq!(middle["followingEntryId"], last["clientId"]);
        assert_eq!(last["precedingEntryId"], middle["clientId"]);
        assert!(last.get("followingEntryId").is_none());

        assert_eq!(first["source"], 2);
        assert_eq!(middle["source"], 1);
        assert_eq!(first["trackId"], "Tstore");
        assert_eq!(first["playlistId"], "pl123");
        assert_eq!(first["creationTimestamp"], "-1");
        assert_eq!(first["lastModifiedTimestamp"], "0");
        assert_eq!(first["deleted"], false);
    }

    #[tokio::test]
    async fn test_rejected_entries_are_collected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/plentriesbatch"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "mutate_response": [
                    {"id": "e1", "response_code": "OK"},
                    {"id": "e2", "response_code": "INVALID_REQUEST"},
                    {"id": "e3", "response_code": "OK"}
                ]
            })))
            .mount(&mock_server)
            .await;

        let service = MusicService::Gpm(GpmClient::with_base_url(mock_server.uri()));
        let batch = MutationBatch::build(
            "pl123",
            vec![
                Ok("T1".to_string()),
                Ok("T2".to_string()),
                Ok("T3".to_string()),
            ],
        );
        let outcome = builder::submit(&service, &credential(), batch).await;

        assert_eq!(outcome.added, 2);
        assert_eq!(outcome.errors.len(), 1);
        match &outcome.errors[0] {
            SyncError::Rejected { track_id, code } => {
                assert_eq!(track_id, "T2");
                assert_eq!(code, "INVALID_REQUEST");
            }
            other => panic!("Expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_batch_sends_nothing() {
        let mock_server = MockServer::start().await;

        let service = MusicService::Gpm(GpmClient::with_base_url(mock_server.uri()));
        let batch = MutationBatch::build("pl123", Vec::new());
        let outcome = builder::submit(&service, &credential(), batch).await;

        assert_eq!(outcome.added, 0);
        assert!(outcome.errors.is_empty());
        let requests = mock_server.received_requests().await.expect("recording");
        assert!(requests.is_empty());
    }

    #[tokio::test]
    async fn test_failed_request_is_one_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/plentriesbatch"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&mock_server)
            .await;

        let service = MusicService::Gpm(GpmClient::with_base_url(mock_server.uri()));
        let batch = MutationBatch::build(
            "pl123",
            vec![Ok("T1".to_string()), Ok("T2".to_string())],
        );
        let outcome = builder::submit(&service, &credential(), batch).await;

        assert_eq!(outcome.added, 0);
        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(
            outcome.errors[0],
            SyncError::Transport {
                status: Some(500),
                ..
            }
        ));
    }
}

mod unsupported {
    use super::*;

    #[tokio::test]
    async fn test_listing_is_unsupported() {
        let mock_server = MockServer::start().await;
        let service = MusicService::Gpm(GpmClient::with_base_url(mock_server.uri()));

        let result = service.list_playlists(&credential(), 0, 50).await;
        assert!(matches!(result, Err(SyncError::Unsupported { .. })));
    }
}
