use serde_json::{Value, json};
use spotlike::config::{AuthSession, Endpoints};
use spotlike::error::Error;
use spotlike::spotify::client::{AuthenticatedClient, TokenExchange};
use spotlike::spotify::like::{
    like_album_by_id, like_albums_by_artist, like_artist_by_id, like_track_by_id,
    like_tracks_by_album,
};
use spotlike::types::{ContentKind, Token};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Helper to build a client with a valid access token against the mock provider
fn client_for(provider: &MockServer) -> AuthenticatedClient {
    let session = AuthSession::new("client-id", "client-secret", "http://localhost:8080/callback");
    let endpoints = Endpoints {
        authorize_url: format!("{}/authorize", provider.uri()),
        token_url: format!("{}/api/token", provider.uri()),
        api_url: format!("{}/v1", provider.uri()),
    };
    TokenExchange::new(session, endpoints).client(Token {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        token_type: "bearer".to_string(),
        expires_at: None,
    })
}

fn album_json(id: &str, release_date: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Album {}", id),
        "release_date": release_date,
        "release_date_precision": "day",
        "album_type": "album",
        "artists": [{ "id": "artist", "name": "Artist" }]
    })
}

async fn mount_album(provider: &MockServer, id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/albums/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(album_json(id, "2010-01-01")))
        .mount(provider)
        .await;
}

async fn mount_contains(provider: &MockServer, route: &str, id: &str, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("ids", id))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(provider)
        .await;
}

async fn mount_save(provider: &MockServer, route: &str, id: &str, calls: u64) {
    Mock::given(method("PUT"))
        .and(path(route))
        .and(query_param("ids", id))
        .respond_with(ResponseTemplate::new(200))
        .expect(calls)
        .mount(provider)
        .await;
}

#[tokio::test]
async fn test_like_album_twice_skips_second_write() {
    let provider = MockServer::start().await;
    mount_album(&provider, "alb").await;

    // Not saved on the first check, saved afterwards
    Mock::given(method("GET"))
        .and(path("/v1/me/albums/contains"))
        .and(query_param("ids", "alb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([false])))
        .up_to_n_times(1)
        .mount(&provider)
        .await;
    mount_contains(&provider, "/v1/me/albums/contains", "alb", 200, json!([true])).await;
    mount_save(&provider, "/v1/me/albums", "alb", 1).await;

    let client = client_for(&provider);

    let first = like_album_by_id(&client, "alb", false).await.unwrap();
    assert_eq!(first.len(), 1);
    assert!(first[0].is_liked());
    assert!(!first[0].skipped);

    let second = like_album_by_id(&client, "alb", false).await.unwrap();
    assert_eq!(second.len(), 1);
    assert!(second[0].skipped);
    assert!(second[0].error.is_none());
}

#[tokio::test]
async fn test_force_skips_liked_check() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/tracks/trk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "trk", "name": "Reckoner", "artists": [{ "id": "artist", "name": "Artist" }]
        })))
        .mount(&provider)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/me/tracks/contains"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([true])))
        .expect(0)
        .mount(&provider)
        .await;
    mount_save(&provider, "/v1/me/tracks", "trk", 1).await;

    let results = like_track_by_id(&client_for(&provider), "trk", true)
        .await
        .unwrap();
    assert_eq!(results[0].kind, ContentKind::Track);
    assert!(results[0].is_liked());
}

#[tokio::test]
async fn test_like_artist_follows_when_not_following() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/artists/art"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "art", "name": "Radiohead"
        })))
        .mount(&provider)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/me/following/contains"))
        .and(query_param("type", "artist"))
        .and(query_param("ids", "art"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&provider)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/me/following"))
        .and(query_param("type", "artist"))
        .and(query_param("ids", "art"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&provider)
        .await;

    // An empty membership answer counts as not following
    let results = like_artist_by_id(&client_for(&provider), "art", false)
        .await
        .unwrap();
    assert_eq!(results[0].kind, ContentKind::Artist);
    assert_eq!(results[0].name, "Radiohead");
    assert!(results[0].is_liked());
}

#[tokio::test]
async fn test_like_albums_by_artist_isolates_failures_in_release_order() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/artists/art"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "art", "name": "Artist"
        })))
        .mount(&provider)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/artists/art/albums"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                album_json("newest", "2020-01-01"),
                album_json("tie_first", "2010-05-05"),
                album_json("oldest", "2001"),
                album_json("tie_second", "2010-05-05")
            ],
            "next": null
        })))
        .mount(&provider)
        .await;

    let contains = "/v1/me/albums/contains";
    mount_contains(&provider, contains, "oldest", 200, json!([true])).await;
    mount_contains(&provider, contains, "tie_first", 500, json!({ "error": "boom" })).await;
    mount_contains(&provider, contains, "tie_second", 200, json!([false])).await;
    mount_contains(&provider, contains, "newest", 200, json!([false])).await;

    mount_save(&provider, "/v1/me/albums", "oldest", 0).await;
    mount_save(&provider, "/v1/me/albums", "tie_first", 0).await;
    mount_save(&provider, "/v1/me/albums", "tie_second", 1).await;
    mount_save(&provider, "/v1/me/albums", "newest", 1).await;

    let results = like_albums_by_artist(&client_for(&provider), "art", false)
        .await
        .unwrap();

    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["oldest", "tie_first", "tie_second", "newest"]);

    assert!(results[0].skipped);
    assert!(matches!(
        results[1].error,
        Some(Error::Http { status, .. }) if status == 500
    ));
    assert!(results[2].is_liked());
    assert!(results[3].is_liked());
}

#[tokio::test]
async fn test_like_tracks_by_album_records_failed_writes_per_item() {
    let provider = MockServer::start().await;
    mount_album(&provider, "alb").await;
    Mock::given(method("GET"))
        .and(path("/v1/albums/alb/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "id": "t1", "name": "One", "artists": [] },
                { "id": "t2", "name": "Two", "artists": [] }
            ],
            "next": null
        })))
        .mount(&provider)
        .await;

    let contains = "/v1/me/tracks/contains";
    mount_contains(&provider, contains, "t1", 200, json!([false])).await;
    mount_contains(&provider, contains, "t2", 200, json!([false])).await;

    Mock::given(method("PUT"))
        .and(path("/v1/me/tracks"))
        .and(query_param("ids", "t1"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&provider)
        .await;
    mount_save(&provider, "/v1/me/tracks", "t2", 1).await;

    let results = like_tracks_by_album(&client_for(&provider), "alb", false)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results[0].error.is_some());
    assert!(results[1].is_liked());
}

#[tokio::test]
async fn test_unknown_root_entity_fails_whole_call() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/artists/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&provider)
        .await;

    let err = like_albums_by_artist(&client_for(&provider), "missing", false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Http { status, .. } if status == 404));
}
