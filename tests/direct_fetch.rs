//! Direct resource fetch integration tests
//!
//! Covers the non-paginated fetch modes: the dedicated `__a=1` JSON endpoints
//! and the HTML variant that descends the config embedded in a profile page.

mod common;

use common::helpers;
use fusia::{Error, Fusia};
use mockito::{Matcher, Server};
use tempfile::TempDir;

async fn logged_in_client(server: &mut Server, dir: &TempDir) -> Fusia {
    let _home = server
        .mock("GET", "/")
        .with_body(helpers::homepage_body(Some(helpers::USERNAME), "tok", 5))
        .create_async()
        .await;

    let mut client = helpers::test_client(&server.url(), dir);
    client.login().await.unwrap();
    client
}

#[tokio::test]
async fn test_fetch_user_raw_uses_the_json_endpoint() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let client = helpers::test_client(&server.url(), &dir);

    let profile = server
        .mock("GET", "/someuser/")
        .match_query(Matcher::UrlEncoded("__a".into(), "1".into()))
        .with_body(r#"{"graphql": {"user": {"id": "42", "username": "someuser"}}}"#)
        .expect(1)
        .create_async()
        .await;

    // Profiles are readable without a session.
    let user = client.fetch_user("someuser", true).await.unwrap();
    assert_eq!(user["id"], "42");
    assert_eq!(user["username"], "someuser");
    profile.assert_async().await;
}

#[tokio::test]
async fn test_fetch_user_html_descends_the_embedded_config() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let client = helpers::test_client(&server.url(), &dir);

    let body = "<html><body><script type=\"text/javascript\">\
                window._sharedData = {\"config\":{\"csrf_token\":\"tok\"},\
                \"entry_data\":{\"ProfilePage\":[{\"graphql\":\
                {\"user\":{\"id\":\"7\",\"username\":\"someuser\"}}}]}};\
                </script></body></html>";
    let profile = server
        .mock("GET", "/someuser/")
        .with_body(body)
        .expect(1)
        .create_async()
        .await;

    let user = client.fetch_user("someuser", false).await.unwrap();
    assert_eq!(user["id"], "7");
    profile.assert_async().await;
}

#[tokio::test]
async fn test_fetch_user_html_without_config_is_not_found() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let client = helpers::test_client(&server.url(), &dir);

    let _profile = server
        .mock("GET", "/someuser/")
        .with_body("<html><body>checkpoint page, nothing embedded</body></html>")
        .create_async()
        .await;

    let err = client.fetch_user("someuser", false).await.unwrap_err();
    assert!(matches!(err, Error::NotFound));
}

#[tokio::test]
async fn test_fetch_user_html_with_wrong_shape_is_not_found() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let client = helpers::test_client(&server.url(), &dir);

    // Config parses but carries no profile entry (e.g. a login wall).
    let _profile = server
        .mock("GET", "/someuser/")
        .with_body(
            "<html><body><script>window._sharedData = \
             {\"config\":{\"csrf_token\":\"tok\"},\"entry_data\":{\"LoginAndSignupPage\":[]}};\
             </script></body></html>",
        )
        .create_async()
        .await;

    let err = client.fetch_user("someuser", false).await.unwrap_err();
    assert!(matches!(err, Error::NotFound));
}

#[tokio::test]
async fn test_media_info_fetches_the_json_variant() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let client = logged_in_client(&mut server, &dir).await;

    let media = server
        .mock("GET", "/p/BShortCode/")
        .match_query(Matcher::UrlEncoded("__a".into(), "1".into()))
        .match_header("x-csrftoken", "tok")
        .match_header("x-instagram-ajax", "5")
        .with_body(r#"{"graphql": {"shortcode_media": {"id": "m1", "is_video": false}}}"#)
        .expect(1)
        .create_async()
        .await;

    let info = client.media_info("BShortCode").await.unwrap();
    assert_eq!(info["id"], "m1");
    media.assert_async().await;
}

#[tokio::test]
async fn test_media_info_requires_a_session() {
    let server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let client = helpers::test_client(&server.url(), &dir);

    let err = client.media_info("BShortCode").await.unwrap_err();
    assert!(matches!(err, Error::Session(_)));
}
