//! HTTP-level tests of the Graph API and Send API clients against a mock
//! server, pinning the request shapes the platform expects.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cellar_bot::bot_logic::models::{OutgoingMessage, QuickReply};
use cellar_bot::error::BotError;
use cellar_bot::messenger::{GraphApi, MessageDelivery, SendApi, UserProfileSource};

#[tokio::test]
async fn graph_lookup_requests_the_profile_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1234"))
        .and(query_param("fields", "first_name,last_name,profile_pic"))
        .and(query_param("access_token", "token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "first_name": "Peter",
            "last_name": "Johnstone",
            "profile_pic": "https://platform-lookaside.fbsbx.com/platform/profilepic/",
            "id": "1234"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let graph = GraphApi::new(&server.uri(), "token");
    let attributes = graph.retrieve(1234).await.unwrap();

    assert_eq!(attributes.first_name.as_deref(), Some("Peter"));
    assert_eq!(attributes.last_name.as_deref(), Some("Johnstone"));
    assert!(attributes.profile_pic_url.is_some());
}

#[tokio::test]
async fn graph_failure_surfaces_as_an_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let graph = GraphApi::new(&server.uri(), "token");
    let err = graph.retrieve(1234).await.unwrap_err();
    assert!(matches!(err, BotError::Api { status: 500, .. }));
}

#[tokio::test]
async fn delivery_posts_recipient_and_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/me/messages"))
        .and(query_param("access_token", "token"))
        .and(body_partial_json(json!({
            "recipient": {"id": "1234"},
            "message": {"text": "Hello there"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recipient_id": "1234",
            "message_id": "mid.1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let send = SendApi::new(&server.uri(), "token");
    send.deliver(1234, &OutgoingMessage::text_only("Hello there")).await.unwrap();
}

#[tokio::test]
async fn delivery_omits_the_quick_replies_key_when_there_are_none() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recipient_id": "1234",
            "message_id": "mid.1"
        })))
        .mount(&server)
        .await;

    let send = SendApi::new(&server.uri(), "token");
    send.deliver(1234, &OutgoingMessage::text_only("plain")).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body["message"].get("quick_replies").is_none());
}

#[tokio::test]
async fn delivery_includes_quick_replies_when_present() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "message": {
                "quick_replies": [{
                    "content_type": "text",
                    "title": "Yes please!",
                    "payload": "CREATE_ACCOUNT"
                }]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recipient_id": "1234",
            "message_id": "mid.2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let send = SendApi::new(&server.uri(), "token");
    let message = OutgoingMessage::with_quick_replies(
        "Would you like to create your account?",
        vec![QuickReply::text("Yes please!", "CREATE_ACCOUNT")],
    );
    send.deliver(1234, &message).await.unwrap();
}

#[tokio::test]
async fn send_api_rejection_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad recipient"))
        .mount(&server)
        .await;

    let send = SendApi::new(&server.uri(), "token");
    let err = send.deliver(1234, &OutgoingMessage::text_only("hi")).await.unwrap_err();
    assert!(matches!(err, BotError::Api { status: 400, .. }));
}
