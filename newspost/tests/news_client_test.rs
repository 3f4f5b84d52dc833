use common::{Locale, NewsConfig};
use mockito::Matcher;
use newspost::error::UpstreamError;
use newspost::news::{CurrentsNewsClient, NewsSource};

fn client_for(server: &mockito::ServerGuard, locale: Locale) -> CurrentsNewsClient {
    let config = NewsConfig {
        api_url: format!("{}/v1/latest-news", server.url()),
        ..NewsConfig::default()
    };
    CurrentsNewsClient::new(reqwest::Client::new(), &config, "news-key", locale)
}

fn news_body(titles: &[&str]) -> String {
    let news: Vec<_> = titles
        .iter()
        .map(|t| serde_json::json!({ "title": t, "url": "https://example.com" }))
        .collect();
    serde_json::json!({ "status": "ok", "news": news }).to_string()
}

#[tokio::test]
async fn sends_filters_and_keeps_first_five() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/v1/latest-news")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("language".into(), "en".into()),
            Matcher::UrlEncoded("keywords".into(), "electric cars".into()),
            Matcher::UrlEncoded("category".into(), "health,technology".into()),
            Matcher::UrlEncoded("apiKey".into(), "news-key".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(news_body(&["one", "two", "three", "four", "five", "six", "seven"]))
        .create_async()
        .await;

    let client = client_for(&server, Locale::En);
    let headlines = client
        .fetch_headlines("electric cars")
        .await
        .expect("fetch headlines");

    assert_eq!(headlines, vec!["one", "two", "three", "four", "five"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn fewer_than_five_are_returned_as_is() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/v1/latest-news")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(news_body(&["EV sales climb", "Solid-state batteries"]))
        .create_async()
        .await;

    let headlines = client_for(&server, Locale::En)
        .fetch_headlines("electric cars")
        .await
        .expect("fetch headlines");

    assert_eq!(headlines, vec!["EV sales climb", "Solid-state batteries"]);
}

#[tokio::test]
async fn empty_news_gives_placeholder() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/v1/latest-news")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status":"ok","news":[]}"#)
        .create_async()
        .await;

    let headlines = client_for(&server, Locale::En)
        .fetch_headlines("nothing here")
        .await
        .expect("fetch headlines");
    assert_eq!(headlines, vec!["No recent news found."]);

    let headlines = client_for(&server, Locale::Ru)
        .fetch_headlines("nothing here")
        .await
        .expect("fetch headlines");
    assert_eq!(headlines, vec!["Свежих новостей не найдено."]);
}

#[tokio::test]
async fn non_success_status_is_upstream_error_with_body() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/v1/latest-news")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"status":"error","msg":"Invalid apiKey"}"#)
        .create_async()
        .await;

    let err = client_for(&server, Locale::En)
        .fetch_headlines("electric cars")
        .await
        .unwrap_err();

    match err {
        UpstreamError::Status { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert!(body.contains("Invalid apiKey"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn decode_error_does_not_leak_api_key() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/v1/latest-news")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let err = client_for(&server, Locale::En)
        .fetch_headlines("electric cars")
        .await
        .unwrap_err();

    assert!(matches!(err, UpstreamError::Transport(_)));
    assert!(!err.to_string().contains("news-key"));
}
