use fetch_retry::{FetchClient, Request};

fn live_url() -> Option<String> {
    std::env::var("FETCH_RETRY_LIVE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
}

#[tokio::test]
async fn live_get_resolves_against_real_endpoint() {
    let Some(url) = live_url() else {
        eprintln!("skipping live test: FETCH_RETRY_LIVE_URL is not set");
        return;
    };

    let client = FetchClient::new();
    let reply = client
        .get(Request::new(url).retry(2).delay_ms(250))
        .await
        .expect("live GET must resolve");

    assert!(reply.as_text().is_some() || reply.as_json().is_some());
}
