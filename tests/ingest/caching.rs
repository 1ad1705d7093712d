use crate::common;
use tradeview_rs::SeriesBuilder;
use tradeview_rs::core::CacheMode;

#[tokio::test]
async fn second_fetch_is_served_from_cache() {
    let server = common::setup_server();
    let mock = common::mock_csv(&server, common::DATA_PATH, common::synthetic_csv(10));
    let client = common::cached_client_for(&server);
    assert!(client.cache_enabled());

    let a = SeriesBuilder::new(&client).fetch().await.unwrap();
    let b = SeriesBuilder::new(&client).fetch().await.unwrap();

    mock.assert_hits(1);
    assert_eq!(a, b);
}

#[tokio::test]
async fn refresh_and_bypass_go_to_the_network() {
    let server = common::setup_server();
    let mock = common::mock_csv(&server, common::DATA_PATH, common::synthetic_csv(10));
    let client = common::cached_client_for(&server);

    SeriesBuilder::new(&client).fetch().await.unwrap();
    SeriesBuilder::new(&client)
        .cache_mode(CacheMode::Refresh)
        .fetch()
        .await
        .unwrap();
    SeriesBuilder::new(&client)
        .cache_mode(CacheMode::Bypass)
        .fetch()
        .await
        .unwrap();

    mock.assert_hits(3);
}

#[tokio::test]
async fn no_cache_without_ttl() {
    let server = common::setup_server();
    let mock = common::mock_csv(&server, common::DATA_PATH, common::synthetic_csv(4));
    let client = common::client_for(&server);
    assert!(!client.cache_enabled());

    SeriesBuilder::new(&client).fetch().await.unwrap();
    SeriesBuilder::new(&client).fetch().await.unwrap();

    mock.assert_hits(2);
}
