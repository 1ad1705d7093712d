use crate::common;
use tradeview_rs::{SeriesBuilder, TvError};

#[tokio::test]
async fn missing_file_maps_to_status_error() {
    let server = common::setup_server();
    let mock = common::mock_status(&server, common::DATA_PATH, 404);
    let client = common::client_for(&server);

    let err = SeriesBuilder::new(&client).fetch().await.unwrap_err();

    mock.assert();
    match err {
        TvError::Status { status, url } => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/data.csv"), "unexpected url {url}");
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_is_not_cached() {
    let server = common::setup_server();
    let mut failing = common::mock_status(&server, common::DATA_PATH, 500);
    let client = common::cached_client_for(&server);

    assert!(SeriesBuilder::new(&client).fetch().await.is_err());
    failing.assert_hits(1);
    failing.delete();

    let ok = common::mock_csv(&server, common::DATA_PATH, common::synthetic_csv(3));
    let series = SeriesBuilder::new(&client).fetch().await.unwrap();
    ok.assert_hits(1);
    assert_eq!(series.len(), 3);
}
