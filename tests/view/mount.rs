use crate::common;
use tradeview_rs::chart::{ChartBackend, ScaleMargins, Theme, ViewportChart};
use tradeview_rs::{ResizeDispatcher, StaticView, TradeSetup, TradeView};

fn candle_count(view: &TradeView<ViewportChart>) -> usize {
    view.with_chart(|c| {
        let id = c.candle_series().unwrap();
        c.backend().candles(id).map_or(0, <[_]>::len)
    })
}

#[tokio::test]
async fn mount_fetches_and_plans_the_trade() {
    let server = common::setup_server();
    let mock = common::mock_csv(&server, common::DATA_PATH, common::fixture("data.csv"));
    let client = common::client_for(&server);
    let dispatcher = ResizeDispatcher::new();

    let view = TradeView::mount(&client, common::viewport(), TradeSetup::default(), &dispatcher).await;

    mock.assert();
    let plan = view.plan().unwrap();
    assert_eq!((plan.buy_index(), plan.sell_index()), (90, 110));
    assert_eq!(candle_count(&view), 90);
    assert!(view.is_mounted());

    let levels = *view.overlay().unwrap().levels();
    assert!((levels.take_profit / levels.entry - 1.03).abs() < 1e-12);
    assert!((levels.stop_loss / levels.entry - 0.99).abs() < 1e-12);

    let markers = view.with_chart(|c| {
        let id = c.candle_series().unwrap();
        c.backend().markers(id).to_vec()
    });
    let texts: Vec<_> = markers.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, ["Buy", "Sell"]);
}

#[tokio::test]
async fn failed_fetch_leaves_an_empty_chart() {
    let server = common::setup_server();
    let mock = common::mock_status(&server, common::DATA_PATH, 500);
    let client = common::client_for(&server);
    let dispatcher = ResizeDispatcher::new();

    let view = TradeView::mount(&client, common::viewport(), TradeSetup::default(), &dispatcher).await;

    mock.assert();
    assert!(view.overlay().is_none());
    assert!(view.plan().is_none());
    assert_eq!(candle_count(&view), 0);
    assert!(view.with_layer(|l| l.is_empty()));
    assert_eq!(dispatcher.listener_count(), 0);
}

#[tokio::test]
async fn short_data_renders_statically() {
    let dispatcher = ResizeDispatcher::new();
    let view = TradeView::with_series(
        common::viewport(),
        common::synthetic_series(20),
        &TradeSetup::default(),
        &dispatcher,
    );

    assert!(view.plan().is_none());
    assert!(view.overlay().is_none());
    assert_eq!(candle_count(&view), 20);
    assert!(view.replay_finished());
}

#[tokio::test]
async fn static_view_pins_volume_to_the_bottom() {
    let server = common::setup_server();
    let _mock = common::mock_csv(&server, common::DATA_PATH, common::synthetic_csv(30));
    let client = common::client_for(&server);

    let view = StaticView::mount(&client, common::viewport(), Theme::Dark).await;

    let chart = view.chart();
    let volume = chart.volume_series().unwrap();
    assert_eq!(chart.backend().scale_margins(volume), Some(ScaleMargins::VOLUME));
    assert_eq!(chart.backend().histogram(volume).unwrap().len(), 30);
    assert_eq!(chart.backend().candles(chart.candle_series().unwrap()).unwrap().len(), 30);

    // the volume overlay never reaches the upper 85% of the pane
    let top = chart
        .backend()
        .histogram(volume)
        .unwrap()
        .iter()
        .filter_map(|b| tradeview_rs::chart::Projection::price_to_coordinate(chart.backend(), volume, b.value))
        .fold(f64::INFINITY, f64::min);
    assert!(top >= 500.0 * 0.85 - 1e-9, "volume top at {top}");
}

#[tokio::test]
async fn static_view_drop_removes_the_chart() {
    let mut view = StaticView::with_series(common::viewport(), Theme::Light, &common::synthetic_series(10));
    assert!(!view.chart().is_removed());
    view.chart_mut().backend_mut().scroll_by(-2.0);
    drop(view);
}

#[tokio::test(start_paused = true)]
async fn zero_tick_period_renders_statically() {
    let dispatcher = ResizeDispatcher::new();
    let view = TradeView::with_series(
        common::viewport(),
        common::synthetic_series(100),
        &TradeSetup::default().tick(std::time::Duration::ZERO),
        &dispatcher,
    );

    assert!(view.plan().is_none());
    assert!(view.overlay().is_none());
    assert!(!view.is_mounted());
    assert_eq!(candle_count(&view), 100);

    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
    assert_eq!(candle_count(&view), 100);
    assert!(view.replay_finished());
}
