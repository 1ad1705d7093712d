use std::time::Duration;

use crate::common;
use tradeview_rs::chart::ViewportChart;
use tradeview_rs::overlay::{BandFrame, MarkerFrame};
use tradeview_rs::{ResizeDispatcher, Size, TradeSetup, TradeView};

fn candle_count(view: &TradeView<ViewportChart>) -> usize {
    view.with_chart(|c| {
        let id = c.candle_series().unwrap();
        c.backend().candles(id).map_or(0, <[_]>::len)
    })
}

#[tokio::test(start_paused = true)]
async fn replay_reveals_the_slice_then_clears_the_timer() {
    let dispatcher = ResizeDispatcher::new();
    let view = TradeView::with_series(
        common::viewport(),
        common::synthetic_series(100),
        &TradeSetup::default(),
        &dispatcher,
    );

    let plan = view.plan().unwrap();
    assert_eq!((plan.buy_index(), plan.sell_index()), (70, 90));
    assert_eq!(candle_count(&view), 70);
    // volume is complete from the start
    view.with_chart(|c| {
        let id = c.volume_series().unwrap();
        assert_eq!(c.backend().histogram(id).unwrap().len(), 100);
    });

    tokio::time::sleep(Duration::from_millis(1_100)).await;
    assert_eq!(candle_count(&view), 75);
    assert!(!view.replay_finished());

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(candle_count(&view), 100, "final tick flushes the tail");
    assert_eq!(view.replay_ticks(), 21);
    assert!(view.replay_finished());
}

#[tokio::test(start_paused = true)]
async fn overlay_follows_revealed_candles() {
    let dispatcher = ResizeDispatcher::new();
    let view = TradeView::with_series(
        common::viewport(),
        common::synthetic_series(100),
        &TradeSetup::default(),
        &dispatcher,
    );
    let overlay = view.overlay().unwrap().clone();
    let initial = overlay.last_frame().unwrap();
    assert!(matches!(initial.band, BandFrame::Placed(_)));
    assert!(matches!(initial.marker, MarkerFrame::Placed { .. }));

    // new candles widen the auto-scaled price range, so the band moves
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_ne!(overlay.last_frame().unwrap(), initial);
}

#[tokio::test(start_paused = true)]
async fn user_input_resyncs_the_overlay() {
    let dispatcher = ResizeDispatcher::new();
    let view = TradeView::with_series(
        common::viewport(),
        common::synthetic_series(100),
        &TradeSetup::default(),
        &dispatcher,
    );
    let overlay = view.overlay().unwrap().clone();
    let before = overlay.last_frame().unwrap();

    view.move_crosshair(Some(tradeview_rs::chart::Point { x: 300.0, y: 200.0 }));
    assert_eq!(overlay.last_frame().unwrap(), before);

    view.zoom(1.5);
    let zoomed = overlay.last_frame().unwrap();
    assert_ne!(zoomed, before);

    view.pan(-25.0);
    assert!(matches!(overlay.last_frame().unwrap().band, BandFrame::Vertical { .. }));
}

#[tokio::test(start_paused = true)]
async fn window_resize_reaches_chart_and_overlay() {
    let dispatcher = ResizeDispatcher::new();
    let view = TradeView::with_series(
        common::viewport(),
        common::synthetic_series(100),
        &TradeSetup::default(),
        &dispatcher,
    );
    let overlay = view.overlay().unwrap().clone();
    let before = overlay.last_frame().unwrap();

    assert_eq!(dispatcher.dispatch(Size::new(400.0, 300.0)), 1);

    let size = view.with_chart(|c| tradeview_rs::chart::Projection::container_size(c.backend()));
    assert_eq!(size, Size::new(400.0, 300.0));
    assert_ne!(overlay.last_frame().unwrap(), before);
}

#[tokio::test(start_paused = true)]
async fn unprojectable_take_profit_hides_the_band() {
    let dispatcher = ResizeDispatcher::new();
    let view = TradeView::with_series(
        common::viewport(),
        common::synthetic_series(100),
        &TradeSetup::default().ratios(10.0, 0.99),
        &dispatcher,
    );
    let overlay = view.overlay().unwrap();
    assert_eq!(overlay.last_frame().unwrap().band, BandFrame::Hidden);
    let band = overlay.nodes().band;
    assert!(view.with_layer(|l| !l.style(band).unwrap().is_visible()));
}
