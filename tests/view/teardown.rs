use std::sync::atomic::Ordering;
use std::time::Duration;

use crate::common;
use tradeview_rs::chart::ViewportChart;
use tradeview_rs::{ResizeDispatcher, TradeSetup, TradeView};

fn mounted(dispatcher: &ResizeDispatcher) -> TradeView<ViewportChart> {
    TradeView::with_series(
        common::viewport(),
        common::synthetic_series(100),
        &TradeSetup::default(),
        dispatcher,
    )
}

#[tokio::test(start_paused = true)]
async fn unmount_releases_everything() {
    let dispatcher = ResizeDispatcher::new();
    let mut view = mounted(&dispatcher);
    assert!(view.is_mounted());
    assert_eq!(dispatcher.listener_count(), 1);
    assert_eq!(view.with_chart(|c| c.backend().subscription_count()), 3);
    assert_eq!(view.with_layer(|l| l.len()), 9);

    view.unmount();

    assert!(!view.is_mounted());
    assert_eq!(dispatcher.listener_count(), 0);
    assert!(view.with_layer(|l| l.is_empty()));
    assert!(view.with_chart(|c| c.is_removed()));
    assert_eq!(view.with_chart(|c| c.backend().subscription_count()), 0);
    assert!(view.replay_finished());
}

#[tokio::test(start_paused = true)]
async fn second_unmount_is_a_no_op() {
    let dispatcher = ResizeDispatcher::new();
    let mut view = mounted(&dispatcher);
    view.unmount();
    view.unmount();
    drop(view);
    assert_eq!(dispatcher.listener_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn no_candle_lands_after_teardown() {
    let dispatcher = ResizeDispatcher::new();
    let (chart, updates) = common::CountingChart::new(common::viewport());
    let mut view = TradeView::with_series(
        chart,
        common::synthetic_series(100),
        &TradeSetup::default(),
        &dispatcher,
    );

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(view.replay_ticks(), 2);
    let written = updates.load(Ordering::SeqCst);
    assert_eq!(written, 2);

    view.unmount();
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(updates.load(Ordering::SeqCst), written);
    assert!(view.with_chart(|c| c.is_removed()));
    assert!(view.with_layer(|l| l.is_empty()));
}

#[tokio::test(start_paused = true)]
async fn unmount_after_the_chart_is_gone_swallows_detach_errors() {
    let dispatcher = ResizeDispatcher::new();
    let mut view = mounted(&dispatcher);

    // every unsubscribe now fails against the removed surface
    view.with_chart(|c| c.remove());
    assert!(view.with_chart(|c| c.unsubscribe(tradeview_rs::chart::SubscriptionId(0))).is_err());

    view.unmount();
    view.unmount();

    assert!(!view.is_mounted());
    assert!(view.with_layer(|l| l.is_empty()));
    assert_eq!(dispatcher.listener_count(), 0);
    assert!(view.replay_finished());
}

#[tokio::test(start_paused = true)]
async fn drop_unregisters_from_the_dispatcher() {
    let dispatcher = ResizeDispatcher::new();
    {
        let _a = mounted(&dispatcher);
        let _b = mounted(&dispatcher);
        assert_eq!(dispatcher.listener_count(), 2);
    }
    assert_eq!(dispatcher.listener_count(), 0);
}
