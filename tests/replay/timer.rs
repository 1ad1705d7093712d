use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::common;
use tradeview_rs::replay::{CancelToken, Replay, ReplayHandle, ReplayPlan};
use tradeview_rs::{Candle, TvError};

type Revealed = Arc<Mutex<Vec<Candle>>>;

fn spawn(rows: usize, buy_offset: usize, sell_offset: usize) -> (ReplayHandle, Revealed, Vec<Candle>) {
    let candles = common::synthetic_series(rows).candles;
    let plan = ReplayPlan::from_offsets(rows, buy_offset, sell_offset).unwrap();
    let replay = Replay::new(candles.clone(), plan);

    let revealed: Revealed = Arc::new(Mutex::new(replay.initial().to_vec()));
    let sink = revealed.clone();
    let handle = ReplayHandle::spawn(
        replay,
        Duration::from_millis(200),
        move |candle: &Candle, cancel: &CancelToken| {
            let mut out = sink.lock().unwrap();
            if !cancel.is_cancelled() {
                out.push(*candle);
            }
        },
    );
    (handle, revealed, candles)
}

#[tokio::test(start_paused = true)]
async fn reveals_one_candle_per_tick_in_order() {
    let (handle, revealed, all) = spawn(100, 30, 10);
    assert_eq!(revealed.lock().unwrap().len(), 70);

    // the first reveal lands one period after spawning
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(revealed.lock().unwrap().len(), 70);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(revealed.lock().unwrap().len(), 71);
    assert_eq!(handle.ticks(), 1);

    handle.join().await;
    let got = revealed.lock().unwrap();
    assert_eq!(*got, all, "every candle, in source order");
}

#[tokio::test(start_paused = true)]
async fn timer_clears_after_the_sell_tick() {
    let (handle, revealed, _) = spawn(100, 30, 10);

    tokio::time::sleep(Duration::from_millis(200 * 21 + 50)).await;
    assert!(handle.is_finished());
    assert_eq!(handle.ticks(), 21);
    assert_eq!(revealed.lock().unwrap().len(), 100);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(handle.ticks(), 21);
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_further_reveals() {
    let (handle, revealed, _) = spawn(100, 30, 10);

    tokio::time::sleep(Duration::from_millis(650)).await;
    assert_eq!(revealed.lock().unwrap().len(), 73);

    handle.cancel();
    assert!(handle.token().is_cancelled());
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(revealed.lock().unwrap().len(), 73);
    assert!(handle.is_finished());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_cancels() {
    let (handle, revealed, _) = spawn(50, 20, 5);
    drop(handle);
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(revealed.lock().unwrap().len(), 30);
}

#[tokio::test(start_paused = true)]
async fn single_candle_slice_finishes_in_one_tick() {
    let (handle, revealed, _) = spawn(10, 3, 3);
    handle.join().await;
    assert_eq!(revealed.lock().unwrap().len(), 10);
}

#[test]
fn undersized_data_is_a_plan_error() {
    assert!(matches!(ReplayPlan::from_offsets(20, 30, 10), Err(TvError::Plan(_))));
    assert!(matches!(ReplayPlan::from_offsets(100, 10, 30), Err(TvError::Plan(_))));
    // sell offset 0 would point one past the end
    assert!(matches!(ReplayPlan::from_offsets(100, 30, 0), Err(TvError::Plan(_))));
}

#[tokio::test(start_paused = true)]
async fn zero_period_still_reveals_everything() {
    let candles = common::synthetic_series(20).candles;
    let plan = ReplayPlan::from_offsets(20, 5, 2).unwrap();
    let revealed: Revealed = Arc::new(Mutex::new(Replay::new(candles.clone(), plan).initial().to_vec()));
    let sink = revealed.clone();

    let handle = ReplayHandle::spawn(
        Replay::new(candles, plan),
        Duration::ZERO,
        move |candle: &Candle, _: &CancelToken| sink.lock().unwrap().push(*candle),
    );
    handle.join().await;

    assert_eq!(revealed.lock().unwrap().len(), 20);
}
