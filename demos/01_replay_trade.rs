use std::time::Duration;

use tradeview_rs::chart::ViewportChart;
use tradeview_rs::overlay::{BandFrame, MarkerFrame};
use tradeview_rs::{ResizeDispatcher, Size, TradeSetup, TradeView, TvClient, ingest};
use url::Url;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing-subscriber")]
    tradeview_rs::init_tracing();

    let setup = TradeSetup::default().tick(Duration::from_millis(50));
    let resize = ResizeDispatcher::global();
    let surface = ViewportChart::new(Size::new(1200.0, 600.0));

    // 1. Mount over a served file when a base URL is given, otherwise over the bundled sample.
    let mut view = match std::env::args().nth(1) {
        Some(base) => {
            let client = TvClient::builder()
                .base_url(Url::parse(&base)?)
                .timeout(Duration::from_secs(5))
                .build()?;
            TradeView::mount(&client, surface, setup, resize).await
        }
        None => {
            let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/data.csv");
            TradeView::with_series(surface, ingest::load_path(path)?, &setup, resize)
        }
    };

    let Some(overlay) = view.overlay().cloned() else {
        println!("No trade to replay; chart rendered statically.");
        return Ok(());
    };
    let levels = *overlay.levels();
    println!("--- Trade ---");
    println!("{}", levels.entry_text());
    println!("{}", levels.take_profit_text());
    println!("{}", levels.stop_loss_text());
    println!("Buy on {}, sell on {}", levels.entry_time, levels.exit_time);
    println!();

    // 2. Watch the replay; the overlay follows every revealed candle.
    println!("--- Replay ---");
    while !view.replay_finished() {
        tokio::time::sleep(Duration::from_millis(250)).await;
        let frame = overlay.last_frame();
        match frame.map(|f| f.band) {
            Some(BandFrame::Placed(g)) => println!(
                "tick {:>2}: band at ({:.1}, {:.1}) {:.1}x{:.1}",
                view.replay_ticks(),
                g.rect.left,
                g.rect.top,
                g.rect.width,
                g.rect.height
            ),
            other => println!("tick {:>2}: band {:?}", view.replay_ticks(), other),
        }
    }
    println!();

    // 3. A window resize reaches every mounted chart.
    resize.dispatch(Size::new(800.0, 450.0));
    if let Some(MarkerFrame::Placed { x, height }) = overlay.last_frame().map(|f| f.marker) {
        println!("After resize the entry marker sits at x={x:.1}, {height:.1}px tall");
    }

    view.unmount();
    Ok(())
}
