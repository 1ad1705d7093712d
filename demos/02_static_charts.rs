use tradeview_rs::chart::{ChartBackend, Pane, ViewportChart};
use tradeview_rs::{ResizeDispatcher, Size, StaticView, Theme, ingest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing-subscriber")]
    tradeview_rs::init_tracing();

    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/data.csv");
    let series = ingest::load_path(path)?;
    println!("Loaded {} candles", series.len());

    // 1. Candles with volume pinned to the bottom of the same pane.
    let view = StaticView::with_series(ViewportChart::new(Size::new(900.0, 500.0)), Theme::Dark, &series);
    let chart = view.chart();
    if let Some(range) = chart.backend().visible_time_range() {
        println!("Dark chart shows {} .. {}", range.from, range.to);
    }
    if let Some(last) = series.candles.last() {
        println!(
            "Last close {:.2} projects to y={:?}",
            last.close,
            chart.price_to_pixel(last.close)
        );
    }
    println!();

    // 2. Separate price and volume charts that pan, zoom and resize together.
    let resize = ResizeDispatcher::new();
    let linked = tradeview_rs::LinkedView::with_series(
        ViewportChart::new(Size::new(900.0, 400.0)),
        ViewportChart::new(Size::new(900.0, 150.0)),
        &series,
        &resize,
    );
    linked.with_charts(|c| {
        c.scroll(Pane::Price, -20.0);
        c.zoom(Pane::Volume, 1.5);
    });
    resize.dispatch(Size::new(600.0, 800.0));
    linked.with_charts(|c| {
        for pane in [Pane::Price, Pane::Volume] {
            let backend = c.pane(pane).backend();
            println!("{pane:?}: {:?}", backend.visible_time_range());
        }
    });

    Ok(())
}
