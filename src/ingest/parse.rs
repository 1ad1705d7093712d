use csv::{ReaderBuilder, StringRecord, Trim};

use crate::core::{Candle, Direction, PriceSeries, TvError, VolumeBar};
use crate::ingest::date::parse_date;

/* Column order of the source file. Close precedes open. */
const COL_DATE: usize = 0;
const COL_CLOSE: usize = 1;
const COL_HIGH: usize = 2;
const COL_LOW: usize = 3;
const COL_OPEN: usize = 4;
const COL_VOLUME: usize = 5;

/// Parses `date,close,high,low,open,volume` rows (after one header row) into index-aligned
/// candle and volume sequences.
///
/// Parsing is positional. Missing or non-numeric cells become `NaN`; unparseable dates leave
/// `time` as `None`. Neither aborts the parse, so `N` data rows always give `N` records.
///
/// Blank lines are not data rows: the reader skips them, so they produce no record and do not
/// shift the index of the rows after them.
pub fn parse_csv(text: &str) -> Result<PriceSeries, TvError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.trim().as_bytes());

    let mut series = PriceSeries::default();
    let mut bad_dates = 0usize;

    for record in reader.records() {
        let record = record?;
        let (candle, volume) = parse_row(&record);
        if candle.time.is_none() {
            bad_dates += 1;
        }
        series.candles.push(candle);
        series.volumes.push(volume);
    }

    if bad_dates > 0 {
        tracing::warn!(rows = bad_dates, "rows with unparseable dates; chart ordering may break");
    }

    Ok(series)
}

fn parse_row(record: &StringRecord) -> (Candle, VolumeBar) {
    let time = record.get(COL_DATE).and_then(parse_date);
    let close = number(record, COL_CLOSE);
    let open = number(record, COL_OPEN);

    let candle = Candle {
        time,
        open,
        high: number(record, COL_HIGH),
        low: number(record, COL_LOW),
        close,
    };
    let volume = VolumeBar {
        time,
        value: number(record, COL_VOLUME),
        color: Direction::of(open, close),
    };
    (candle, volume)
}

fn number(record: &StringRecord, idx: usize) -> f64 {
    record
        .get(idx)
        .and_then(|cell| cell.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}
