use tradeview_rs::{ChartDate, Direction, parse_csv};

#[test]
fn example_row_from_the_data_file() {
    let s = parse_csv("Date,Close,High,Low,Open,Volume\n2024-01-02,101.5,103.0,100.0,100.0,5000\n")
        .unwrap();

    let c = &s.candles[0];
    assert_eq!(c.chart_date(), Some(ChartDate::new(2024, 1, 2)));
    assert_eq!((c.open, c.high, c.low, c.close), (100.0, 103.0, 100.0, 101.5));
    assert_eq!(s.volumes[0].value, 5000.0);
    assert_eq!(s.volumes[0].color, Direction::Up);
}

#[test]
fn bad_cells_keep_their_row() {
    let text = "\
Date,Close,High,Low,Open,Volume
2024-01-02,101.5,103.0,100.0,100.0,5000
not-a-date,99.0,100.0,98.0,99.5,4000
2024-01-04,n/a,101.0,97.0,99.0,
2024-01-05,98.0,99.0
";
    let s = parse_csv(text).unwrap();

    assert_eq!(s.candles.len(), 4);
    assert_eq!(s.volumes.len(), 4);
    assert_eq!(s.candles[1].time, None);
    assert_eq!(s.candles[1].direction(), Direction::Down);
    assert!(s.candles[2].close.is_nan());
    assert!(s.volumes[2].value.is_nan());
    assert_eq!(s.volumes[2].color, Direction::Down);
    assert!(s.candles[3].open.is_nan());
    assert_eq!(s.candles[3].high, 99.0);
}

#[test]
fn blank_lines_are_not_rows() {
    let text = "Date,Close,High,Low,Open,Volume\n2024-01-02,101.5,103.0,100.0,100.0,5000\n\n2024-01-03,102.0,104.0,101.0,101.5,6000\n";
    let s = parse_csv(text).unwrap();

    assert_eq!(s.candles.len(), 2);
    assert_eq!(s.candles[1].chart_date(), Some(ChartDate::new(2024, 1, 3)));
    assert_eq!(s.volumes[1].value, 6000.0);
}

#[test]
fn header_only_gives_empty_series() {
    let s = parse_csv("Date,Close,High,Low,Open,Volume\n").unwrap();
    assert!(s.is_empty());
}
