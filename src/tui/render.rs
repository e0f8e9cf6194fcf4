//! Dashboard rendering.
//!
//! Two-column layout, mirroring the classic health-panel arrangement:
//! - Left column: header, connection/concurrency gauges, cache hit gauge,
//!   QPS/TPS/IO readouts
//! - Right column: trend charts built from the history windows, plus the
//!   slow-query table

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::widgets::{
    Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, Paragraph, Row, Sparkline, Table,
};

use crate::monitor::{HISTORY_CAPACITY, HistoryPoint, Series};

use super::state::DashboardState;

const BORDER_COLOR: Color = Color::Cyan;

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER_COLOR))
}

/// Renders the whole dashboard.
pub fn render(frame: &mut Frame, state: &DashboardState) {
    let columns = Layout::horizontal([
        Constraint::Percentage(24), // Gauges and readouts
        Constraint::Percentage(76), // Trends and activity
    ])
    .split(frame.area());

    render_left_column(frame, columns[0], state);
    render_right_column(frame, columns[1], state);
}

fn render_left_column(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let rows = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Length(3), // Connections
        Constraint::Length(3), // Concurrency
        Constraint::Length(3), // Cache hit rate
        Constraint::Length(3), // QPS
        Constraint::Length(3), // TPS
        Constraint::Length(3), // I/O
        Constraint::Min(0),
    ])
    .split(area);

    let snap = &state.snapshot;

    let header = Paragraph::new(state.title.as_str()).block(panel("Server"));
    frame.render_widget(header, rows[0]);

    let connections = Gauge::default()
        .block(panel("Connections"))
        .gauge_style(Style::default().fg(Color::Blue))
        .percent(gauge_percent(snap.connections, snap.max_connections))
        .label(format!("{}/{}", snap.connections, snap.max_connections));
    frame.render_widget(connections, rows[1]);

    let concurrency = Gauge::default()
        .block(panel("Concurrency"))
        .gauge_style(Style::default().fg(Color::Magenta))
        .percent(gauge_percent(snap.concurrency, snap.max_connections))
        .label(format!("{}/{}", snap.concurrency, snap.max_connections));
    frame.render_widget(concurrency, rows[2]);

    let cache = Gauge::default()
        .block(panel("Cache hit"))
        .gauge_style(Style::default().fg(Color::Green))
        .percent(snap.cache_hit_rate.clamp(0.0, 100.0) as u16)
        .label(format!("{:.1}%", snap.cache_hit_rate));
    frame.render_widget(cache, rows[3]);

    let qps = Paragraph::new(format!("{:.0}/s", snap.qps)).block(panel("QPS"));
    frame.render_widget(qps, rows[4]);

    let tps = Paragraph::new(format!("{:.2}/s", snap.tps)).block(panel("TPS"));
    frame.render_widget(tps, rows[5]);

    let io = Paragraph::new(format!(
        "in {:.0} / out {:.0} KB/s",
        snap.io_in_per_sec, snap.io_out_per_sec
    ))
    .block(panel("I/O"));
    frame.render_widget(io, rows[6]);
}

fn render_right_column(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let rows = Layout::vertical([
        Constraint::Percentage(28), // Connections / concurrency trend
        Constraint::Percentage(28), // QPS / TPS trend
        Constraint::Percentage(16), // Cache hit trend
        Constraint::Percentage(28), // Slow queries
    ])
    .split(area);

    render_trend_chart(
        frame,
        rows[0],
        "Connections / Concurrency",
        &[
            ("conn", Color::Blue, state.series(Series::Connections)),
            ("conc", Color::Magenta, state.series(Series::Concurrency)),
        ],
    );
    render_trend_chart(
        frame,
        rows[1],
        "QPS / TPS",
        &[
            ("qps", Color::Yellow, state.series(Series::Qps)),
            ("tps", Color::Cyan, state.series(Series::Tps)),
        ],
    );
    render_cache_sparkline(frame, rows[2], state.series(Series::CacheHitRate));
    render_slow_queries(frame, rows[3], state);
}

fn render_trend_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    series: &[(&str, Color, &[HistoryPoint])],
) {
    let points: Vec<Vec<(f64, f64)>> = series.iter().map(|(_, _, h)| to_points(h)).collect();

    let max = points
        .iter()
        .flatten()
        .map(|(_, y)| *y)
        .fold(1.0_f64, f64::max);

    let datasets = series
        .iter()
        .zip(&points)
        .map(|((name, color, _), data)| {
            Dataset::default()
                .name(*name)
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(*color))
                .data(data)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(panel(title))
        .x_axis(Axis::default().bounds([0.0, (HISTORY_CAPACITY - 1) as f64]))
        .y_axis(
            Axis::default()
                .bounds([0.0, max * 1.1])
                .labels(["0".to_string(), format!("{:.0}", max)]),
        );
    frame.render_widget(chart, area);
}

fn render_cache_sparkline(frame: &mut Frame, area: Rect, history: &[HistoryPoint]) {
    let values: Vec<u64> = history.iter().map(|p| p.value as u64).collect();
    let sparkline = Sparkline::default()
        .block(panel("Cache hit trend"))
        .style(Style::default().fg(Color::Green))
        .max(100)
        .data(values.iter().copied());
    frame.render_widget(sparkline, area);
}

fn render_slow_queries(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let snap = &state.snapshot;
    let title = format!(
        "Slow queries: {} | Blocked waits: {}",
        snap.slow_queries.len(),
        snap.blocking_queries.len()
    );

    let header = Row::new(["ID", "USER", "DB", "TIME", "STATE", "QUERY"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = snap
        .slow_queries
        .iter()
        .map(|q| {
            Row::new([
                q.id.to_string(),
                q.user.clone(),
                q.db.clone().unwrap_or_default(),
                format!("{}s", q.time_secs),
                q.state.clone().unwrap_or_default(),
                q.info.clone().unwrap_or_default(),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(7),
            Constraint::Length(14),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .block(panel(&title));
    frame.render_widget(table, area);
}

/// Converts a history window into chart points, one per tick, oldest first.
fn to_points(history: &[HistoryPoint]) -> Vec<(f64, f64)> {
    history
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.value))
        .collect()
}

/// Gauge fill percentage, capped at 100.
fn gauge_percent(value: i64, ceiling: i64) -> u16 {
    if ceiling <= 0 {
        return 0;
    }
    let progress = value as f64 / ceiling as f64 * 100.0;
    (progress as u16).min(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauge_percent_caps_at_one_hundred() {
        assert_eq!(gauge_percent(10, 151), 6);
        assert_eq!(gauge_percent(300, 151), 100);
        assert_eq!(gauge_percent(0, 151), 0);
    }

    #[test]
    fn gauge_percent_handles_degenerate_ceiling() {
        assert_eq!(gauge_percent(10, 0), 0);
        assert_eq!(gauge_percent(10, -5), 0);
    }

    #[test]
    fn to_points_indexes_by_tick() {
        let history = vec![
            HistoryPoint {
                label: "a".into(),
                value: 3.0,
            },
            HistoryPoint {
                label: "b".into(),
                value: 5.0,
            },
        ];
        assert_eq!(to_points(&history), vec![(0.0, 3.0), (1.0, 5.0)]);
    }
}
