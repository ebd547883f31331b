use std::fmt::Write;

use rasciigraph::{plot, Config as ChartConfig};

use crate::domain::{AccountSnapshot, OrderRecord, PositionRecord};
use crate::Error;

/// Sentinel printed instead of an empty order table.
pub const NO_OPEN_ORDERS: &str = "No open orders";

/// Sentinel printed instead of an empty positions table.
pub const NO_POSITIONS: &str = "No positions open";

/// Rows of the dashboard sparkline.
const CHART_HEIGHT: u32 = 6;

/// Formats the account snapshot as one labeled line per indicator, with a
/// sparkline of the charted indicator's history beneath when enough samples
/// exist. Values are displayed as fetched; no transformation beyond number
/// formatting.
pub fn render_account(snapshot: &AccountSnapshot) -> String {
    let mut out = String::new();

    if !snapshot.account.is_empty() {
        let _ = writeln!(out, "{}", snapshot.account);
    }

    if snapshot.indicators.is_empty() {
        let _ = writeln!(out, "  No account data");
        return out;
    }

    let label_width = snapshot.indicators.iter().map(|indicator| indicator.tag.len()).max().unwrap_or(0);

    for indicator in &snapshot.indicators {
        let _ = write!(out, "  {:<label_width$} {:>14.2}", indicator.tag, indicator.value);
        if indicator.currency.is_empty() {
            out.push('\n');
        } else {
            let _ = writeln!(out, " {}", indicator.currency);
        }
    }

    // Without enough history the labels above are the whole view.
    if let Ok(chart) = sparkline(&snapshot.history, CHART_HEIGHT) {
        out.push('\n');
        out.push_str(&chart);
        if !chart.ends_with('\n') {
            out.push('\n');
        }
    }

    out
}

/// Formats held positions as a table, one row per position in fetch order,
/// with the total cost on the title line. The empty list renders an
/// explicit message rather than an empty table.
pub fn render_positions(positions: &[PositionRecord]) -> String {
    let mut out = String::new();

    if positions.is_empty() {
        let _ = writeln!(out, "  {NO_POSITIONS}");
        return out;
    }

    let total_cost: f64 = positions.iter().map(PositionRecord::cost).sum();
    let _ = writeln!(out, "Positions:  (total cost {total_cost:.2})");
    let _ = writeln!(out, "  {:<8} {:>10} {:>12} {:>14}", "Symbol", "Qty", "AvgCost", "Cost");

    for position in positions {
        let _ = writeln!(
            out,
            "  {:<8} {:>10} {:>12.2} {:>14.2}",
            position.symbol,
            position.quantity,
            position.average_cost,
            position.cost(),
        );
    }

    out
}

/// Formats open orders as a table, one row per order in fetch order. The
/// empty list renders an explicit message rather than an empty table.
pub fn render_orders(orders: &[OrderRecord]) -> String {
    let mut out = String::new();

    if orders.is_empty() {
        let _ = writeln!(out, "  {NO_OPEN_ORDERS}");
        return out;
    }

    let _ = writeln!(out, "Orders:");
    let _ = writeln!(
        out,
        "  {:>8}  {:<8} {:<6} {:>10} {:<6} {:<14} {:>12} {:>12}",
        "Id", "Symbol", "Side", "Qty", "Type", "Status", "Lmt", "Aux"
    );

    for order in orders {
        let _ = writeln!(
            out,
            "  {:>8}  {:<8} {:<6} {:>10} {:<6} {:<14} {:>12} {:>12}",
            order.order_id,
            order.symbol,
            order.side,
            order.quantity,
            order.order_type,
            order.status,
            fmt_price(order.limit_price),
            fmt_price(order.aux_price),
        );
    }

    out
}

/// Renders a numeric series as an ASCII line chart. Fails with
/// [Error::Render] when fewer than two finite samples remain; callers
/// recover by omitting the chart.
pub fn sparkline(values: &[f64], height: u32) -> Result<String, Error> {
    let series: Vec<f64> = values.iter().copied().filter(|value| value.is_finite()).collect();
    if series.len() < 2 {
        return Err(Error::Render(format!("need at least 2 samples to chart, have {}", series.len())));
    }

    Ok(plot(series, ChartConfig::default().with_height(height)))
}

fn fmt_price(price: Option<f64>) -> String {
    match price {
        Some(price) => format!("{price:.2}"),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::domain::Indicator;

    use super::*;

    fn snapshot(indicators: &[(&str, f64)]) -> AccountSnapshot {
        AccountSnapshot {
            account: "DU1234567".to_string(),
            indicators: indicators
                .iter()
                .map(|(tag, value)| Indicator {
                    tag: tag.to_string(),
                    value: *value,
                    currency: "USD".to_string(),
                })
                .collect(),
            history: vec![],
        }
    }

    fn order(order_id: i32, symbol: &str) -> OrderRecord {
        OrderRecord {
            order_id,
            symbol: symbol.to_string(),
            side: "BUY".to_string(),
            quantity: 100.0,
            order_type: "LMT".to_string(),
            status: "Submitted".to_string(),
            limit_price: Some(123.45),
            aux_price: None,
        }
    }

    #[test]
    fn test_render_account_one_line_per_indicator() {
        let output = render_account(&snapshot(&[("NetLiquidation", 100_000.0), ("BuyingPower", 50_000.0)]));

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3); // account code + two indicators

        assert!(lines[1].contains("NetLiquidation"), "missing label: {output}");
        assert!(lines[1].contains("100000.00"), "missing value: {output}");
        assert!(lines[2].contains("BuyingPower"), "missing label: {output}");
        assert!(lines[2].contains("50000.00"), "missing value: {output}");
    }

    #[test]
    fn test_render_account_without_indicators_shows_placeholder() {
        let empty = AccountSnapshot::default();

        let output = render_account(&empty);

        assert!(output.contains("No account data"), "expected placeholder, got: {output}");
    }

    #[test]
    fn test_render_account_includes_sparkline_with_history() {
        let mut with_history = snapshot(&[("NetLiquidation", 100_300.0)]);
        with_history.history = vec![100_000.0, 100_100.0, 100_050.0, 100_300.0];

        let output = render_account(&with_history);

        // rasciigraph labels the axis with series values
        assert!(output.lines().count() > 2, "expected chart lines, got: {output}");
    }

    #[test]
    fn test_render_orders_empty_list() {
        let output = render_orders(&[]);

        assert!(output.contains(NO_OPEN_ORDERS));
        assert!(!output.contains("Id"), "empty list must not render a table: {output}");
    }

    #[test]
    fn test_render_orders_one_row_per_order_in_input_order() {
        let orders = vec![order(17, "AAPL"), order(3, "MSFT"), order(42, "TSLA")];

        let output = render_orders(&orders);
        let rows: Vec<&str> = output.lines().skip(2).collect(); // title + header

        assert_eq!(rows.len(), 3);
        assert!(rows[0].contains("AAPL"));
        assert!(rows[1].contains("MSFT"));
        assert!(rows[2].contains("TSLA"));
        assert!(rows[0].contains("123.45"));
        assert!(rows[0].contains('-'), "missing aux price placeholder: {output}");
    }

    #[test]
    fn test_render_positions_empty_list() {
        let output = render_positions(&[]);

        assert!(output.contains(NO_POSITIONS));
        assert!(!output.contains("Symbol"), "empty list must not render a table: {output}");
    }

    #[test]
    fn test_render_positions_rows_and_total() {
        let positions = vec![
            PositionRecord {
                symbol: "AAPL".to_string(),
                quantity: 100.0,
                average_cost: 150.0,
            },
            PositionRecord {
                symbol: "TSLA".to_string(),
                quantity: -10.0,
                average_cost: 200.0,
            },
        ];

        let output = render_positions(&positions);
        let rows: Vec<&str> = output.lines().skip(2).collect(); // title + header

        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("AAPL"));
        assert!(rows[0].contains("15000.00"));
        assert!(rows[1].contains("TSLA"));
        assert!(rows[1].contains("2000.00"));
        assert!(output.contains("17000.00"), "missing total cost: {output}");
    }

    #[test]
    fn test_sparkline_needs_two_finite_samples() {
        let error = sparkline(&[100.0, f64::NAN], 3).expect_err("should not chart one sample");
        assert!(matches!(error, Error::Render(_)), "expected Render error, got {error:?}");

        let chart = sparkline(&[100.0, 101.0, 99.5], 3).expect("chart failed");
        assert!(!chart.is_empty());
    }
}
