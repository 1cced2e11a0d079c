//! Chart artifact construction from the current snapshot window.
//!
//! The builder selects rows inside the look-back window, orders them for the
//! category axis, and writes one self-contained HTML file: the serialized
//! series payload is substituted into a dual-axis plotly template. Overwrite
//! semantics, no versioning.

use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::entities::coingecko;
use crate::error::PipelineError;
use crate::services::snapshot;

/// One point on the category axis, carrying the hover metadata for both
/// series.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartPoint {
    pub name: String,
    pub price: f64,
    pub volatility: Option<f64>,
    pub high_24h: f64,
    pub low_24h: f64,
}

/// The payload embedded into the artifact template.
#[derive(Debug, Serialize)]
pub struct ChartData {
    pub title: String,
    pub updated_label: String,
    pub points: Vec<ChartPoint>,
}

/// Build the chart from rows stamped within `window`. Returns `Ok(None)`
/// when the window holds no rows; nothing is written and the previous
/// artifact (if any) stays servable.
pub async fn build(
    db: &DatabaseConnection,
    window: TimeDelta,
    output_path: &Path,
) -> Result<Option<PathBuf>, PipelineError> {
    let since = Utc::now().naive_utc() - window;
    let rows = snapshot::rows_since(db, since).await?;

    let Some(data) = chart_data(rows) else {
        tracing::warn!("No records within the look-back window, nothing to render");
        return Ok(None);
    };

    tracing::info!("Rendering chart with {} points", data.points.len());

    let payload =
        serde_json::to_string(&data).map_err(|e| PipelineError::Render(e.to_string()))?;
    let html = CHART_TEMPLATE.replace("__CHART_DATA__", &payload);

    tokio::fs::write(output_path, html)
        .await
        .map_err(|e| PipelineError::Render(e.to_string()))?;

    tracing::info!("Chart saved to {}", output_path.display());
    Ok(Some(output_path.to_path_buf()))
}

/// Shape the selected rows into the chart payload: category axis ordered by
/// current price descending, display timestamp from the newest batch stamp.
/// `None` when there is nothing to plot.
pub fn chart_data(mut rows: Vec<coingecko::Model>) -> Option<ChartData> {
    let latest = rows.iter().map(|row| row.fetched_at).max()?;
    rows.sort_by(|a, b| b.current_price.cmp(&a.current_price));

    let points: Vec<ChartPoint> = rows
        .into_iter()
        .map(|row| ChartPoint {
            name: row.name,
            price: decimal_to_f64(&row.current_price),
            volatility: row.volatility.as_ref().map(decimal_to_f64),
            high_24h: decimal_to_f64(&row.high_24h),
            low_24h: decimal_to_f64(&row.low_24h),
        })
        .collect();

    Some(ChartData {
        title: format!("Top {} Tokens: Price and Volatility", points.len()),
        updated_label: format_display_timestamp(latest),
        points,
    })
}

fn format_display_timestamp(stamp: NaiveDateTime) -> String {
    stamp.format("%d %B %Y, %H:%M UTC").to_string()
}

fn decimal_to_f64(value: &Decimal) -> f64 {
    value.to_string().parse().unwrap_or(0.0)
}

const CHART_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Token Price and Volatility</title>
<script src="https://cdn.plot.ly/plotly-2.32.0.min.js"></script>
</head>
<body>
<div id="chart" style="width:100%;height:92vh;"></div>
<script>
const data = __CHART_DATA__;
const tokens = data.points.map(p => p.name);
const priceTrace = {
  x: tokens,
  y: data.points.map(p => p.price),
  mode: "lines+markers",
  name: "Current Price",
  line: { color: "blue", width: 3 },
  marker: { size: 8 },
  customdata: data.points.map(p => [p.high_24h, p.low_24h]),
  hovertemplate: "<b>%{x}</b><br>Current Price: $%{y:.2f}<br>High 24h: $%{customdata[0]:.2f}<br>Low 24h: $%{customdata[1]:.2f}<extra></extra>"
};
const volatilityTrace = {
  x: tokens,
  y: data.points.map(p => p.volatility),
  mode: "lines+markers",
  name: "Volatility (24h)",
  yaxis: "y2",
  line: { color: "purple", width: 2, dash: "dash" },
  marker: { size: 8 },
  hovertemplate: "<b>%{x}</b><br>Volatility%: %{y:.4f}<extra></extra>"
};
const layout = {
  title: { text: data.title, x: 0.5, xanchor: "center" },
  xaxis: { title: "Token" },
  yaxis: { title: "Price (USD)", type: "log", side: "left", showgrid: true },
  yaxis2: { title: "Volatility%", overlaying: "y", side: "right", showgrid: false },
  legend: { x: 1, y: 1, xanchor: "right", yanchor: "top" },
  margin: { b: 100 },
  annotations: [{
    text: "Last updated: " + data.updated_label,
    showarrow: false,
    xref: "paper", yref: "paper",
    x: 0.5, y: -0.25,
    xanchor: "center",
    font: { size: 12, color: "gray" }
  }]
};
Plotly.newPlot("chart", [priceTrace, volatilityTrace], layout, { responsive: true });
</script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn row(name: &str, price: Decimal, volatility: Option<Decimal>, hour: u32) -> coingecko::Model {
        coingecko::Model {
            id: 0,
            symbol: name.to_lowercase(),
            name: name.to_string(),
            current_price: price,
            market_cap: dec!(1000),
            total_volume: dec!(100),
            high_24h: price + dec!(1),
            low_24h: price - dec!(1),
            price_change_percentage_24h: None,
            total_supply: None,
            volume_marketcap_ratio: Some(dec!(0.1)),
            volatility,
            fetched_at: NaiveDate::from_ymd_opt(2026, 8, 7)
                .unwrap()
                .and_hms_opt(hour, 30, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_empty_window_renders_nothing() {
        assert!(chart_data(Vec::new()).is_none());
    }

    #[test]
    fn test_points_ordered_by_price_descending() {
        let rows = vec![
            row("Mid", dec!(50), Some(dec!(2)), 6),
            row("Top", dec!(900), Some(dec!(1)), 6),
            row("Low", dec!(3), None, 6),
        ];

        let data = chart_data(rows).unwrap();

        let names: Vec<&str> = data.points.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Top", "Mid", "Low"]);
        assert_eq!(data.points[2].volatility, None);
    }

    #[test]
    fn test_display_timestamp_is_newest_batch_stamp() {
        let rows = vec![
            row("Old", dec!(10), None, 3),
            row("New", dec!(20), None, 18),
        ];

        let data = chart_data(rows).unwrap();

        assert_eq!(data.updated_label, "07 August 2026, 18:30 UTC");
    }

    #[test]
    fn test_title_counts_points() {
        let rows = vec![row("A", dec!(1), None, 6), row("B", dec!(2), None, 6)];

        let data = chart_data(rows).unwrap();

        assert_eq!(data.title, "Top 2 Tokens: Price and Volatility");
    }

    #[test]
    fn test_payload_embeds_into_template() {
        let rows = vec![row("Bitcoin", dec!(50000), Some(dec!(4)), 6)];
        let data = chart_data(rows).unwrap();

        let payload = serde_json::to_string(&data).unwrap();
        let html = CHART_TEMPLATE.replace("__CHART_DATA__", &payload);

        assert!(html.contains("\"Bitcoin\""));
        assert!(html.contains("yaxis2"));
        assert!(!html.contains("__CHART_DATA__"));
    }

    #[test]
    fn test_null_volatility_serializes_as_json_null() {
        let rows = vec![row("Zero", dec!(5), None, 6)];
        let data = chart_data(rows).unwrap();

        let payload = serde_json::to_string(&data).unwrap();
        assert!(payload.contains("\"volatility\":null"));
    }
}
