//! Rendering of the status and forecast views
//!
//! Handlers only deal in typed views; a [`ReportFormatter`] turns them into a
//! response body. HTML and JSON implementations are provided.

use crate::context::HistoricalData;
use crate::error::Result;
use chrono::NaiveDate;
use html_escape::encode_text;
use sales_forecast::ForecastReport;
use serde::Serialize;
use serde_json::json;
use std::fmt::Write as _;

/// Number of weekly rows shown on the status page
const PREVIEW_ROWS: usize = 5;

/// One weekly row of the status table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekRow {
    pub year: i32,
    pub week: u32,
    pub year_week: String,
    pub weekly_sales: f64,
}

/// Overview of the loaded data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusView {
    pub record_count: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub weekly_count: usize,
    pub weeks_with_sales: usize,
    pub total_amount: f64,
    pub first_weeks: Vec<WeekRow>,
}

impl StatusView {
    pub fn from_history(data: &HistoricalData) -> Self {
        let first_weeks = data
            .history
            .buckets()
            .iter()
            .take(PREVIEW_ROWS)
            .map(|b| WeekRow {
                year: b.iso_year(),
                week: b.iso_week(),
                year_week: b.iso_week_label(),
                weekly_sales: b.total_amount,
            })
            .collect();

        Self {
            record_count: data.summary.record_count,
            first_date: data.summary.first_date,
            last_date: data.summary.last_date,
            weekly_count: data.history.len(),
            weeks_with_sales: data.weeks_with_sales(),
            total_amount: data.summary.total_amount,
            first_weeks,
        }
    }
}

/// Turns views into response bodies
pub trait ReportFormatter: Send + Sync {
    /// Value of the `Content-Type` header
    fn content_type(&self) -> &'static str;

    /// Data status; `Err` carries the message explaining why no data is loaded
    fn status_page(&self, status: std::result::Result<&StatusView, &str>) -> Result<String>;

    fn forecast_page(&self, report: &ForecastReport) -> Result<String>;

    fn error_page(&self, message: &str) -> String;
}

/// Series in the shape Chart.js datasets expect
#[derive(Debug, Serialize)]
struct ChartData {
    labels: Vec<String>,
    actual: Vec<Option<f64>>,
    predicted: Vec<Option<f64>>,
    lower: Vec<Option<f64>>,
    upper: Vec<Option<f64>>,
}

impl ChartData {
    fn from_report(report: &ForecastReport) -> Self {
        let series = &report.series;
        Self {
            labels: series.iter().map(|e| e.date.to_string()).collect(),
            actual: series.iter().map(|e| e.actual).collect(),
            predicted: series.iter().map(|e| e.predicted).collect(),
            lower: series.iter().map(|e| e.lower).collect(),
            upper: series.iter().map(|e| e.upper).collect(),
        }
    }
}

/// Standalone HTML pages styled with Tailwind, charts drawn by Chart.js
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFormatter;

impl HtmlFormatter {
    fn page(title: &str, body: &str, scripts: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="https://cdn.tailwindcss.com"></script>
    {scripts}
</head>
<body class="bg-slate-100 min-h-screen flex items-center justify-center p-4">
    <div class="bg-white p-8 rounded-xl shadow-lg max-w-4xl w-full">
        <h1 class="text-3xl font-bold text-gray-800 mb-4 text-center">{title}</h1>
        {body}
    </div>
</body>
</html>
"#,
            title = encode_text(title),
            body = body,
            scripts = scripts,
        )
    }

    fn error_paragraph(message: &str) -> String {
        format!(
            r#"<p class="text-red-600 font-semibold mt-4">{}</p>"#,
            encode_text(message)
        )
    }

    fn status_body(view: &StatusView) -> String {
        let mut rows = String::new();
        for row in &view.first_weeks {
            let _ = write!(
                rows,
                r#"<tr class="border-b"><td class="py-2 px-4">{}</td><td class="py-2 px-4">{}</td><td class="py-2 px-4">{}</td><td class="py-2 px-4 text-right">{}</td></tr>"#,
                row.year,
                row.week,
                encode_text(&row.year_week),
                format_currency(row.weekly_sales)
            );
        }

        format!(
            r#"<p class="text-gray-600">Data loading and weekly aggregation complete.</p>
        <h3 class="text-xl font-semibold text-gray-700 mt-6 mb-2">Weekly Sales Data Summary</h3>
        <p class="text-gray-600">Total raw records loaded: <strong>{records}</strong></p>
        <p class="text-gray-600">Date range of raw data: <strong>{first}</strong> to <strong>{last}</strong></p>
        <p class="text-gray-600 mb-4">Aggregated weekly sales records: <strong>{weeks}</strong> ({with_sales} with sales)</p>
        <h4 class="text-lg font-medium text-gray-700 mb-2">First {preview} Weekly Sales Records:</h4>
        <table class="min-w-full border border-gray-300">
            <thead><tr class="bg-gray-100 text-sm uppercase"><th class="py-2 px-4 text-left">Year</th><th class="py-2 px-4 text-left">Week</th><th class="py-2 px-4 text-left">Year_Week</th><th class="py-2 px-4 text-right">Weekly Sales</th></tr></thead>
            <tbody>{rows}</tbody>
        </table>
        <p class="mt-6"><a class="text-blue-600 underline" href="/forecast">View forecast</a></p>"#,
            records = format_count(view.record_count),
            first = view.first_date,
            last = view.last_date,
            weeks = format_count(view.weekly_count),
            with_sales = format_count(view.weeks_with_sales),
            preview = view.first_weeks.len(),
            rows = rows,
        )
    }

    fn quarters_table(report: &ForecastReport) -> String {
        if report.quarters.is_empty() {
            return r#"<p class="text-gray-600">No quarter has a nonzero forecast.</p>"#.to_string();
        }

        let mut rows = String::new();
        for quarter in &report.quarters {
            let _ = write!(
                rows,
                r#"<tr class="border-b"><td class="py-2 px-4">{}</td><td class="py-2 px-4 text-right">{}</td></tr>"#,
                quarter,
                format_currency(quarter.total_predicted)
            );
        }

        format!(
            r#"<table class="min-w-full border border-gray-300 mt-2">
            <thead><tr class="bg-gray-100 text-sm uppercase"><th class="py-2 px-4 text-left">Quarter</th><th class="py-2 px-4 text-right">Predicted Sales</th></tr></thead>
            <tbody>{}</tbody>
        </table>"#,
            rows
        )
    }
}

impl ReportFormatter for HtmlFormatter {
    fn content_type(&self) -> &'static str {
        "text/html; charset=utf-8"
    }

    fn status_page(&self, status: std::result::Result<&StatusView, &str>) -> Result<String> {
        let body = match status {
            Ok(view) => Self::status_body(view),
            Err(message) => Self::error_paragraph(message),
        };
        Ok(Self::page("Sales Forecaster - Data Status", &body, ""))
    }

    fn forecast_page(&self, report: &ForecastReport) -> Result<String> {
        let chart = embed_json(&serde_json::to_string(&ChartData::from_report(report))?);

        let accuracy = report
            .accuracy
            .as_ref()
            .map(|a| {
                format!(
                    r#"<p class="text-sm text-gray-500 mt-2">In-sample fit: MAE {:.2}, RMSE {:.2}, SMAPE {:.1}%</p>"#,
                    a.mae, a.rmse, a.smape
                )
            })
            .unwrap_or_default();

        let body = format!(
            r#"<p class="text-gray-600 text-center">{model}: {weeks} weeks after {end}</p>
        <canvas id="forecast-chart" class="mt-4"></canvas>
        {accuracy}
        <h3 class="text-xl font-semibold text-gray-700 mt-6">Quarterly Forecast</h3>
        {quarters}
        <p class="mt-6"><a class="text-blue-600 underline" href="/">Data status</a></p>
        <script>
        const data = {chart};
        new Chart(document.getElementById('forecast-chart'), {{
            type: 'line',
            data: {{
                labels: data.labels,
                datasets: [
                    {{ label: 'Upper bound', data: data.upper, borderWidth: 0, pointRadius: 0, fill: '+1', backgroundColor: 'rgba(59,130,246,0.15)' }},
                    {{ label: 'Lower bound', data: data.lower, borderWidth: 0, pointRadius: 0, fill: false }},
                    {{ label: 'Actual', data: data.actual, borderColor: 'rgb(31,41,55)', pointRadius: 1 }},
                    {{ label: 'Predicted', data: data.predicted, borderColor: 'rgb(59,130,246)', borderDash: [6, 4], pointRadius: 1 }}
                ]
            }},
            options: {{ spanGaps: false, interaction: {{ mode: 'index', intersect: false }} }}
        }});
        </script>"#,
            model = encode_text(&report.model),
            weeks = report.horizon_weeks,
            end = report.history_end,
            accuracy = accuracy,
            quarters = Self::quarters_table(report),
            chart = chart,
        );

        Ok(Self::page(
            "Sales Forecaster - Forecast",
            &body,
            r#"<script src="https://cdn.jsdelivr.net/npm/chart.js"></script>"#,
        ))
    }

    fn error_page(&self, message: &str) -> String {
        Self::page("Sales Forecaster - Error", &Self::error_paragraph(message), "")
    }
}

/// JSON bodies for API clients
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn status_page(&self, status: std::result::Result<&StatusView, &str>) -> Result<String> {
        let body = match status {
            Ok(view) => serde_json::to_string(view)?,
            Err(message) => json!({ "error": message }).to_string(),
        };
        Ok(body)
    }

    fn forecast_page(&self, report: &ForecastReport) -> Result<String> {
        Ok(serde_json::to_string(report)?)
    }

    fn error_page(&self, message: &str) -> String {
        json!({ "error": message }).to_string()
    }
}

/// Make serialized JSON safe inside a `<script>` element
fn embed_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

/// `1234567.891` -> `$1,234,567.89`
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let formatted = format!("{:.2}", amount.abs());
    let (whole, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    format!("{}${}.{}", sign, group_thousands(whole), cents)
}

fn format_count(count: usize) -> String {
    group_thousands(&count.to_string())
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use sales_forecast::{QuarterlyRollup, UnifiedEntry};

    fn report(model: &str) -> ForecastReport {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        ForecastReport {
            model: model.to_string(),
            horizon_weeks: 1,
            history_end: NaiveDate::from_ymd_opt(2024, 12, 29).unwrap(),
            series: vec![UnifiedEntry {
                date,
                actual: None,
                predicted: Some(120.0),
                lower: Some(95.0),
                upper: Some(140.0),
            }],
            quarters: vec![QuarterlyRollup {
                year: 2025,
                quarter: 1,
                total_predicted: 120.0,
            }],
            accuracy: None,
        }
    }

    #[test]
    fn test_currency_formatting() {
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(12.5), "$12.50");
        assert_eq!(format_currency(-1000.0), "-$1,000.00");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(999), "999");
    }

    #[test]
    fn test_html_escapes_untrusted_text() {
        let html = HtmlFormatter
            .forecast_page(&report("<b>Holt</b></script>"))
            .unwrap();

        assert!(html.contains("&lt;b&gt;Holt&lt;/b&gt;"));
        assert!(html.contains("2025-Q1"));
        assert!(html.contains("$120.00"));

        let page = HtmlFormatter.error_page("missing <column>");
        assert!(page.contains("missing &lt;column&gt;"));
    }

    #[test]
    fn test_embedded_json_cannot_close_script() {
        assert_eq!(embed_json(r#"{"a":"</script>"}"#), r#"{"a":"<\/script>"}"#);
    }

    #[test]
    fn test_json_formatter() {
        let body = JsonFormatter.forecast_page(&report("Holt")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(value["model"], "Holt");
        assert_eq!(value["quarters"][0]["total_predicted"], 120.0);
        assert_eq!(value["series"][0]["actual"], serde_json::Value::Null);

        let error: serde_json::Value =
            serde_json::from_str(&JsonFormatter.error_page("boom")).unwrap();
        assert_eq!(error["error"], "boom");
    }
}
