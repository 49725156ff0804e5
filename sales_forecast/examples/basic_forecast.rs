use chrono::{NaiveDate, Weekday};
use sales_forecast::pipeline::{build_history, forecast_report, ForecastOptions};
use sales_forecast::provider::{build_provider, ModelKind, ModelSettings};
use sales_forecast::utils::generate_transactions;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Sales Forecast: Basic Forecasting Example");
    println!("=========================================\n");

    // Create sample data
    println!("Creating sample transactions...");
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("invalid start date")?;
    let records = generate_transactions(start, 40, 25, 80.0, 2024)?;
    println!("Sample data created: {} transactions\n", records.len());

    let history = build_history(&records, Weekday::Sun, true)?;
    println!(
        "Weekly history: {} weeks ending {}\n",
        history.len(),
        history.last_date().ok_or("empty history")?
    );

    for kind in [
        ModelKind::SimpleExponential,
        ModelKind::Holt,
        ModelKind::MovingAverage,
        ModelKind::LinearTrend,
    ] {
        let settings = ModelSettings {
            kind,
            ..ModelSettings::default()
        };
        let provider = build_provider(&settings)?;
        let report = forecast_report(&history, provider.as_ref(), &ForecastOptions::new(13))?;

        println!("{}", report.model);
        println!("{}", "-".repeat(report.model.len()));

        for entry in report.forecast_entries().iter().step_by(4) {
            println!(
                "  {}: {:>10.2}  ({:.2}, {:.2})",
                entry.date,
                entry.predicted.unwrap_or_default(),
                entry.lower.unwrap_or_default(),
                entry.upper.unwrap_or_default()
            );
        }

        println!("  Quarterly totals:");
        for quarter in &report.quarters {
            println!("    {}: {:.2}", quarter, quarter.total_predicted);
        }

        if let Some(accuracy) = &report.accuracy {
            print!("{}", accuracy);
        }
        println!();
    }

    Ok(())
}
