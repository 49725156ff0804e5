use approx::assert_relative_eq;
use chrono::{Duration, NaiveDate};
use rstest::rstest;
use sales_forecast::models::exponential_smoothing::{HoltLinear, SimpleExponentialSmoothing};
use sales_forecast::models::linear_trend::LinearTrend;
use sales_forecast::models::moving_average::MovingAverage;
use sales_forecast::provider::{build_provider, ModelForecaster};
use sales_forecast::{ForecastModel, ForecastProvider, ModelKind, ModelSettings, TrainedForecastModel, WeeklySeries};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()
}

fn create_test_series() -> WeeklySeries {
    let values = [100.0, 104.0, 101.0, 107.0, 110.0, 108.0, 115.0, 118.0];
    let points: Vec<_> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| (start() + Duration::weeks(i as i64), v))
        .collect();
    WeeklySeries::from_values(&points).unwrap()
}

fn check_trained<T: TrainedForecastModel>(trained: &T, series: &WeeklySeries) {
    assert_eq!(trained.fitted().len(), series.len());
    assert_eq!(trained.observed(), series.values().as_slice());
    assert!(trained.residual_std().unwrap() >= 0.0);

    let forecast = trained.forecast(4).unwrap();
    assert_eq!(forecast.horizons(), 4);
    for value in forecast.values() {
        assert!(*value > 90.0 && *value < 140.0, "implausible forecast {}", value);
    }
}

#[test]
fn test_every_model_trains_and_forecasts() {
    let series = create_test_series();

    check_trained(&SimpleExponentialSmoothing::new(0.5).unwrap().train(&series).unwrap(), &series);
    check_trained(&HoltLinear::new(0.5, 0.1).unwrap().train(&series).unwrap(), &series);
    check_trained(&MovingAverage::new(4).unwrap().train(&series).unwrap(), &series);
    check_trained(&LinearTrend::new().train(&series).unwrap(), &series);
}

#[test]
fn test_provider_covers_history_and_horizon() {
    let series = create_test_series();
    let provider = ModelForecaster::new(LinearTrend::new(), 0.9).unwrap();

    let points = provider.forecast(&series, 3).unwrap();

    assert_eq!(points.len(), series.len() + 3);
    assert_eq!(points[0].date, start());
    assert_eq!(
        points.last().unwrap().date,
        series.last_date().unwrap() + Duration::weeks(3)
    );
    assert!(points
        .windows(2)
        .all(|w| w[1].date - w[0].date == Duration::weeks(1)));
    assert!(points
        .iter()
        .all(|p| p.lower_bound <= p.predicted && p.predicted <= p.upper_bound));

    // Future intervals widen with the horizon
    let widths: Vec<f64> = points[series.len()..]
        .iter()
        .map(|p| p.upper_bound - p.lower_bound)
        .collect();
    assert!(widths.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_perfect_fit_has_zero_width_intervals() {
    let points: Vec<_> = (0..6)
        .map(|i| (start() + Duration::weeks(i), 50.0 + 5.0 * i as f64))
        .collect();
    let series = WeeklySeries::from_values(&points).unwrap();
    let provider = ModelForecaster::new(LinearTrend::new(), 0.8).unwrap();

    let forecast = provider.forecast(&series, 2).unwrap();
    let last = forecast.last().unwrap();

    assert_relative_eq!(last.predicted, 85.0, epsilon = 1e-9);
    assert_relative_eq!(last.upper_bound - last.lower_bound, 0.0, epsilon = 1e-9);
}

#[rstest]
#[case(ModelKind::SimpleExponential)]
#[case(ModelKind::Holt)]
#[case(ModelKind::MovingAverage)]
#[case(ModelKind::LinearTrend)]
fn test_build_provider_for_each_kind(#[case] kind: ModelKind) {
    let settings = ModelSettings {
        kind,
        ..ModelSettings::default()
    };
    let provider = build_provider(&settings).unwrap();

    let points = provider.forecast(&create_test_series(), 2).unwrap();
    assert_eq!(points.len(), 10);
    assert!(!provider.name().is_empty());
}

#[test]
fn test_short_history_is_rejected() {
    let series = WeeklySeries::from_values(&[(start(), 10.0)]).unwrap();
    let provider = build_provider(&ModelSettings::default()).unwrap();

    assert!(provider.forecast(&series, 2).is_err());
    assert!(provider
        .forecast(&WeeklySeries::new(Vec::new()).unwrap(), 2)
        .is_err());
}
