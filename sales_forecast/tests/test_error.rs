use chrono::NaiveDate;
use sales_forecast::SalesError;
use sales_math::MathError;
use std::io;

#[test]
fn test_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let error = SalesError::from(io_error);
    assert!(matches!(error, SalesError::IoError(_)));

    let math_error = MathError::InsufficientData("need 2 points".to_string());
    let error = SalesError::from(math_error.clone());
    match error {
        SalesError::MathError(inner) => assert_eq!(inner, math_error),
        other => panic!("Expected MathError variant, got {:?}", other),
    }
}

#[test]
fn test_error_display() {
    let error = SalesError::DisjointSeries {
        forecast_start: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
        history_end: NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
    };
    let message = error.to_string();
    assert!(message.contains("2024-01-07"));
    assert!(message.contains("2024-01-14"));

    let error = SalesError::InvalidEntry {
        date: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
        reason: "no predicted value".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Invalid entry on 2025-01-05: no predicted value"
    );

    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let message = SalesError::from(io_error).to_string();
    assert!(message.contains("IO error"));
    assert!(message.contains("permission denied"));
}

#[test]
fn test_data_error_classification() {
    assert!(SalesError::ParseError("bad date".to_string()).is_data_error());
    assert!(SalesError::EmptyInput("no rows".to_string()).is_data_error());
    assert!(SalesError::MissingColumn("Purchase_Date".to_string()).is_data_error());
    assert!(!SalesError::InvalidParameter("alpha".to_string()).is_data_error());
    assert!(!SalesError::ForecastingError("too short".to_string()).is_data_error());
}
