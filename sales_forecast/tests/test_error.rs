use sales_forecast::error::ForecastError;
use sales_math::MathError;
use std::io;

#[test]
fn test_error_conversion() {
    // Test IO error conversion
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let forecast_error = ForecastError::from(io_error);

    match forecast_error {
        ForecastError::IoError(_) => {}
        _ => panic!("Expected IoError variant"),
    }

    // Math errors carry through unchanged
    let math_error = MathError::InsufficientData("need 3 points".to_string());
    match ForecastError::from(math_error.clone()) {
        ForecastError::MathError(inner) => assert_eq!(inner, math_error),
        _ => panic!("Expected MathError variant"),
    }
}

#[test]
fn test_csv_error_conversion() {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader("a,b\nc".as_bytes());
    let err = reader
        .records()
        .find_map(|r| r.err())
        .expect("uneven rows should fail");

    match ForecastError::from(err) {
        ForecastError::CsvError(_) => {}
        other => panic!("Expected CsvError variant, got {:?}", other),
    }
}

#[test]
fn test_error_display() {
    let error = ForecastError::DataFormatError("historical sales data is not an array".to_string());
    assert_eq!(
        error.to_string(),
        "Data format error: historical sales data is not an array"
    );

    let error = ForecastError::TransportError("failed to fetch realtime sales data: refused".to_string());
    assert!(error.to_string().starts_with("Transport error: "));
}

#[test]
fn test_error_kind_helpers() {
    assert!(ForecastError::DataFormatError(String::new()).is_data_format());
    assert!(!ForecastError::DataFormatError(String::new()).is_transport());
    assert!(ForecastError::TransportError(String::new()).is_transport());
    assert!(!ForecastError::ValidationError(String::new()).is_data_format());
}
