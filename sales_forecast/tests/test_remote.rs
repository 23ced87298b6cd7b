use sales_forecast::remote::{RemoteForecastClient, SalesPredictor};
use sales_forecast::ForecastError;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> RemoteForecastClient {
    RemoteForecastClient::new(format!("{}/predict", server.uri()), Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn test_well_formed_predictions_pass_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(json!({ "historical_data": [4.0, 5.0, 6.0], "days_to_predict": 3 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "predictions": [1, 2, 3] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let predictions = client.request_forecast(&[4.0, 5.0, 6.0], 3).await;
    assert_eq!(predictions, Some(vec![1.0, 2.0, 3.0]));
}

#[tokio::test]
async fn test_values_are_not_clamped_or_resized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "predictions": [-2.5] })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert_eq!(client.request_forecast(&[1.0], 4).await, Some(vec![-2.5]));
}

#[tokio::test]
async fn test_non_numeric_predictions_are_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "predictions": ["a", "b"] })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert_eq!(client.request_forecast(&[1.0, 2.0], 2).await, None);

    match client.predict_sales(&[1.0, 2.0], 2).await {
        Err(ForecastError::DataFormatError(_)) => {}
        other => panic!("Expected DataFormatError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_predictions_field_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "forecast": [1, 2] })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert_eq!(client.request_forecast(&[1.0], 2).await, None);
}

#[tokio::test]
async fn test_server_error_yields_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert_eq!(client.request_forecast(&[1.0], 2).await, None);
}

#[tokio::test]
async fn test_timeout_yields_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "predictions": [1] }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client =
        RemoteForecastClient::new(format!("{}/predict", server.uri()), Duration::from_millis(50))
            .unwrap();
    assert_eq!(client.request_forecast(&[1.0], 1).await, None);
}

#[tokio::test]
async fn test_connection_failure_yields_none() {
    let server = MockServer::start().await;
    let url = format!("{}/predict", server.uri());
    drop(server);

    let client = RemoteForecastClient::new(url, Duration::from_secs(1)).unwrap();
    assert_eq!(client.request_forecast(&[1.0], 1).await, None);

    match client.predict_sales(&[1.0], 1).await {
        Err(ForecastError::TransportError(_)) => {}
        other => panic!("Expected TransportError, got {:?}", other),
    }
}
