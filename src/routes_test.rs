use super::*;

#[test]
fn health_reports_ok_and_backend() {
    assert_eq!(
        health("http://localhost:8000"),
        Health {
            status: "ok",
            backend: "http://localhost:8000".to_owned(),
        }
    );
}

#[tokio::test]
async fn healthz_handler_serializes_status() {
    let handler = healthz_handler("https://api.example.com".to_owned());
    let Json(body) = handler().await;
    let value = serde_json::to_value(&body).unwrap();
    assert_eq!(value, serde_json::json!({ "status": "ok", "backend": "https://api.example.com" }));
}
