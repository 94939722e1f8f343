use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use super::setup::TestApp;

// ============================================================================
// Action Helpers
// ============================================================================

impl TestApp {
    /// Send a JSON request and return the status with the decoded body
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body), None).await
    }

    pub async fn post_authed(&self, uri: &str, body: Value, token: &str) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body), Some(token)).await
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    /// Register the sample doctor and log in, returning the bearer token
    pub async fn login_doctor(&self) -> String {
        let (status, _) = self.post("/doctors/register", doctor()).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = self
            .post(
                "/doctors/login",
                json!({"email": "john.doe@example.com", "password": "password123"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn register_program(&self, name: &str, symptoms: &str, severity: i32) {
        let (status, _) = self
            .post(
                "/programs/register",
                json!({"name": name, "symptoms": symptoms, "severity": severity}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    pub async fn search(&self, phonenumber: &str) -> (StatusCode, Value) {
        self.post("/clients/search", json!({"phonenumber": phonenumber}))
            .await
    }
}

pub fn doctor() -> Value {
    json!({
        "firstname": "John",
        "lastname": "Doe",
        "email": "john.doe@example.com",
        "phonenumber": "1234567890",
        "department": "Cardiology",
        "password": "password123"
    })
}

pub fn john_doe() -> Value {
    json!({
        "firstname": "John",
        "lastname": "Doe",
        "phonenumber": "0115491173",
        "age": 10,
        "height": 180,
        "weight": 80,
        "emergency_contact": "father",
        "emergency_number": "0987654321"
    })
}
