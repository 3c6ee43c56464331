//! Integration tests for the health check and CORS relay

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use tower::util::ServiceExt;

    use crate::test_utils::{body_to_json, body_to_string, test_app};

    fn assert_cors_headers(headers: &http::HeaderMap) {
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, PUT, DELETE, OPTIONS, PATCH"
        );
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type, Authorization, X-Requested-With, Accept, Origin, X-Client-Info, apikey"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "86400");
    }

    fn proxy_request(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/proxy")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// Tests the health endpoint reports a healthy relay
    #[tokio::test]
    async fn it_reports_health() {
        let app = test_app("");

        for uri in ["/health", "/"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert_cors_headers(response.headers());
            let body = body_to_json(response.into_body()).await;
            assert_eq!(body["status"], "healthy");
            assert_eq!(body["cors"], "enabled");
            assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
        }
    }

    /// Tests preflight requests get an empty 200 on any path
    #[tokio::test]
    async fn it_answers_preflight_requests() {
        let app = test_app("");

        for uri in ["/proxy", "/api/calendar", "/does/not/exist"] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method(Method::OPTIONS)
                        .uri(uri)
                        .header("origin", "https://dashboard.example.com")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert_cors_headers(response.headers());
            assert!(body_to_string(response.into_body()).await.is_empty());
        }
    }

    /// Tests unknown paths return the JSON 404 body
    #[tokio::test]
    async fn it_returns_404_for_unknown_paths() {
        let app = test_app("");

        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_cors_headers(response.headers());
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["error"], "Endpoint not found");
        let endpoints = body["available_endpoints"].as_array().unwrap();
        assert!(endpoints.iter().any(|e| e == "/proxy"));
        assert!(endpoints.iter().any(|e| e == "/health"));
    }

    /// Tests the relay only accepts POST
    #[tokio::test]
    async fn it_returns_404_for_proxy_without_post() {
        let app = test_app("");

        let response = app
            .oneshot(Request::builder().uri("/proxy").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_cors_headers(response.headers());
    }

    /// Tests the relay rejects requests without a target URL
    #[tokio::test]
    async fn it_requires_a_url() {
        let app = test_app("");

        let response = app
            .oneshot(proxy_request(r#"{"method": "GET"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_cors_headers(response.headers());
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["error"], "URL is required");
    }

    /// Tests malformed relay requests produce the JSON 500 body
    #[tokio::test]
    async fn it_returns_500_for_malformed_requests() {
        let app = test_app("");

        for payload in [
            "not json",
            r#"{"url": "http://127.0.0.1:1/", "method": "NOT A METHOD"}"#,
            r#"{"url": "::not a url::"}"#,
        ] {
            let response = app.clone().oneshot(proxy_request(payload)).await.unwrap();

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{payload}");
            assert_cors_headers(response.headers());
            let body = body_to_json(response.into_body()).await;
            assert_eq!(body["error"], "Internal server error");
            assert!(body["message"].is_string());
        }
    }

    /// Tests the relay forwards method, headers and body and returns the
    /// upstream response verbatim
    #[tokio::test]
    async fn it_forwards_requests() {
        let mut server = mockito::Server::new_async().await;
        let upstream = server
            .mock("PUT", "/items/7")
            .match_header("x-client-info", "dashboard")
            .match_body(mockito::Matcher::Json(serde_json::json!({"name": "widget"})))
            .with_status(201)
            .with_header("content-type", "text/plain")
            .with_body("created")
            .create_async()
            .await;

        let app = test_app("");
        let payload = serde_json::json!({
            "url": format!("{}/items/7", server.url()),
            "method": "put",
            "headers": {"X-Client-Info": "dashboard"},
            "body": {"name": "widget"},
        });
        let response = app
            .oneshot(proxy_request(&payload.to_string()))
            .await
            .unwrap();

        upstream.assert_async().await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        assert_cors_headers(response.headers());
        assert_eq!(body_to_string(response.into_body()).await, "created");
    }

    /// Tests a missing or empty method is sent as GET
    #[tokio::test]
    async fn it_defaults_to_get() {
        let mut server = mockito::Server::new_async().await;
        let upstream = server
            .mock("GET", "/items")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .expect(2)
            .create_async()
            .await;

        let app = test_app("");
        for payload in [
            serde_json::json!({"url": format!("{}/items", server.url())}),
            serde_json::json!({"url": format!("{}/items", server.url()), "method": ""}),
        ] {
            let response = app
                .clone()
                .oneshot(proxy_request(&payload.to_string()))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_to_string(response.into_body()).await, "[]");
        }

        upstream.assert_async().await;
    }

    /// Tests upstream errors pass through untouched
    #[tokio::test]
    async fn it_passes_upstream_errors_through() {
        let mut server = mockito::Server::new_async().await;
        let _upstream = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "no such thing"}"#)
            .create_async()
            .await;

        let app = test_app("");
        let payload = serde_json::json!({"url": format!("{}/missing", server.url())});
        let response = app
            .oneshot(proxy_request(&payload.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["message"], "no such thing");
    }
}
