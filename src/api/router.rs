use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::auth;
use super::events;
use super::health;
use super::middleware::logging_middleware;
use super::state::AppState;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    let api = Router::new()
        .merge(auth::create_auth_router())
        .merge(events::create_events_router());

    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Token endpoints and the events resource
        .nest("/api", api)
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::domain::user::User;
    use crate::infrastructure::auth::{JwtConfig, JwtGenerator, JwtService};
    use crate::infrastructure::event::{EventService, InMemoryEventRepository};
    use crate::infrastructure::user::{
        Argon2Hasher, CreateUserRequest, InMemoryUserRepository, UserService,
    };

    fn test_state() -> AppState {
        AppState::new(
            Arc::new(UserService::new(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(Argon2Hasher::new()),
            )),
            Arc::new(EventService::new(Arc::new(InMemoryEventRepository::new()))),
            Arc::new(JwtService::new(JwtConfig::new("test-secret", 5, 24))),
        )
    }

    async fn create_user(state: &AppState, username: &str) -> User {
        state
            .user_service
            .create(CreateUserRequest {
                username: username.to_string(),
                password: format!("{}_password", username),
            })
            .await
            .unwrap()
    }

    fn access_token(state: &AppState, user: &User) -> String {
        state.jwt_service.issue_access(user).unwrap()
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("JWT {}", token));
        }

        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(state: &AppState, req: Request<Body>) -> Response {
        create_router_with_state(state.clone()).oneshot(req).await.unwrap()
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 64)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn important_task() -> Value {
        json!({
            "day_of_week": 0,
            "start_time": "10:00",
            "finish_time": "10:15",
            "title": "Important task",
            "description": "Some informative description"
        })
    }

    async fn create_event(state: &AppState, token: &str, body: Value) -> Value {
        let resp = send(state, request("POST", "/api/events", Some(token), Some(body))).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        body_json(resp).await
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let state = test_state();

        let resp = send(&state, request("GET", "/health", None, None)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "healthy");

        let resp = send(&state, request("GET", "/live", None, None)).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = send(&state, request("GET", "/ready", None, None)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["checks"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_token_obtain_and_refresh() {
        let state = test_state();
        create_user(&state, "boris").await;

        let resp = send(
            &state,
            request(
                "POST",
                "/api/token",
                None,
                Some(json!({"username": "boris", "password": "boris_password"})),
            ),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let pair = body_json(resp).await;
        let access = pair["access"].as_str().unwrap().to_string();
        let refresh = pair["refresh"].as_str().unwrap().to_string();

        let resp = send(&state, request("GET", "/api/me", Some(&access), None)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let me = body_json(resp).await;
        assert_eq!(me["username"], "boris");
        assert!(me.get("password_hash").is_none());

        let resp = send(
            &state,
            request("POST", "/api/refresh", None, Some(json!({"refresh": refresh}))),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_json(resp).await["access"].is_string());

        // An access token is not a refresh token
        let resp = send(
            &state,
            request("POST", "/api/refresh", None, Some(json!({"refresh": access}))),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_token_rejects_bad_credentials() {
        let state = test_state();
        create_user(&state, "boris").await;

        let resp = send(
            &state,
            request(
                "POST",
                "/api/token",
                None,
                Some(json!({"username": "boris", "password": "wrong_password"})),
            ),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(resp).await["error"]["type"],
            "authentication_error"
        );
    }

    #[tokio::test]
    async fn test_events_require_access_token() {
        let state = test_state();
        let boris = create_user(&state, "boris").await;

        let resp = send(&state, request("GET", "/api/events", None, None)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = send(&state, request("GET", "/api/events", Some("garbage"), None)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let refresh = state.jwt_service.issue_pair(&boris).unwrap().refresh;
        let resp = send(&state, request("GET", "/api/events", Some(&refresh), None)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = send(
            &state,
            request("POST", "/api/events", None, Some(important_task())),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(state.event_service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_bearer_scheme_is_accepted() {
        let state = test_state();
        let boris = create_user(&state, "boris").await;
        let token = access_token(&state, &boris);

        let req = Request::builder()
            .uri("/api/events")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        let resp = send(&state, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!([]));
    }

    #[tokio::test]
    async fn test_create_and_retrieve_event() {
        let state = test_state();
        let boris = create_user(&state, "boris").await;
        let token = access_token(&state, &boris);

        let created = create_event(&state, &token, important_task()).await;
        assert_eq!(created["day_of_week"], 0);
        assert_eq!(created["start_time"], "10:00:00");
        assert_eq!(created["finish_time"], "10:15:00");
        assert_eq!(created["owner"], boris.id().to_string());

        let uri = format!("/api/events/{}", created["id"].as_str().unwrap());
        let resp = send(&state, request("GET", &uri, Some(&token), None)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, created);
    }

    #[tokio::test]
    async fn test_payload_owner_is_ignored() {
        let state = test_state();
        let boris = create_user(&state, "boris").await;
        let ivan = create_user(&state, "ivan").await;
        let token = access_token(&state, &boris);

        let mut body = important_task();
        body["owner"] = json!(ivan.id().to_string());

        let created = create_event(&state, &token, body).await;
        assert_eq!(created["owner"], boris.id().to_string());
    }

    #[tokio::test]
    async fn test_create_validation_errors() {
        let state = test_state();
        let boris = create_user(&state, "boris").await;
        let token = access_token(&state, &boris);

        let mut bad_day = important_task();
        bad_day["day_of_week"] = json!(7);
        let resp = send(&state, request("POST", "/api/events", Some(&token), Some(bad_day))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"]["param"], "day_of_week");

        let mut reversed = important_task();
        reversed["start_time"] = json!("15:10");
        reversed["finish_time"] = json!("15:00");
        let resp = send(&state, request("POST", "/api/events", Some(&token), Some(reversed))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"]["code"], "non_field_error");

        let mut equal = important_task();
        equal["finish_time"] = json!("10:00");
        let resp = send(&state, request("POST", "/api/events", Some(&token), Some(equal))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = send(
            &state,
            request("POST", "/api/events", Some(&token), Some(json!({"title": "No times"}))),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"]["code"], "json_parse_error");

        assert_eq!(state.event_service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_uniqueness_per_owner() {
        let state = test_state();
        let boris = create_user(&state, "boris").await;
        let ivan = create_user(&state, "ivan").await;
        let boris_token = access_token(&state, &boris);
        let ivan_token = access_token(&state, &ivan);

        create_event(&state, &boris_token, important_task()).await;
        create_event(&state, &ivan_token, important_task()).await;

        let resp = send(
            &state,
            request("POST", "/api/events", Some(&boris_token), Some(important_task())),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"]["code"], "unique");
    }

    #[tokio::test]
    async fn test_list_is_scoped_and_ordered() {
        let state = test_state();
        let boris = create_user(&state, "boris").await;
        let ivan = create_user(&state, "ivan").await;
        let boris_token = access_token(&state, &boris);
        let ivan_token = access_token(&state, &ivan);

        for (day, start, finish, title) in [
            (2, "9:00", "10:00", "b"),
            (0, "11:00", "12:00", "a"),
            (2, "9:00", "9:30", "z"),
        ] {
            create_event(
                &state,
                &boris_token,
                json!({"day_of_week": day, "start_time": start, "finish_time": finish, "title": title}),
            )
            .await;
        }
        create_event(&state, &ivan_token, important_task()).await;

        let resp = send(&state, request("GET", "/api/events", Some(&boris_token), None)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let titles: Vec<String> = body_json(resp)
            .await
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(titles, vec!["a", "z", "b"]);
    }

    #[tokio::test]
    async fn test_partial_update_merges_stored_values() {
        let state = test_state();
        let boris = create_user(&state, "boris").await;
        let token = access_token(&state, &boris);
        let created = create_event(&state, &token, important_task()).await;
        let uri = format!("/api/events/{}", created["id"].as_str().unwrap());

        let resp = send(
            &state,
            request("PATCH", &uri, Some(&token), Some(json!({"finish_time": "10:30"}))),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let patched = body_json(resp).await;
        assert_eq!(patched["finish_time"], "10:30:00");
        assert_eq!(patched["title"], "Important task");

        let resp = send(
            &state,
            request("PATCH", &uri, Some(&token), Some(json!({"start_time": "10:31"}))),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = send(
            &state,
            request("PATCH", &uri, Some(&token), Some(json!({"finish_time": "9:00"}))),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        // Rejected patches leave the row untouched
        let resp = send(&state, request("GET", &uri, Some(&token), None)).await;
        assert_eq!(body_json(resp).await["finish_time"], "10:30:00");
    }

    #[tokio::test]
    async fn test_full_update() {
        let state = test_state();
        let boris = create_user(&state, "boris").await;
        let token = access_token(&state, &boris);
        let created = create_event(&state, &token, important_task()).await;
        let uri = format!("/api/events/{}", created["id"].as_str().unwrap());

        let resp = send(
            &state,
            request(
                "PUT",
                &uri,
                Some(&token),
                Some(json!({"day_of_week": 4, "start_time": "18:00", "finish_time": "19:30", "title": "Gym"})),
            ),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let updated = body_json(resp).await;
        assert_eq!(updated["id"], created["id"]);
        assert_eq!(updated["day_of_week"], 4);
        assert_eq!(updated["description"], "");
        assert_eq!(updated["created_ts"], created["created_ts"]);

        let resp = send(
            &state,
            request("PUT", &uri, Some(&token), Some(json!({"title": "Missing times"}))),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_foreign_event_is_forbidden() {
        let state = test_state();
        let boris = create_user(&state, "boris").await;
        let hacker = create_user(&state, "hacker").await;
        let boris_token = access_token(&state, &boris);
        let hacker_token = access_token(&state, &hacker);

        let created = create_event(&state, &boris_token, important_task()).await;
        let uri = format!("/api/events/{}", created["id"].as_str().unwrap());

        let attempts = [
            request("GET", &uri, Some(&hacker_token), None),
            request("PUT", &uri, Some(&hacker_token), Some(important_task())),
            request("PATCH", &uri, Some(&hacker_token), Some(json!({"title": "Pwned"}))),
            request("DELETE", &uri, Some(&hacker_token), None),
        ];

        for attempt in attempts {
            let resp = send(&state, attempt).await;
            assert_eq!(resp.status(), StatusCode::FORBIDDEN);
            assert_eq!(body_json(resp).await["error"]["type"], "permission_error");
        }

        let resp = send(&state, request("GET", &uri, Some(&boris_token), None)).await;
        assert_eq!(body_json(resp).await, created);
    }

    #[tokio::test]
    async fn test_ownership_is_checked_before_body() {
        let state = test_state();
        let boris = create_user(&state, "boris").await;
        let hacker = create_user(&state, "hacker").await;
        let boris_token = access_token(&state, &boris);
        let hacker_token = access_token(&state, &hacker);

        let created = create_event(&state, &boris_token, important_task()).await;
        let uri = format!("/api/events/{}", created["id"].as_str().unwrap());

        let resp = send(
            &state,
            request("PUT", &uri, Some(&hacker_token), Some(json!({"title": "Pwned"}))),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = send(
            &state,
            request("PATCH", &uri, Some(&hacker_token), Some(json!({"start_time": "noon"}))),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let unknown = format!("/api/events/{}", uuid::Uuid::new_v4());
        let resp = send(
            &state,
            request("PUT", &unknown, Some(&boris_token), Some(json!({"title": "x"}))),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = send(
            &state,
            request("PATCH", &unknown, Some(&boris_token), Some(json!({"start_time": "noon"}))),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        // The owner still gets the body error
        let resp = send(
            &state,
            request("PATCH", &uri, Some(&boris_token), Some(json!({"start_time": "noon"}))),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"]["code"], "json_parse_error");
    }

    #[tokio::test]
    async fn test_update_payload_owner_is_ignored() {
        let state = test_state();
        let boris = create_user(&state, "boris").await;
        let ivan = create_user(&state, "ivan").await;
        let boris_token = access_token(&state, &boris);
        let ivan_token = access_token(&state, &ivan);

        let created = create_event(&state, &boris_token, important_task()).await;
        let uri = format!("/api/events/{}", created["id"].as_str().unwrap());

        let mut replacement = important_task();
        replacement["title"] = json!("Replaced");
        replacement["owner"] = json!(ivan.id().to_string());
        let resp = send(&state, request("PUT", &uri, Some(&boris_token), Some(replacement))).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["owner"], boris.id().to_string());

        let resp = send(
            &state,
            request(
                "PATCH",
                &uri,
                Some(&boris_token),
                Some(json!({"title": "Patched", "owner": ivan.id().to_string()})),
            ),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["owner"], boris.id().to_string());

        let resp = send(&state, request("GET", &uri, Some(&boris_token), None)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let stored = body_json(resp).await;
        assert_eq!(stored["owner"], boris.id().to_string());
        assert_eq!(stored["title"], "Patched");

        let resp = send(&state, request("GET", &uri, Some(&ivan_token), None)).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_fractional_times_round_trip() {
        let state = test_state();
        let boris = create_user(&state, "boris").await;
        let token = access_token(&state, &boris);

        let created = create_event(
            &state,
            &token,
            json!({"start_time": "10:00:00.250", "finish_time": "10:00:00.750", "title": "Blink"}),
        )
        .await;
        assert_eq!(created["start_time"], "10:00:00.250000");
        assert_eq!(created["finish_time"], "10:00:00.750000");

        let uri = format!("/api/events/{}", created["id"].as_str().unwrap());
        let resp = send(&state, request("GET", &uri, Some(&token), None)).await;
        assert_eq!(body_json(resp).await, created);
    }

    #[tokio::test]
    async fn test_delete_event() {
        let state = test_state();
        let boris = create_user(&state, "boris").await;
        let token = access_token(&state, &boris);
        let created = create_event(&state, &token, important_task()).await;
        let uri = format!("/api/events/{}", created["id"].as_str().unwrap());

        let resp = send(&state, request("DELETE", &uri, Some(&token), None)).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        assert!(bytes.is_empty());

        let resp = send(&state, request("GET", &uri, Some(&token), None)).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(state.event_service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids_are_not_found() {
        let state = test_state();
        let boris = create_user(&state, "boris").await;
        let token = access_token(&state, &boris);

        let uri = format!("/api/events/{}", uuid::Uuid::new_v4());
        let resp = send(&state, request("GET", &uri, Some(&token), None)).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = send(&state, request("GET", "/api/events/42", Some(&token), None)).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_suspended_user_token_is_rejected() {
        let state = test_state();
        let boris = create_user(&state, "boris").await;
        let token = access_token(&state, &boris);

        state.user_service.suspend("boris").await.unwrap();

        let resp = send(&state, request("GET", "/api/events", Some(&token), None)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
