//! Integration tests for the backend client facade and the domain endpoints
//!
//! Everything goes through an in-memory transport; no network is touched.

use async_trait::async_trait;
use lifetracker::api::{
    ApiClient, HttpRequest, HttpResponse, RequestOptions, StaticToken, TokenSource, Transport,
    chat, trackers,
};
use lifetracker::error::{ApiError, ApiResult};
use lifetracker::types::{Category, ChatRequest, ComponentKind, EntryCreate, TrackerCreate};
use reqwest::Method;
use serde_json::{Map, Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

const BASE: &str = "http://backend.test/api";

/// Records every request and answers from a queue of canned responses.
#[derive(Default)]
struct FakeTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<ApiResult<HttpResponse>>>,
}

impl FakeTransport {
    fn answering(status: u16, body: Value) -> Arc<Self> {
        let fake = Arc::new(Self::default());
        fake.push(status, body);
        fake
    }

    fn push(&self, status: u16, body: Value) {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
    }

    fn push_raw(&self, response: ApiResult<HttpResponse>) {
        self.responses.lock().unwrap().push_back(response);
    }

    fn last(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request sent")
    }

    fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(HttpResponse {
                status: 200,
                body: "null".into(),
            }))
    }
}

fn client(fake: &Arc<FakeTransport>, token: Option<&str>) -> ApiClient {
    let tokens: Arc<dyn TokenSource> = Arc::new(StaticToken::new(token.map(str::to_string)));
    ApiClient::new(BASE, fake.clone(), Some(tokens))
}

fn tracker_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "category": "fitness",
        "schema": {"weight": "number", "reps": "number"},
        "icon": "💪",
        "color": "#3b82f6",
        "created_at": "2024-01-15T10:30:00"
    })
}

mod facade_tests {
    use super::*;

    #[tokio::test]
    async fn test_default_content_type_and_bearer_token() {
        let fake = FakeTransport::answering(200, json!([]));
        let api = client(&fake, Some("abc123"));

        let _: Vec<Value> = api.get("/trackers").await.unwrap();

        let request = fake.last();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url, "http://backend.test/api/trackers");
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("Authorization"), Some("Bearer abc123"));
    }

    #[tokio::test]
    async fn test_no_authorization_without_token() {
        let fake = FakeTransport::answering(200, json!([]));
        let api = client(&fake, None);

        let _: Vec<Value> = api.get("/trackers").await.unwrap();
        assert_eq!(fake.last().header("Authorization"), None);

        let anonymous = ApiClient::new(BASE, fake.clone(), None);
        fake.push(200, json!([]));
        let _: Vec<Value> = anonymous.get("/trackers").await.unwrap();
        assert_eq!(fake.last().header("Authorization"), None);
    }

    /// Hands out a fresh token per call, like a refreshing auth provider.
    #[derive(Default)]
    struct RotatingToken {
        issued: Mutex<u32>,
    }

    #[async_trait(?Send)]
    impl TokenSource for RotatingToken {
        async fn token(&self) -> Option<String> {
            let mut issued = self.issued.lock().unwrap();
            *issued += 1;
            Some(format!("session-{issued}"))
        }
    }

    #[tokio::test]
    async fn test_registered_token_source_is_asked_per_request() {
        let fake = FakeTransport::answering(200, json!([]));
        fake.push(200, json!([]));
        let api = client(&fake, Some("static")).with_token_source(Arc::new(RotatingToken::default()));

        let _: Vec<Value> = api.get("/trackers").await.unwrap();
        assert_eq!(fake.last().header("Authorization"), Some("Bearer session-1"));

        let _: Vec<Value> = api.get("/trackers").await.unwrap();
        assert_eq!(fake.last().header("Authorization"), Some("Bearer session-2"));
    }

    #[tokio::test]
    async fn test_caller_headers_override_defaults() {
        let fake = FakeTransport::answering(200, json!({"ok": true}));
        let api = client(&fake, Some("abc123"));

        let options = RequestOptions::method(Method::POST)
            .with_header("content-type", "text/plain")
            .with_header("Authorization", "Bearer other");
        let _: Value = api.request("/upload", options).await.unwrap();

        let request = fake.last();
        let content_types = request
            .headers
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .count();
        assert_eq!(content_types, 1);
        assert_eq!(request.header("Content-Type"), Some("text/plain"));
        assert_eq!(request.header("authorization"), Some("Bearer other"));
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_dedicated_error() {
        let fake = FakeTransport::answering(401, json!({"detail": "Not authenticated"}));
        let api = client(&fake, Some("expired"));

        let result: ApiResult<Value> = api.get("/trackers").await;
        assert_eq!(result, Err(ApiError::Unauthorized));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Unauthorized - please sign in"
        );
    }

    #[tokio::test]
    async fn test_other_statuses_carry_the_code() {
        let fake = FakeTransport::answering(500, json!({"detail": "boom"}));
        let api = client(&fake, None);

        let result: ApiResult<Value> = api.get("/trackers").await;
        let err = result.unwrap_err();
        assert_eq!(err, ApiError::Status(500));
        assert_eq!(err.to_string(), "API Error: 500");

        fake.push(404, json!({}));
        let missing: ApiResult<Value> = api.get("/trackers/nope").await;
        assert_eq!(missing, Err(ApiError::Status(404)));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates_without_retry() {
        let fake = Arc::new(FakeTransport::default());
        fake.push_raw(Err(ApiError::Network("connection refused".into())));
        let api = client(&fake, None);

        let result: ApiResult<Value> = api.get("/trackers").await;
        assert_eq!(result, Err(ApiError::Network("connection refused".into())));
        assert_eq!(fake.count(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_success_body_is_decode_error() {
        let fake = Arc::new(FakeTransport::default());
        fake.push_raw(Ok(HttpResponse {
            status: 200,
            body: "<html>proxy page</html>".into(),
        }));
        let api = client(&fake, None);

        let result: ApiResult<Vec<Value>> = api.get("/trackers").await;
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }
}

mod tracker_endpoint_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_and_get_trackers() {
        let fake = FakeTransport::answering(200, json!([tracker_json("t1", "Bankdrücken")]));
        let api = client(&fake, None);

        let list = trackers::get_trackers(&api).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].category, Category::Fitness);
        assert_eq!(fake.last().url, format!("{BASE}/trackers"));

        fake.push(200, tracker_json("t1", "Bankdrücken"));
        let one = trackers::get_tracker(&api, "t1").await.unwrap();
        assert_eq!(one.name, "Bankdrücken");
        assert_eq!(fake.last().url, format!("{BASE}/trackers/t1"));
    }

    #[tokio::test]
    async fn test_create_sends_json_body() {
        let fake = FakeTransport::answering(200, tracker_json("t2", "Wasser"));
        let api = client(&fake, None);

        let create = TrackerCreate {
            name: "Wasser".into(),
            category: Category::Health,
            schema: Map::new(),
            icon: Some("💧".into()),
            color: None,
        };
        let created = trackers::create_tracker(&api, &create).await.unwrap();
        assert_eq!(created.id, "t2");

        let request = fake.last();
        assert_eq!(request.method, Method::POST);
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["name"], json!("Wasser"));
        assert_eq!(body["category"], json!("health"));
        assert_eq!(body["icon"], json!("💧"));
    }

    #[tokio::test]
    async fn test_delete_returns_message() {
        let fake = FakeTransport::answering(200, json!({"message": "Tracker deleted"}));
        let api = client(&fake, None);

        let response = trackers::delete_tracker(&api, "t1").await.unwrap();
        assert_eq!(response.message, "Tracker deleted");
        assert_eq!(fake.last().method, Method::DELETE);
        assert_eq!(fake.last().url, format!("{BASE}/trackers/t1"));
    }

    #[tokio::test]
    async fn test_entries_use_limit_query() {
        let fake = FakeTransport::answering(
            200,
            json!([{
                "id": "e1",
                "tracker_id": "t1",
                "data": {"weight": 80, "reps": 10},
                "notes": null,
                "timestamp": "2024-01-15T10:30:00",
                "created_at": "2024-01-15T10:30:00"
            }]),
        );
        let api = client(&fake, None);

        let entries = trackers::get_tracker_entries(&api, "t1", 50).await.unwrap();
        assert_eq!(entries[0].data["weight"], json!(80));
        assert_eq!(fake.last().url, format!("{BASE}/trackers/t1/entries?limit=50"));
    }

    #[tokio::test]
    async fn test_create_entry_posts_to_tracker() {
        let fake = FakeTransport::answering(
            200,
            json!({
                "id": "e2",
                "tracker_id": "t1",
                "data": {"reps": 12},
                "timestamp": "2024-01-15T11:00:00Z"
            }),
        );
        let api = client(&fake, None);

        let mut data = Map::new();
        data.insert("reps".into(), json!(12));
        let entry = EntryCreate {
            data,
            notes: None,
            timestamp: None,
        };
        let created = trackers::create_entry(&api, "t1", &entry).await.unwrap();
        assert_eq!(created.id, "e2");

        let request = fake.last();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, format!("{BASE}/trackers/t1/entries"));
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["data"], json!({"reps": 12}));
    }
}

mod chat_endpoint_tests {
    use super::*;

    #[tokio::test]
    async fn test_send_chat_round_trip() {
        let fake = FakeTransport::answering(
            200,
            json!({
                "action": "query",
                "message": "",
                "data": {"title": "Steps", "value": 8421},
                "component": "stat-card"
            }),
        );
        let api = client(&fake, Some("tok"));

        let request = ChatRequest {
            message: "Wie viele Schritte?".into(),
            context: None,
        };
        let response = chat::send_chat(&api, &request).await.unwrap();
        assert_eq!(response.component, Some(ComponentKind::StatCard));

        let sent = fake.last();
        assert_eq!(sent.url, format!("{BASE}/chat"));
        let body: Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"message": "Wie viele Schritte?"}));
    }

    #[tokio::test]
    async fn test_workout_endpoints() {
        let fake = FakeTransport::answering(
            200,
            json!({"status": "workout_started", "routine": "Push Tag"}),
        );
        let api = client(&fake, None);

        let started = chat::start_workout(&api, Some("Push Tag")).await.unwrap();
        assert_eq!(started.routine.as_deref(), Some("Push Tag"));
        assert_eq!(
            fake.last().url,
            format!("{BASE}/chat/workout/start?routine_name=Push+Tag")
        );

        fake.push(
            200,
            json!({
                "status": "workout_ended",
                "summary": {"duration": 45, "exercises_completed": 3, "completed_exercises": []}
            }),
        );
        let ended = chat::end_workout(&api).await.unwrap();
        assert_eq!(ended.summary.duration, Some(45));
        assert_eq!(ended.summary.exercises_completed, 3);
        assert_eq!(fake.last().url, format!("{BASE}/chat/workout/end"));
    }

    #[tokio::test]
    async fn test_history_query() {
        let fake = FakeTransport::answering(200, json!([]));
        let api = client(&fake, None);

        chat::chat_history(&api, Some("Wasser"), 10).await.unwrap();
        assert_eq!(
            fake.last().url,
            format!("{BASE}/chat/history?limit=10&tracker=Wasser")
        );
    }
}
