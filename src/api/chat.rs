use super::{ApiClient, client::query_string};
use crate::error::ApiResult;
use crate::types::{ChatRequest, ChatResponse, Entry, WorkoutEnded, WorkoutStarted};
use serde_json::Value;

pub async fn send_chat(api: &ApiClient, request: &ChatRequest) -> ApiResult<ChatResponse> {
    api.post_json("/chat", request).await
}

/// Opens a workout session on the backend so tracked sets count towards it.
pub async fn start_workout(api: &ApiClient, routine: Option<&str>) -> ApiResult<WorkoutStarted> {
    let query = match routine {
        Some(name) => query_string(&[("routine_name", name)]),
        None => String::new(),
    };
    api.post_json(&format!("/chat/workout/start{query}"), &Value::Null)
        .await
}

pub async fn end_workout(api: &ApiClient) -> ApiResult<WorkoutEnded> {
    api.post_json("/chat/workout/end", &Value::Null).await
}

/// Recently tracked entries across trackers, optionally narrowed to one
/// tracker name.
pub async fn chat_history(
    api: &ApiClient,
    tracker: Option<&str>,
    limit: u32,
) -> ApiResult<Vec<Entry>> {
    let limit = limit.to_string();
    let mut pairs = vec![("limit", limit.as_str())];
    if let Some(name) = tracker {
        pairs.push(("tracker", name));
    }
    api.get(&format!("/chat/history{}", query_string(&pairs)))
        .await
}
