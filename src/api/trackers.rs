use super::ApiClient;
use crate::error::ApiResult;
use crate::types::{DeleteResponse, Entry, EntryCreate, Tracker, TrackerCreate, TrackerUpdate};

/// All trackers of the signed-in user.
pub async fn get_trackers(api: &ApiClient) -> ApiResult<Vec<Tracker>> {
    api.get("/trackers").await
}

pub async fn get_tracker(api: &ApiClient, tracker_id: &str) -> ApiResult<Tracker> {
    api.get(&format!("/trackers/{tracker_id}")).await
}

pub async fn create_tracker(api: &ApiClient, data: &TrackerCreate) -> ApiResult<Tracker> {
    api.post_json("/trackers", data).await
}

pub async fn update_tracker(
    api: &ApiClient,
    tracker_id: &str,
    data: &TrackerUpdate,
) -> ApiResult<Tracker> {
    api.put_json(&format!("/trackers/{tracker_id}"), data).await
}

/// Deletes the tracker and, on the backend, all of its entries.
pub async fn delete_tracker(api: &ApiClient, tracker_id: &str) -> ApiResult<DeleteResponse> {
    api.delete(&format!("/trackers/{tracker_id}")).await
}

/// Most recent entries first, as ordered by the backend.
pub async fn get_tracker_entries(
    api: &ApiClient,
    tracker_id: &str,
    limit: u32,
) -> ApiResult<Vec<Entry>> {
    api.get(&format!("/trackers/{tracker_id}/entries?limit={limit}"))
        .await
}

pub async fn create_entry(
    api: &ApiClient,
    tracker_id: &str,
    data: &EntryCreate,
) -> ApiResult<Entry> {
    api.post_json(&format!("/trackers/{tracker_id}/entries"), data)
        .await
}
