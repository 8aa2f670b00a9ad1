/// Backend access for the tracker front-end
///
/// - `client` - JSON request facade with bearer-token injection and typed failures
/// - `trackers` - tracker and entry resources under `/trackers`
/// - `chat` - the `/chat` endpoint and the workout session endpoints
mod client;
pub mod chat;
pub mod trackers;

pub use client::{
    ApiClient, HttpRequest, HttpResponse, ReqwestTransport, RequestOptions, StaticToken,
    TokenSource, Transport, query_string,
};
