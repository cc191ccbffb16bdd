//! Source implementation for the CAU academic library bulletin API.
//!
//! The library is a non-authoritative source: any top-level failure here
//! (network, timeout, HTTP status, body decode) is logged and absorbed into
//! an empty result so the run can still report the main bulletin. Keep this
//! asymmetry with the CAU source; it is a criticality decision, not a bug.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use gongji_core::{
    model::{Notice, SourceId, SourceMeta},
    ports::{NoticePort, Posting, SourceError, collect_in_window},
    window::{TimeWindow, kst},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Top-level library response with its explicit success flag.
#[derive(Debug, Deserialize)]
struct LibraryResponse {
    #[serde(default)]
    success: bool,
    data: Option<LibraryData>,
}

/// Payload section; `list` can be null or missing.
#[derive(Debug, Deserialize)]
struct LibraryData {
    list: Option<Vec<LibraryItem>>,
}

/// Single posting from the library list.
///
/// `dateCreated` and `id` stay optional so one item lacking them fails its
/// own decode step instead of failing the whole body.
#[derive(Debug, Deserialize)]
struct LibraryItem {
    #[serde(rename = "dateCreated")]
    date_created: Option<String>,

    #[serde(default)]
    title: String,

    id: Option<LibraryItemId>,
}

/// The library API has served this id both as a number and as a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LibraryItemId {
    Number(i64),
    Text(String),
}

impl LibraryItemId {
    fn into_string(self) -> String {
        match self {
            LibraryItemId::Number(number) => number.to_string(),
            LibraryItemId::Text(text) => text,
        }
    }
}

/// Notice port for the CAU academic library bulletin.
pub struct LibrarySource {
    client: Client,
    meta: SourceMeta,
    website_url: String,
    api_url: String,
}

impl LibrarySource {
    /// Create a new port bound to the given HTTP client and endpoint URLs.
    #[must_use]
    pub fn new(client: Client, website_url: String, api_url: String) -> Self {
        Self {
            client,
            meta: source_meta(),
            website_url,
            api_url,
        }
    }

    fn decode_item(&self, item: LibraryItem) -> Result<Posting, SourceError> {
        let raw_timestamp = item
            .date_created
            .ok_or(SourceError::MissingField("dateCreated"))?;

        let posted_at = NaiveDateTime::parse_from_str(&raw_timestamp, TIMESTAMP_FORMAT)?
            .and_local_timezone(kst())
            .single()
            .ok_or_else(|| SourceError::Internal(String::from("ambiguous KST timestamp")))?;

        let id = item
            .id
            .ok_or(SourceError::MissingField("id"))?
            .into_string();

        Ok(Posting {
            posted_at,
            title: item.title,
            url: Some(format!("{}/{id}", self.website_url)),
        })
    }

    /// Pure tail of the pipeline, split out so payload-shape handling is
    /// testable without a live endpoint.
    fn normalize(&self, response: LibraryResponse, window: &TimeWindow) -> Vec<Notice> {
        if !response.success {
            return Vec::new();
        }

        let items = response
            .data
            .and_then(|data| data.list)
            .unwrap_or_default();

        collect_in_window(items, &self.meta, window, |item| self.decode_item(item))
    }

    async fn try_fetch(&self, window: &TimeWindow) -> Result<Vec<Notice>, SourceError> {
        let request = self.client.get(&self.api_url).timeout(REQUEST_TIMEOUT);

        let response = fetch_json::<LibraryResponse>(request).await?;

        Ok(self.normalize(response, window))
    }
}

#[async_trait]
impl NoticePort for LibrarySource {
    fn source(&self) -> &SourceMeta {
        &self.meta
    }

    async fn fetch(&self, window: &TimeWindow) -> Result<Vec<Notice>, SourceError> {
        match self.try_fetch(window).await {
            Ok(notices) => Ok(notices),
            Err(error) => {
                tracing::error!(source = %self.meta.id, %error, "library notice fetch failed; continuing without it");
                Ok(Vec::new())
            }
        }
    }
}

fn source_meta() -> SourceMeta {
    SourceMeta {
        id: SourceId(String::from("library")),
        label: String::from("학술정보원 공지"),
    }
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, SourceError> {
    request
        .send()
        .await
        .map_err(SourceError::from)?
        .error_for_status()
        .map_err(SourceError::from)?
        .json()
        .await
        .map_err(SourceError::from)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use serde_json::json;

    use super::*;

    fn source() -> LibrarySource {
        LibrarySource::new(
            Client::new(),
            String::from("https://library.cau.ac.kr/guide/bulletins/notice"),
            String::from("https://library.cau.ac.kr/pyxis-api/1/bulletin-boards/1/bulletins"),
        )
    }

    fn window() -> TimeWindow {
        let now = kst()
            .with_ymd_and_hms(2024, 3, 21, 15, 0, 0)
            .single()
            .expect("test instant is unambiguous");
        TimeWindow::ending_at(now)
    }

    fn response(body: serde_json::Value) -> LibraryResponse {
        serde_json::from_value(body).expect("test payload deserializes")
    }

    #[test]
    fn unsuccessful_response_yields_no_notices() {
        let body = json!({ "success": false, "data": { "list": [
            { "dateCreated": "2024-03-21 07:30:00", "title": "ignored", "id": 1 },
        ]}});

        assert!(source().normalize(response(body), &window()).is_empty());
    }

    #[test]
    fn missing_success_flag_counts_as_failure() {
        let body = json!({ "data": { "list": [] } });

        assert!(source().normalize(response(body), &window()).is_empty());
    }

    #[test]
    fn null_data_or_list_yields_no_notices() {
        assert!(source()
            .normalize(response(json!({ "success": true, "data": null })), &window())
            .is_empty());
        assert!(source()
            .normalize(
                response(json!({ "success": true, "data": { "list": null } })),
                &window()
            )
            .is_empty());
    }

    #[test]
    fn in_window_items_become_notices() {
        let body = json!({ "success": true, "data": { "list": [
            { "dateCreated": "2024-03-21 07:30:00", "title": "열람실 이용 안내", "id": 4242 },
        ]}});

        let notices = source().normalize(response(body), &window());

        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].title, "열람실 이용 안내");
        assert_eq!(notices[0].category, "학술정보원 공지");
        assert_eq!(notices[0].post_date, "2024-03-21 07:30");
        assert_eq!(
            notices[0].url.as_deref(),
            Some("https://library.cau.ac.kr/guide/bulletins/notice/4242")
        );
    }

    #[test]
    fn string_ids_are_accepted_too() {
        let body = json!({ "success": true, "data": { "list": [
            { "dateCreated": "2024-03-21 07:30:00", "title": "공지", "id": "abc-7" },
        ]}});

        let notices = source().normalize(response(body), &window());

        assert_eq!(
            notices[0].url.as_deref(),
            Some("https://library.cau.ac.kr/guide/bulletins/notice/abc-7")
        );
    }

    #[test]
    fn item_missing_date_or_id_is_skipped_not_fatal() {
        let body = json!({ "success": true, "data": { "list": [
            { "title": "날짜 없는 글", "id": 1 },
            { "dateCreated": "2024-03-21 07:30:00", "title": "링크 없는 글" },
            { "dateCreated": "2024-03-21 07:45:00", "title": "정상 글", "id": 2 },
        ]}});

        let notices = source().normalize(response(body), &window());

        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].title, "정상 글");
    }

    #[test]
    fn notices_are_ordered_by_post_date() {
        let body = json!({ "success": true, "data": { "list": [
            { "dateCreated": "2024-03-21 07:45:00", "title": "later", "id": 1 },
            { "dateCreated": "2024-03-21 07:30:00", "title": "earlier", "id": 2 },
        ]}});

        let notices = source().normalize(response(body), &window());

        assert_eq!(notices[0].title, "earlier");
        assert_eq!(notices[1].title, "later");
    }

    #[tokio::test]
    async fn transport_failure_is_absorbed_into_empty() {
        // Nothing listens on loopback port 9, so the connection is refused
        // locally without touching the network.
        let source = LibrarySource::new(
            Client::new(),
            String::from("https://library.cau.ac.kr/guide/bulletins/notice"),
            String::from("http://127.0.0.1:9/pyxis-api/1/bulletin-boards/1/bulletins"),
        );

        let notices = source
            .fetch(&window())
            .await
            .expect("library failures never abort the run");

        assert!(notices.is_empty());
    }
}
