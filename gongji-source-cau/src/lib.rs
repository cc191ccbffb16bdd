//! Source implementation for the CAU institutional bulletin API.
//!
//! This is the authoritative source: transport failures here abort the whole
//! run instead of degrading to an empty result.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use gongji_core::{
    model::{Notice, SourceId, SourceMeta},
    ports::{NoticePort, Posting, SourceError, collect_in_window},
    window::{TimeWindow, kst},
};

// Query parameters selecting the general notice board of the main site.
const SITE_NO: &str = "2";
const BOARD_SEQ: &str = "4";
const MENU_ID: &str = "100";
const CONTENTS_NO: &str = "1";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Top-level bulletin response. `data` is null on some error pages.
#[derive(Debug, Deserialize)]
struct BulletinResponse {
    data: Option<BulletinData>,
}

/// Payload section of the bulletin response; `list` can be null as well.
#[derive(Debug, Deserialize)]
struct BulletinData {
    list: Option<Vec<BulletinItem>>,
}

/// Single posting from the bulletin list.
///
/// `WRITE_DT` stays optional here so a single item without it fails its own
/// decode step instead of failing body deserialization for the whole batch.
#[derive(Debug, Deserialize)]
struct BulletinItem {
    #[serde(rename = "WRITE_DT")]
    write_dt: Option<String>,

    #[serde(rename = "SUBJECT", default)]
    subject: String,

    #[serde(rename = "BBS_SEQ", default)]
    bbs_seq: String,
}

/// Notice port for the CAU main bulletin.
pub struct CauSource {
    client: Client,
    meta: SourceMeta,
    website_url: String,
    api_url: String,
}

impl CauSource {
    /// Create a new port bound to the given HTTP client and endpoint URLs.
    ///
    /// `website_url` is the human-facing bulletin page used to build notice
    /// links; `api_url` is the JSON list endpoint.
    #[must_use]
    pub fn new(client: Client, website_url: String, api_url: String) -> Self {
        Self {
            client,
            meta: source_meta(),
            website_url,
            api_url,
        }
    }

    fn decode_item(&self, item: BulletinItem) -> Result<Posting, SourceError> {
        let raw_timestamp = item.write_dt.ok_or(SourceError::MissingField("WRITE_DT"))?;

        // Upstream sometimes appends fractional seconds; drop them before parsing.
        let truncated = raw_timestamp
            .split('.')
            .next()
            .unwrap_or(raw_timestamp.as_str());

        let posted_at = NaiveDateTime::parse_from_str(truncated, TIMESTAMP_FORMAT)?
            .and_local_timezone(kst())
            .single()
            .ok_or_else(|| SourceError::Internal(String::from("ambiguous KST timestamp")))?;

        let url = Url::parse_with_params(
            &self.website_url,
            &[
                ("MENU_ID", MENU_ID),
                ("CONTENTS_NO", CONTENTS_NO),
                ("SITE_NO", SITE_NO),
                ("BOARD_SEQ", BOARD_SEQ),
                ("BBS_SEQ", item.bbs_seq.as_str()),
            ],
        )
        .map_err(|error| SourceError::Internal(error.to_string()))?;

        Ok(Posting {
            posted_at,
            title: item.subject,
            url: Some(url.to_string()),
        })
    }

    /// Pure tail of the pipeline, split out so payload-shape handling is
    /// testable without a live endpoint.
    fn normalize(&self, response: BulletinResponse, window: &TimeWindow) -> Vec<Notice> {
        let items = response
            .data
            .and_then(|data| data.list)
            .unwrap_or_default();

        collect_in_window(items, &self.meta, window, |item| self.decode_item(item))
    }
}

#[async_trait]
impl NoticePort for CauSource {
    fn source(&self) -> &SourceMeta {
        &self.meta
    }

    async fn fetch(&self, window: &TimeWindow) -> Result<Vec<Notice>, SourceError> {
        // Deliberately no request timeout: this source is authoritative and
        // we accept its upstream contract as-is.
        let request = self
            .client
            .get(&self.api_url)
            .query(&[("SITE_NO", SITE_NO), ("BOARD_SEQ", BOARD_SEQ)]);

        let response = fetch_json::<BulletinResponse>(request).await?;

        Ok(self.normalize(response, window))
    }
}

fn source_meta() -> SourceMeta {
    SourceMeta {
        id: SourceId(String::from("cau")),
        label: String::from("CAU 공지"),
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
