use anyhow::{Context, Result, bail};
use gongji_core::model::Notice;
use reqwest::Client;
use serde::Serialize;

use crate::config::BotConfig;

const DISCORD_API_BASE: &str = "https://discord.com/api/v10";
const EMBED_COLOR_BLUE: u32 = 0x0034_98DB;

// Discord embed limits.
const FIELD_NAME_LIMIT: usize = 256;
const FIELD_VALUE_LIMIT: usize = 1024;

#[derive(Debug, Serialize)]
pub(crate) struct Embed {
    title: String,
    color: u32,
    fields: Vec<EmbedField>,
}

#[derive(Debug, Serialize)]
struct EmbedField {
    name: String,
    value: String,
    inline: bool,
}

/// Build the daily embed, one field per notice plus the fixed Rainbow-system
/// links. Returns `None` when there is nothing to report.
pub(crate) fn notice_embed(notices: &[Notice]) -> Option<Embed> {
    if notices.is_empty() {
        return None;
    }

    let mut fields: Vec<EmbedField> = notices
        .iter()
        .map(|notice| {
            let name = format!("[{}] {}", notice.category, notice.title);

            let value = match notice.url.as_deref() {
                Some(url) => format!("날짜: {}\n[바로가기]({url})", notice.post_date),
                None => format!("날짜: {}\n", notice.post_date),
            };

            EmbedField {
                name: truncate_chars(&name, FIELD_NAME_LIMIT),
                value: truncate_chars(&value, FIELD_VALUE_LIMIT),
                inline: false,
            }
        })
        .collect();

    fields.push(EmbedField {
        name: String::from("🌈 레인보우 시스템"),
        value: String::from(
            "[비교과 프로그램](https://rainbow.cau.ac.kr/site/reservation/lecture/lectureList\
             ?menuid=001002002&submode=lecture&reservegroupid=1)\n\
             [외부 프로그램](https://rainbow.cau.ac.kr/site/program/board/basicboard/list\
             ?boardtypeid=16&menuid=001002003)",
        ),
        inline: false,
    });

    Some(Embed {
        title: String::from("📢 새로운 공지사항이 있습니다"),
        color: EMBED_COLOR_BLUE,
        fields,
    })
}

/// Post the combined notice list to the configured Discord channel.
///
/// An empty list is a successful no-op; nothing is sent.
pub(crate) async fn send_notices(
    client: &Client,
    config: &BotConfig,
    notices: &[Notice],
) -> Result<()> {
    let Some(embed) = notice_embed(notices) else {
        tracing::info!("no notices to send");
        return Ok(());
    };

    let url = format!(
        "{DISCORD_API_BASE}/channels/{}/messages",
        config.discord_channel_id
    );

    let response = client
        .post(url)
        .header("Authorization", format!("Bot {}", config.bot_token))
        .json(&serde_json::json!({ "embeds": [embed] }))
        .send()
        .await
        .context("sending Discord message")?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("Discord rejected the message: {status} - {body}");
    }

    tracing::info!(count = notices.len(), "sent notices to Discord");
    Ok(())
}

// Discord counts limits in characters, and slicing bytes could split a
// multi-byte Korean title anyway.
fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(title: &str, url: Option<&str>) -> Notice {
        Notice {
            title: title.to_owned(),
            category: String::from("CAU 공지"),
            post_date: String::from("2024-03-21 07:30"),
            url: url.map(str::to_owned),
        }
    }

    #[test]
    fn no_notices_means_no_embed() {
        assert!(notice_embed(&[]).is_none());
    }

    #[test]
    fn embed_has_one_field_per_notice_plus_rainbow_links() {
        let notices = vec![notice("a", None), notice("b", None)];

        let embed = notice_embed(&notices).expect("non-empty list builds an embed");

        assert_eq!(embed.fields.len(), 3);
        assert_eq!(embed.fields[0].name, "[CAU 공지] a");
        assert_eq!(embed.fields[2].name, "🌈 레인보우 시스템");
    }

    #[test]
    fn field_value_links_to_the_posting_when_a_url_exists() {
        let notices = vec![notice("공지", Some("https://example.com/1"))];

        let embed = notice_embed(&notices).expect("non-empty list builds an embed");

        assert_eq!(
            embed.fields[0].value,
            "날짜: 2024-03-21 07:30\n[바로가기](https://example.com/1)"
        );
    }

    #[test]
    fn field_value_omits_the_link_when_no_url_exists() {
        let notices = vec![notice("공지", None)];

        let embed = notice_embed(&notices).expect("non-empty list builds an embed");

        assert_eq!(embed.fields[0].value, "날짜: 2024-03-21 07:30\n");
    }

    #[test]
    fn oversized_titles_are_truncated_by_characters() {
        let long_title = "공".repeat(400);
        let notices = vec![notice(&long_title, None)];

        let embed = notice_embed(&notices).expect("non-empty list builds an embed");

        assert_eq!(embed.fields[0].name.chars().count(), FIELD_NAME_LIMIT);
    }
}
