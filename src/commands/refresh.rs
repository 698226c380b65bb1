use futures::future::join_all;
use tracing::info;

use super::send_chunked;
use crate::docs::types::Document;
use crate::state::Context;

const MAX_LIMIT: u32 = 10;

/// Show the most recent meeting summaries
#[poise::command(slash_command, guild_only)]
pub async fn refresh(
    ctx: Context<'_>,
    #[description = "Number of meetings to show (max 10)"] limit: Option<u32>,
    #[description = "Tidy summaries for readability"] formatted: Option<bool>,
) -> Result<(), anyhow::Error> {
    ctx.defer().await?;

    let data = ctx.data();
    let limit = limit.unwrap_or(data.config.recent_limit).clamp(1, MAX_LIMIT);
    let formatted = formatted.unwrap_or(false);

    info!(user = ctx.author().name, limit, formatted, "Refresh requested");

    let mut meetings = data
        .retrieval
        .recent_meetings(&data.config.meeting_collection, limit)
        .await;

    if meetings.is_empty() {
        ctx.say("No meetings found or error occurred while fetching meetings.")
            .await?;
        return Ok(());
    }

    if formatted {
        let formatter = &data.formatter;
        let tidied = join_all(meetings.iter().map(|m| async move {
            match m.summary.as_deref() {
                Some(summary) => Some(formatter.format(summary).await),
                None => None,
            }
        }))
        .await;
        for (meeting, summary) in meetings.iter_mut().zip(tidied) {
            if summary.is_some() {
                meeting.summary = summary;
            }
        }
    }

    send_chunked(&ctx, &render_meetings(&meetings)).await
}

fn render_meetings(meetings: &[Document]) -> String {
    let mut output = String::from("**Recent Meeting Summaries**\n\n");
    for meeting in meetings {
        let created = meeting
            .created_at
            .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "Unknown date".to_string());
        output.push_str(&format!(
            "**Meeting: {}** ({})\nDocument ID: `{}`\n",
            meeting.name, created, meeting.id
        ));
        match meeting.summary.as_deref() {
            Some(summary) => output.push_str(summary),
            None => output.push_str("_No summary available for this meeting._"),
        }
        output.push_str("\n\n");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_render_meetings() {
        let meetings = vec![
            Document {
                id: "d1".to_string(),
                name: "Weekly sync".to_string(),
                created_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()),
                updated_at: None,
                summary: Some("- Launch moved to June".to_string()),
            },
            Document {
                id: "d2".to_string(),
                name: "Retro".to_string(),
                created_at: None,
                updated_at: None,
                summary: None,
            },
        ];

        let out = render_meetings(&meetings);

        assert!(out.contains("**Meeting: Weekly sync** (2024-05-01 10:00 UTC)"));
        assert!(out.contains("Document ID: `d1`\n- Launch moved to June"));
        assert!(out.contains("**Meeting: Retro** (Unknown date)"));
        assert!(out.contains("No summary available for this meeting"));
        assert!(out.find("Weekly sync").unwrap() < out.find("Retro").unwrap());
    }
}
