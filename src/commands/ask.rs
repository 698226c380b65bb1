use tracing::info;

use super::{send_chunked, snippet};
use crate::docs::types::RetrievalResult;
use crate::router::RouteOutcome;
use crate::state::Context;

/// Ask a question about meeting notes and client agreements
#[poise::command(slash_command, guild_only)]
pub async fn ask(
    ctx: Context<'_>,
    #[description = "Your question"] question: String,
    #[description = "Show routing details (admin only)"] debug: Option<bool>,
) -> Result<(), anyhow::Error> {
    // Acknowledge immediately so the user isn't staring at a loading spinner
    let user_mention = format!("<@{}>", ctx.author().id);
    ctx.say(format!(
        "Got it, {}. Looking through meeting notes and client agreements...",
        user_mention
    ))
    .await?;

    let show_debug = debug.unwrap_or(false) && ctx.data().is_admin(ctx.author().id.get());

    info!(user = ctx.author().name, question, "Query submitted");

    let router = &ctx.data().router;
    let full = if show_debug {
        let outcome = router.route_traced(&question).await;
        let trace = render_debug(&outcome);
        format!(
            "{}{}",
            render_answer(&user_mention, &question, &outcome.answer.into_text()),
            trace
        )
    } else {
        let answer = router.route(&question).await;
        render_answer(&user_mention, &question, &answer)
    };

    send_chunked(&ctx, &full).await
}

fn render_answer(user_mention: &str, question: &str, answer: &str) -> String {
    format!(
        "{} here's what I found:\n\n**Q:** {}\n\n**A:** {}",
        user_mention, question, answer
    )
}

/// Admin-only routing trace: category, hit counts, and the top passages.
fn render_debug(outcome: &RouteOutcome) -> String {
    let mut out = format!(
        "\n\n---\n**[Debug] Category:** {} | **Meeting hits:** {} | **Agreement hits:** {}\n",
        outcome.category,
        outcome.retrieved.meeting_notes.len(),
        outcome.retrieved.client_agreements.len()
    );
    if outcome.retrieved.is_empty() {
        out.push_str("\n_No passages retrieved._");
        return out;
    }
    for result in [
        &outcome.retrieved.meeting_notes,
        &outcome.retrieved.client_agreements,
    ] {
        push_passages(&mut out, result);
    }
    out
}

fn push_passages(out: &mut String, result: &RetrievalResult) {
    for (i, chunk) in result.chunks().iter().enumerate().take(3) {
        out.push_str(&format!(
            "\n**[{} #{}]** score {:.2}\n```\n{}\n```",
            result.collection(),
            i + 1,
            chunk.score,
            snippet(&chunk.text, 400)
        ));
    }
}
