use crate::config::Config;
use crate::state::Context;

/// Show the assistant's configuration (admin only)
#[poise::command(slash_command, guild_only)]
pub async fn status(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    let user_id = ctx.author().id.get();
    if !ctx.data().is_admin(user_id) {
        ctx.say("This command is admin-only.").await?;
        return Ok(());
    }

    ctx.say(render_status(&ctx.data().config)).await?;
    Ok(())
}

/// API keys are never included.
fn render_status(config: &Config) -> String {
    format!(
        "**Assistant Configuration:**\n\
         `meeting_collection`: {}\n\
         `agreement_collection`: {}\n\
         `top_k`: {}\n\
         `rerank`: {}\n\
         `model`: {}\n\
         `recent_limit`: {}\n\
         `request_timeout`: {}s",
        config.meeting_collection,
        config.agreement_collection,
        config.top_k,
        config.rerank,
        config.model,
        config.recent_limit,
        config.request_timeout.as_secs()
    )
}
