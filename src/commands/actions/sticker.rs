//! Sticker command handler.
//!
//! Looks for an image on the command message first (an image posted with `/sticker`
//! as caption), then on the message it replies to. The image is converted off the
//! async runtime and sent back to the chat as a sticker.

use log::{debug, info};

use crate::{
    commands::{
        CommandContext, CommandResult,
        markdown_response::{format_missing_media, format_quoted_without_media},
    },
    sticker::make_sticker,
};

/// Converts the attached or replied image to a sticker and sends it to the chat.
///
/// Replies with an error message when no image can be found. On success the sticker
/// is the only output, so the result is silent.
///
/// # Errors
///
/// Fails when the download, the conversion or the upload fails.
pub async fn handle_sticker(context: &CommandContext) -> Result<CommandResult, anyhow::Error> {
    let message = &context.message;

    let media = if message.has_media {
        context.session.download_media(message).await?
    } else if message.quoted_id.is_some() {
        match context.session.quoted_media(message).await? {
            Some(media) => media,
            None => {
                debug!("replied message of {} has no image", message.event_id);
                return Ok(CommandResult::reply(format_quoted_without_media()));
            }
        }
    } else {
        return Ok(CommandResult::reply(format_missing_media()));
    };

    debug!("converting {} ({} bytes)", media.mimetype, media.data.len());
    let sticker = tokio::task::spawn_blocking(move || make_sticker(&media)).await??;

    context
        .session
        .send_sticker(&message.chat_id, sticker)
        .await?;
    info!("sticker sent to {}", message.chat_id);

    Ok(CommandResult::silent())
}
