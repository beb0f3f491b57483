//! Messaging session capabilities used by the bot core.
//!
//! The core (raffle controller, command handlers, control panel) never talks to the
//! Matrix SDK directly. It only depends on the [`MessagingSession`] trait defined
//! here, which the [`crate::matrix::MatrixClient`] implements. This keeps the raffle
//! logic testable with a mocked session and isolates every network call behind a
//! `Result` that callers log and degrade on.
//!
//! # Identifiers
//!
//! - A *chat identifier* addresses a conversation (a Matrix room ID such as
//!   `!abc:example.org`).
//! - A *contact identifier* is the stable identifier of a user (a Matrix user ID
//!   such as `@alice:example.org`).

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// An inbound chat message, already resolved to its chat and sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Chat the message was posted in
    pub chat_id: String,
    /// Contact identifier of the sender
    pub sender_id: String,
    /// Platform identifier of the message itself
    pub event_id: String,
    /// Text of the message (caption for images)
    pub body: String,
    /// Whether the message carries an image
    pub has_media: bool,
    /// Identifier of the message this one replies to, if any
    pub quoted_id: Option<String>,
}

/// Downloaded or generated media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    /// MIME type of `data`, e.g. `image/png`
    pub mimetype: String,
    /// Raw file content
    pub data: Vec<u8>,
}

/// Narrow view of the messaging platform.
///
/// Every method may fail on transport errors. Callers are expected to log the
/// error and keep going: a failed send must never take down the sync loop or the
/// control panel.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessagingSession: Send + Sync {
    /// Sends a Markdown text message to a chat.
    async fn send_text(&self, chat_id: &str, body: &str) -> Result<(), anyhow::Error>;

    /// Replies to an inbound message in its chat.
    async fn send_reply(&self, message: &InboundMessage, body: &str)
    -> Result<(), anyhow::Error>;

    /// Sends a Markdown text message that mentions (notifies) a contact.
    async fn send_mention(
        &self,
        chat_id: &str,
        body: &str,
        contact_id: &str,
    ) -> Result<(), anyhow::Error>;

    /// Sends an image as a sticker to a chat.
    async fn send_sticker(&self, chat_id: &str, sticker: Media) -> Result<(), anyhow::Error>;

    /// Downloads the image carried by a message.
    async fn download_media(&self, message: &InboundMessage) -> Result<Media, anyhow::Error>;

    /// Downloads the image carried by the message `message` replies to.
    ///
    /// Returns `Ok(None)` when the replied-to message carries no image.
    async fn quoted_media(&self, message: &InboundMessage)
    -> Result<Option<Media>, anyhow::Error>;

    /// Resolves a user supplied recipient (bare name, phone-like number, contact
    /// or chat identifier) into the chat identifier to post to.
    async fn resolve_chat(&self, target: &str) -> Result<String, anyhow::Error>;
}
