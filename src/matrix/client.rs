//! Matrix client wrapper implementing the bot messaging session.
//!
//! This module provides the [`MatrixClient`], which wraps the Matrix SDK client and
//! handles message sending, media download, target resolution and synchronization.

use std::{path::Path, sync::Arc};

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use log::{debug, info};
use matrix_sdk::{
    Client, Room,
    ruma::{
        EventId, RoomAliasId, RoomId, UserId,
        events::{
            Mentions,
            room::{
                ImageInfo,
                message::{
                    AddMentions, ForwardThread, ImageMessageEventContent, ReplyMetadata,
                    RoomMessageEventContent,
                },
            },
            sticker::StickerEventContent,
        },
    },
};

use crate::{
    matrix::{
        UserCredentials, login::connect,
        media::{MEDIA_CACHE_CAPACITY, MediaCache},
        normalize_target,
        session::SessionStore,
        sync::{MatrixSync, image_from_event},
    },
    session::{InboundMessage, Media, MessagingSession},
};

/// High-level Matrix client for the bot.
pub struct MatrixClient {
    /// Synchronization service for handling real-time events
    matrix_sync: MatrixSync,
    /// Underlying Matrix SDK client
    client: Client,
    /// Images seen during sync, by event ID
    media: Arc<MediaCache<ImageMessageEventContent>>,
}

impl MatrixClient {
    /// Creates a logged-in Matrix client.
    ///
    /// # Arguments
    ///
    /// * `user_credentials` - User ID, password and store passphrase of the bot
    /// * `session_path` - Directory for the session file and the SQLite database
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be opened or the login fails.
    pub async fn new(
        user_credentials: &UserCredentials,
        session_path: &Path,
    ) -> Result<Self, anyhow::Error> {
        let store = SessionStore::open(session_path)
            .await
            .context("failed to open matrix session store")?;

        let client = connect(user_credentials, &store)
            .await
            .context("failed to setup matrix client")?;

        client.account().set_display_name(Some("Sorteio")).await?;

        let media = Arc::new(MediaCache::new(MEDIA_CACHE_CAPACITY));
        let matrix_sync = MatrixSync::new(&client, &store, Arc::clone(&media));

        Ok(MatrixClient {
            matrix_sync,
            client,
            media,
        })
    }

    /// Starts the Matrix synchronization loop.
    ///
    /// `on_message` is invoked for each text or image message of a joined room.
    /// Never returns under normal operation.
    ///
    /// # Errors
    ///
    /// Returns the error that stopped the sync loop.
    pub async fn sync<F>(&self, on_message: F) -> Result<(), anyhow::Error>
    where
        F: Fn(InboundMessage) + Send + Sync + 'static,
    {
        self.matrix_sync.sync(on_message).await?;
        info!("matrix sync ended");
        Ok(())
    }

    /// Server part of the bot user ID, used for bare panel targets.
    fn server_name(&self) -> Result<String, anyhow::Error> {
        let user_id = self.client.user_id().context("client is not logged in")?;
        Ok(user_id.server_name().to_string())
    }

    fn room(&self, chat_id: &str) -> Result<Room, anyhow::Error> {
        let room_id = RoomId::parse(chat_id).with_context(|| format!("invalid room id {}", chat_id))?;
        self.client
            .get_room(&room_id)
            .ok_or_else(|| anyhow!("unknown room {}", chat_id))
    }

    async fn send(&self, chat_id: &str, content: RoomMessageEventContent) -> anyhow::Result<()> {
        self.room(chat_id)?.send(content).await?;
        Ok(())
    }

    /// Finds the image of `event_id`, in the cache first, then on the homeserver.
    async fn image(
        &self,
        chat_id: &str,
        event_id: &str,
    ) -> Result<Option<ImageMessageEventContent>, anyhow::Error> {
        if let Some(image) = self.media.get(event_id) {
            return Ok(Some(image));
        }

        let room = self.room(chat_id)?;
        let parsed_id = EventId::parse(event_id)?;
        let event = room
            .event(&parsed_id, None)
            .await
            .with_context(|| format!("failed to fetch event {}", event_id))?;

        let image = image_from_event(event.raw());
        if let Some(image) = &image {
            debug!("fetched image {} from the homeserver", event_id);
            self.media.insert(event_id, image.clone());
        }

        Ok(image)
    }

    async fn download(
        &self,
        chat_id: &str,
        event_id: &str,
    ) -> Result<Option<Media>, anyhow::Error> {
        let Some(image) = self.image(chat_id, event_id).await? else {
            return Ok(None);
        };

        let data = self
            .client
            .media()
            .get_file(&image, true)
            .await?
            .with_context(|| format!("image of {} has no file", event_id))?;

        let mimetype = image
            .info
            .as_ref()
            .and_then(|info| info.mimetype.clone())
            .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string());
        debug!("downloaded {} ({} bytes)", event_id, data.len());

        Ok(Some(Media { mimetype, data }))
    }
}

#[async_trait]
impl MessagingSession for MatrixClient {
    async fn send_text(&self, chat_id: &str, body: &str) -> Result<(), anyhow::Error> {
        self.send(chat_id, RoomMessageEventContent::text_markdown(body))
            .await
    }

    async fn send_reply(
        &self,
        message: &InboundMessage,
        body: &str,
    ) -> Result<(), anyhow::Error> {
        let sender = UserId::parse(message.sender_id.as_str())?;
        let event = EventId::parse(message.event_id.as_str())?;

        let content = RoomMessageEventContent::text_markdown(body).make_reply_to(
            ReplyMetadata::new(&event, &sender, None),
            ForwardThread::No,
            AddMentions::No,
        );

        self.send(&message.chat_id, content).await
    }

    async fn send_mention(
        &self,
        chat_id: &str,
        body: &str,
        contact_id: &str,
    ) -> Result<(), anyhow::Error> {
        let contact = UserId::parse(contact_id)?;
        let content = RoomMessageEventContent::text_markdown(body)
            .add_mentions(Mentions::with_user_ids([contact]));

        self.send(chat_id, content).await
    }

    async fn send_sticker(&self, chat_id: &str, sticker: Media) -> Result<(), anyhow::Error> {
        let room = self.room(chat_id)?;
        let content_type: mime::Mime = sticker.mimetype.parse()?;

        let mut info = ImageInfo::new();
        info.mimetype = Some(sticker.mimetype);

        let upload = self
            .client
            .media()
            .upload(&content_type, sticker.data, None)
            .await?;

        room.send(StickerEventContent::new(
            "sticker".to_owned(),
            info,
            upload.content_uri,
        ))
        .await?;

        Ok(())
    }

    async fn download_media(&self, message: &InboundMessage) -> Result<Media, anyhow::Error> {
        self.download(&message.chat_id, &message.event_id)
            .await?
            .with_context(|| format!("no image known for {}", message.event_id))
    }

    async fn quoted_media(
        &self,
        message: &InboundMessage,
    ) -> Result<Option<Media>, anyhow::Error> {
        match &message.quoted_id {
            Some(quoted_id) => self.download(&message.chat_id, quoted_id).await,
            None => Ok(None),
        }
    }

    async fn resolve_chat(&self, target: &str) -> Result<String, anyhow::Error> {
        let target = normalize_target(target, &self.server_name()?);

        if target.starts_with('!') {
            return Ok(RoomId::parse(target.as_str())?.to_string());
        }

        if target.starts_with('#') {
            let alias = RoomAliasId::parse(target.as_str())?;
            let response = self.client.resolve_room_alias(&alias).await?;
            return Ok(response.room_id.to_string());
        }

        let user_id = UserId::parse(target.as_str())?;
        let room = match self.client.get_dm_room(&user_id) {
            Some(room) => room,
            None => {
                info!("creating direct chat with {}", user_id);
                self.client.create_dm(&user_id).await?
            }
        };

        Ok(room.room_id().to_string())
    }
}
