//! Matrix client synchronization and event handling.
//!
//! This module provides the [`MatrixSync`] struct for managing the Matrix client's
//! synchronization loop and turning room events into [`InboundMessage`]s.
//!
//! # Overview
//!
//! The [`MatrixSync::sync`] method:
//! 1. Performs an initial sync to catch up on offline events (especially invites),
//!    without handling the messages posted while the bot was offline
//! 2. Sets up event handlers for auto-joining rooms and message processing
//! 3. Enters a continuous sync loop with automatic token persistence

use std::sync::Arc;

use anyhow::Result;
use log::{debug, error, info, warn};
use matrix_sdk::{
    Client, LoopCtrl, Room, RoomState,
    config::SyncSettings,
    ruma::{
        OwnedUserId,
        api::client::filter::FilterDefinition,
        events::{
            AnySyncMessageLikeEvent, AnySyncTimelineEvent, SyncMessageLikeEvent,
            room::{
                member::StrippedRoomMemberEvent,
                message::{
                    ImageMessageEventContent, MessageType, OriginalSyncRoomMessageEvent, Relation,
                },
            },
        },
        serde::Raw,
    },
};
use tokio::time::{Duration, sleep};

use crate::{
    matrix::{media::MediaCache, session::SessionStore},
    session::InboundMessage,
};

/// Manages the synchronization loop of the bot.
pub struct MatrixSync {
    /// The matrix client
    client: Client,
    /// Store where sync tokens are saved
    store: SessionStore,
    /// Images seen during sync, shared with the client for downloads
    media: Arc<MediaCache<ImageMessageEventContent>>,
}

impl MatrixSync {
    /// Creates a new MatrixSync instance. Call [`MatrixSync::sync`] to start syncing.
    pub fn new(
        client: &Client,
        store: &SessionStore,
        media: Arc<MediaCache<ImageMessageEventContent>>,
    ) -> Self {
        MatrixSync {
            client: client.to_owned(),
            store: store.to_owned(),
            media,
        }
    }

    /// Starts the synchronization process and enters an infinite loop.
    ///
    /// `on_message` is invoked for each text or image message posted in a joined room
    /// by someone else than the bot. It must not block: long work belongs in a task.
    ///
    /// Sync tokens are saved after each sync to resume from the last position when the
    /// bot restarts. Saving errors are logged but don't stop the loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync loop encounters a fatal error.
    pub async fn sync<F>(&self, on_message: F) -> Result<()>
    where
        F: Fn(InboundMessage) + Send + Sync + 'static,
    {
        info!("start syncing");

        // Auto join rooms when invited
        self.client.add_event_handler(auto_join_rooms);

        let filter = FilterDefinition::with_lazy_loading();
        let mut sync_settings = SyncSettings::default().filter(filter.into());

        if let Some(sync_token) = self.store.sync_token() {
            sync_settings = sync_settings.token(sync_token);
        }

        // First sync to only get the invitations received while the bot was offline
        let mut delay = 2;
        let response = loop {
            match self.client.sync_once(sync_settings.clone()).await {
                Ok(response) => break response,
                Err(e) => {
                    error!("initial sync failed ({e}), retrying in {delay}s");
                    sleep(Duration::from_secs(delay)).await;
                    delay = (delay * 2).min(300);
                }
            }
        };

        if let Err(e) = self.store.save_sync_token(&response.next_batch).await {
            error!("failed to save sync token: {:?}", e);
        }

        let own_user_id = self.client.user_id().map(ToOwned::to_owned);
        let on_message = Arc::new(on_message);

        // Listening after the first sync, so we only get new messages
        self.client.add_event_handler({
            let media = Arc::clone(&self.media);
            move |event: OriginalSyncRoomMessageEvent, room: Room| {
                let media = Arc::clone(&media);
                let on_message = Arc::clone(&on_message);
                let own_user_id = own_user_id.clone();
                async move { on_room_message(event, room, own_user_id, &media, &on_message) }
            }
        });

        sync_settings = sync_settings.token(response.next_batch);

        self.client
            .sync_with_result_callback(sync_settings, |sync_result| async move {
                let response = sync_result?;

                if let Err(e) = self.store.save_sync_token(&response.next_batch).await {
                    error!("failed to save sync token: {:?}", e);
                }

                Ok(LoopCtrl::Continue)
            })
            .await?;

        Ok(())
    }
}

/// Automatically joins rooms when the bot receives an invitation.
///
/// Synapse can send invites before the invited user is able to join, hence the
/// retries. See <https://github.com/matrix-org/synapse/issues/4345>.
async fn auto_join_rooms(room_member: StrippedRoomMemberEvent, client: Client, room: Room) {
    let Some(user_id) = client.user_id() else {
        warn!("could not get user id from client");
        return;
    };

    if room_member.state_key != user_id {
        return;
    }

    tokio::spawn(async move {
        info!("auto joining room {}", room.room_id());
        let mut delay = 2;

        while let Err(err) = room.join().await {
            error!(
                "failed to join room {} ({err:?}), retrying in {delay}s",
                room.room_id()
            );

            sleep(Duration::from_secs(delay)).await;
            delay *= 2;

            if delay > 3600 {
                error!("can't join room {} ({err:?})", room.room_id());
                return;
            }
        }
        info!("successfully joined room {}", room.room_id());
    });
}

/// Converts a room message into an [`InboundMessage`] and hands it to `on_message`.
///
/// Only text and image messages in joined rooms are kept. Images are remembered in
/// `media` so they can be downloaded later.
fn on_room_message<F>(
    event: OriginalSyncRoomMessageEvent,
    room: Room,
    own_user_id: Option<OwnedUserId>,
    media: &MediaCache<ImageMessageEventContent>,
    on_message: &Arc<F>,
) where
    F: Fn(InboundMessage) + Send + Sync + 'static,
{
    if room.state() != RoomState::Joined {
        return;
    }

    if own_user_id.as_deref() == Some(&*event.sender) {
        return;
    }

    let quoted_id = match &event.content.relates_to {
        Some(Relation::Reply { in_reply_to }) => Some(in_reply_to.event_id.to_string()),
        _ => None,
    };

    let event_id = event.event_id.to_string();
    let (body, has_media) = match event.content.msgtype {
        MessageType::Text(text) if quoted_id.is_some() => {
            (strip_reply_fallback(&text.body).to_owned(), false)
        }
        MessageType::Text(text) => (text.body, false),
        MessageType::Image(image) => {
            debug!("remembering image {}", event_id);
            let caption = image.caption().unwrap_or_default().to_owned();
            media.insert(&event_id, image);
            (caption, true)
        }
        _ => return,
    };

    on_message(InboundMessage {
        chat_id: room.room_id().to_string(),
        sender_id: event.sender.to_string(),
        event_id,
        body,
        has_media,
        quoted_id,
    });
}

/// Removes the quoted lines some clients still prepend to the body of a reply.
///
/// The fallback is a block of lines starting with `>`, followed by an empty line.
fn strip_reply_fallback(body: &str) -> &str {
    if !body.starts_with('>') {
        return body;
    }

    let mut rest = body;
    while rest.starts_with('>') {
        match rest.split_once('\n') {
            Some((_, next)) => rest = next,
            None => return body,
        }
    }

    rest.strip_prefix('\n').unwrap_or(rest)
}

/// Returns the image carried by a timeline event, if it is an image message.
pub fn image_from_event(event: &Raw<AnySyncTimelineEvent>) -> Option<ImageMessageEventContent> {
    let event = match event.deserialize() {
        Ok(event) => event,
        Err(e) => {
            warn!("unable to deserialize event: {:?}", e);
            return None;
        }
    };

    match event {
        AnySyncTimelineEvent::MessageLike(AnySyncMessageLikeEvent::RoomMessage(
            SyncMessageLikeEvent::Original(message),
        )) => match message.content.msgtype {
            MessageType::Image(image) => Some(image),
            _ => None,
        },
        _ => None,
    }
}
