//! Bot module wiring the Matrix client, the chat commands and the control panel.
//!
//! # Architecture
//!
//! The bot runs two concurrent tasks sharing one [`RaffleController`]:
//!
//! 1. **Panel Task**: serves the HTTP control panel.
//! 2. **Matrix Sync Task**: listens for Matrix messages, parses commands, executes
//!    them and replies. Each message is handled in its own task, so a slow sticker
//!    conversion never delays the sync loop.
//!
//! # Command Processing Flow
//!
//! ```text
//! Matrix Message → Parse Command → Execute → Send Reply
//! ```

use std::{path::Path, sync::Arc};

use log::{debug, error, info};

use crate::{
    commands::{CommandContext, Commander},
    config::{Config, Panel},
    matrix::{MatrixClient, UserCredentials},
    panel::{PanelState, serve},
    raffle::RaffleController,
    session::{InboundMessage, MessagingSession},
};

/// Everything a message handler task needs.
#[derive(Clone)]
struct MessageContext {
    session: Arc<dyn MessagingSession>,
    raffle: Arc<RaffleController>,
    commander: Arc<Commander>,
}

pub struct Bot {
    matrix_client: Arc<MatrixClient>,

    raffle: Arc<RaffleController>,

    commander: Arc<Commander>,

    panel: Panel,
}

impl Bot {
    /// Logs in to Matrix and prepares the shared raffle.
    ///
    /// # Errors
    ///
    /// Fails when the Matrix client cannot be set up.
    pub async fn new(config: Config, data_path: &Path) -> Result<Self, anyhow::Error> {
        let matrix_client = Arc::new(
            MatrixClient::new(
                &UserCredentials {
                    user_id: config.matrix.user_id,
                    password: config.matrix.password,
                    passphrase: config.matrix.passphrase,
                },
                &data_path.join("session"),
            )
            .await?,
        );

        let session: Arc<dyn MessagingSession> = matrix_client.clone();
        let raffle = Arc::new(RaffleController::new(session));

        Ok(Bot {
            matrix_client,
            raffle,
            commander: Arc::new(Commander::new()),
            panel: config.panel,
        })
    }

    /// Starts the panel and the Matrix sync loop. Runs until the sync loop ends.
    pub async fn start(self) {
        let session: Arc<dyn MessagingSession> = self.matrix_client.clone();

        let panel_state = PanelState {
            raffle: Arc::clone(&self.raffle),
            session: Arc::clone(&session),
        };
        let Panel { bind, port } = self.panel;
        tokio::spawn(async move {
            if let Err(e) = serve(&bind, port, panel_state).await {
                error!("control panel stopped: {:?}", e);
            }
        });

        let ctx = MessageContext {
            session,
            raffle: Arc::clone(&self.raffle),
            commander: Arc::clone(&self.commander),
        };
        let on_message = move |message: InboundMessage| Self::handle_message(ctx.clone(), message);

        info!("bot started");
        if let Err(e) = self.matrix_client.sync(on_message).await {
            error!("matrix sync failed: {:?}", e);
        }
    }

    /// Handles one inbound message in its own task.
    ///
    /// Messages that are not commands are dropped without answer.
    fn handle_message(ctx: MessageContext, message: InboundMessage) {
        let Some(command) = ctx.commander.parse(&message.body) else {
            return;
        };

        tokio::spawn(async move {
            debug!(
                "{} sent {:?} in {}",
                message.sender_id, command, message.chat_id
            );

            let command_context = CommandContext {
                message,
                session: Arc::clone(&ctx.session),
                raffle: ctx.raffle,
            };

            let result = ctx.commander.execute(&command, &command_context).await;

            if let Some(response) = result.response
                && let Err(e) = ctx
                    .session
                    .send_reply(&command_context.message, &response)
                    .await
            {
                error!(
                    "failed to reply to {}: {:?}",
                    command_context.message.event_id, e
                );
            }
        });
    }
}
