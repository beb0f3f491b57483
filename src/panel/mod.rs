//! Web control panel.
//!
//! A small unauthenticated HTTP surface to send messages and drive the raffle:
//!
//! | Route | Action |
//! |-------|--------|
//! | `GET /` | Status page |
//! | `POST /api/enviar` | Send `mensagem` to `numero` |
//! | `POST /api/sorteio/iniciar` | Open a raffle in `chatId` |
//! | `POST /api/sorteio/sortear` | Draw the winner |
//! | `POST /api/sorteio/parar` | Cancel the raffle |
//!
//! Every action answers with a redirect to the status page, carrying a
//! [`page::Notice`] when something needs the operator attention.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use log::info;
use tokio::net::TcpListener;

use crate::{raffle::RaffleController, session::MessagingSession};

mod handlers;
mod page;

/// State shared by the panel handlers.
#[derive(Clone)]
pub struct PanelState {
    /// Raffle shared with the chat commands
    pub raffle: Arc<RaffleController>,
    /// Session used to resolve targets and send messages
    pub session: Arc<dyn MessagingSession>,
}

/// Builds the panel router.
pub fn build_panel_app(state: PanelState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/enviar", post(handlers::send_message))
        .route("/api/sorteio/iniciar", post(handlers::start_raffle))
        .route("/api/sorteio/sortear", post(handlers::draw_raffle))
        .route("/api/sorteio/parar", post(handlers::cancel_raffle))
        .with_state(state)
}

/// Serves the panel on `bind:port` until the process stops.
pub async fn serve(bind: &str, port: u16, state: PanelState) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("control panel listening on http://{}", addr);

    axum::serve(listener, build_panel_app(state)).await?;
    Ok(())
}
