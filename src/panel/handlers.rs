//! Panel request handlers.

use askama::Template;
use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use log::{error, info};
use serde::Deserialize;

use crate::{
    panel::{
        PanelState,
        page::{Notice, PanelPage},
    },
    raffle::Origin,
};

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    aviso: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendForm {
    #[serde(default)]
    numero: String,
    #[serde(default)]
    mensagem: String,
}

#[derive(Debug, Deserialize)]
pub struct StartForm {
    #[serde(default, rename = "chatId")]
    chat_id: String,
}

fn back(notice: Option<Notice>) -> Redirect {
    match notice {
        Some(notice) => Redirect::to(&format!("/?aviso={}", notice.code())),
        None => Redirect::to("/"),
    }
}

pub async fn index(State(state): State<PanelState>, Query(query): Query<IndexQuery>) -> Response {
    let notice = query.aviso.as_deref().and_then(Notice::from_code);
    let page = PanelPage::new(state.raffle.status().await, notice);

    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("failed to render panel: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn send_message(State(state): State<PanelState>, Form(form): Form<SendForm>) -> Redirect {
    if form.numero.trim().is_empty() || form.mensagem.trim().is_empty() {
        return back(Some(Notice::MissingFields));
    }

    let sent = async {
        let chat_id = state.session.resolve_chat(&form.numero).await?;
        state.session.send_text(&chat_id, &form.mensagem).await?;
        Ok::<_, anyhow::Error>(chat_id)
    }
    .await;

    match sent {
        Ok(chat_id) => {
            info!("panel message sent to {}", chat_id);
            back(None)
        }
        Err(e) => {
            error!("failed to send panel message to {}: {:?}", form.numero, e);
            back(Some(Notice::SendFailed))
        }
    }
}

pub async fn start_raffle(State(state): State<PanelState>, Form(form): Form<StartForm>) -> Redirect {
    if form.chat_id.trim().is_empty() {
        return back(Some(Notice::MissingFields));
    }

    // Resolving may create a direct chat, so refuse early
    if state.raffle.status().await.active {
        return back(Some(Notice::RaffleActive));
    }

    let chat_id = match state.session.resolve_chat(&form.chat_id).await {
        Ok(chat_id) => chat_id,
        Err(e) => {
            error!("failed to resolve {}: {:?}", form.chat_id, e);
            return back(Some(Notice::SendFailed));
        }
    };

    match state.raffle.start(&chat_id, Origin::Panel).await {
        Ok(()) => back(None),
        Err(_) => back(Some(Notice::RaffleActive)),
    }
}

pub async fn draw_raffle(State(state): State<PanelState>) -> Redirect {
    match state.raffle.draw().await {
        Ok(_) => back(None),
        Err(e) => {
            info!("panel draw refused: {}", e);
            back(Some(Notice::NoEntrants))
        }
    }
}

pub async fn cancel_raffle(State(state): State<PanelState>) -> Redirect {
    state.raffle.cancel().await;
    back(None)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, header},
    };
    use mockall::predicate::{always, eq};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        panel::build_panel_app,
        raffle::RaffleController,
        session::{MessagingSession, MockMessagingSession},
    };

    const CHAT: &str = "!room:example.com";

    fn create_app(session: MockMessagingSession) -> (Router, Arc<RaffleController>) {
        let session: Arc<dyn MessagingSession> = Arc::new(session);
        let raffle = Arc::new(RaffleController::new(Arc::clone(&session)));
        let app = build_panel_app(PanelState {
            raffle: Arc::clone(&raffle),
            session,
        });
        (app, raffle)
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn location(response: &Response) -> &str {
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_index_renders_status() {
        let (app, _) = create_app(MockMessagingSession::new());

        let response = app
            .oneshot(Request::get("/?aviso=sem-participantes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("PARADO"));
        assert!(html.contains(Notice::NoEntrants.text()));
    }

    #[tokio::test]
    async fn test_send_message() {
        let mut session = MockMessagingSession::new();
        session
            .expect_resolve_chat()
            .with(eq("5511999998888"))
            .times(1)
            .returning(|_| Ok(CHAT.to_string()));
        session
            .expect_send_text()
            .with(eq(CHAT), eq("olá"))
            .times(1)
            .returning(|_, _| Ok(()));
        let (app, _) = create_app(session);

        let response = app
            .oneshot(post_form("/api/enviar", "numero=5511999998888&mensagem=ol%C3%A1"))
            .await
            .unwrap();
        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn test_send_message_missing_fields() {
        let mut session = MockMessagingSession::new();
        session.expect_resolve_chat().never();
        session.expect_send_text().never();
        let (app, _) = create_app(session);

        let response = app
            .oneshot(post_form("/api/enviar", "numero=+++&mensagem=oi"))
            .await
            .unwrap();
        assert_eq!(location(&response), "/?aviso=campos-obrigatorios");
    }

    #[tokio::test]
    async fn test_send_message_failure() {
        let mut session = MockMessagingSession::new();
        session
            .expect_resolve_chat()
            .returning(|_| Ok(CHAT.to_string()));
        session
            .expect_send_text()
            .returning(|_, _| Err(anyhow::anyhow!("forbidden")));
        let (app, _) = create_app(session);

        let response = app
            .oneshot(post_form("/api/enviar", "numero=alice&mensagem=oi"))
            .await
            .unwrap();
        assert_eq!(location(&response), "/?aviso=falha-envio");
    }

    #[tokio::test]
    async fn test_start_raffle() {
        let mut session = MockMessagingSession::new();
        session
            .expect_resolve_chat()
            .with(eq(CHAT))
            .times(1)
            .returning(|target| Ok(target.to_string()));
        session
            .expect_send_text()
            .with(eq(CHAT), always())
            .times(1)
            .returning(|_, _| Ok(()));
        let (app, raffle) = create_app(session);

        let response = app
            .oneshot(post_form("/api/sorteio/iniciar", "chatId=%21room%3Aexample.com"))
            .await
            .unwrap();
        assert_eq!(location(&response), "/");

        let status = raffle.status().await;
        assert!(status.active);
        assert_eq!(status.chat_id.as_deref(), Some(CHAT));
    }

    #[tokio::test]
    async fn test_start_raffle_while_active() {
        let mut session = MockMessagingSession::new();
        session.expect_send_text().times(1).returning(|_, _| Ok(()));
        session.expect_resolve_chat().never();
        let (app, raffle) = create_app(session);
        raffle.start(CHAT, Origin::Chat).await.unwrap();

        let response = app
            .oneshot(post_form("/api/sorteio/iniciar", "chatId=%21other%3Aexample.com"))
            .await
            .unwrap();
        assert_eq!(location(&response), "/?aviso=sorteio-ativo");
        assert_eq!(raffle.status().await.chat_id.as_deref(), Some(CHAT));
    }

    #[tokio::test]
    async fn test_start_raffle_unresolvable_target() {
        let mut session = MockMessagingSession::new();
        session
            .expect_resolve_chat()
            .returning(|_| Err(anyhow::anyhow!("unknown alias")));
        session.expect_send_text().never();
        let (app, raffle) = create_app(session);

        let response = app
            .oneshot(post_form("/api/sorteio/iniciar", "chatId=%23nowhere%3Aexample.com"))
            .await
            .unwrap();
        assert_eq!(location(&response), "/?aviso=falha-envio");
        assert!(!raffle.status().await.active);
    }

    #[tokio::test]
    async fn test_draw_without_entrants() {
        let (app, _) = create_app(MockMessagingSession::new());

        let response = app
            .oneshot(post_form("/api/sorteio/sortear", ""))
            .await
            .unwrap();
        assert_eq!(location(&response), "/?aviso=sem-participantes");
    }

    #[tokio::test]
    async fn test_draw_announces_winner() {
        let mut session = MockMessagingSession::new();
        session.expect_send_text().returning(|_, _| Ok(()));
        session
            .expect_send_mention()
            .with(eq(CHAT), always(), eq("@alice:example.com"))
            .times(1)
            .returning(|_, _, _| Ok(()));
        let (app, raffle) = create_app(session);
        raffle.start(CHAT, Origin::Chat).await.unwrap();
        raffle.enter(CHAT, "@alice:example.com").await;

        let response = app
            .oneshot(post_form("/api/sorteio/sortear", ""))
            .await
            .unwrap();
        assert_eq!(location(&response), "/");
        assert!(!raffle.status().await.active);
    }

    #[tokio::test]
    async fn test_cancel_raffle() {
        let mut session = MockMessagingSession::new();
        session.expect_send_text().returning(|_, _| Ok(()));
        session.expect_send_mention().never();
        let (app, raffle) = create_app(session);
        raffle.start(CHAT, Origin::Chat).await.unwrap();
        raffle.enter(CHAT, "@alice:example.com").await;

        let response = app
            .oneshot(post_form("/api/sorteio/parar", ""))
            .await
            .unwrap();
        assert_eq!(location(&response), "/");
        assert!(!raffle.status().await.active);
    }
}
