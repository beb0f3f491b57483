//! Status page of the control panel.

use askama::Template;

use crate::raffle::RaffleStatus;

/// Outcome of a panel action shown as a banner after the redirect.
///
/// Notices travel in the query string (`/?aviso=<code>`), so the page stays a plain
/// GET after every form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// A raffle is already open
    RaffleActive,
    /// The draw found no entrants
    NoEntrants,
    /// A required form field was blank
    MissingFields,
    /// The messaging session failed to resolve the target or to send
    SendFailed,
}

impl Notice {
    /// Query string value of the notice.
    pub fn code(self) -> &'static str {
        match self {
            Notice::RaffleActive => "sorteio-ativo",
            Notice::NoEntrants => "sem-participantes",
            Notice::MissingFields => "campos-obrigatorios",
            Notice::SendFailed => "falha-envio",
        }
    }

    /// Parses a query string value. Unknown codes are dropped.
    pub fn from_code(code: &str) -> Option<Notice> {
        match code {
            "sorteio-ativo" => Some(Notice::RaffleActive),
            "sem-participantes" => Some(Notice::NoEntrants),
            "campos-obrigatorios" => Some(Notice::MissingFields),
            "falha-envio" => Some(Notice::SendFailed),
            _ => None,
        }
    }

    /// Banner text.
    pub fn text(self) -> &'static str {
        match self {
            Notice::RaffleActive => "⚠️ Já tem um sorteio rolando!",
            Notice::NoEntrants => "😢 Ninguém entrou no sorteio.",
            Notice::MissingFields => "✏️ Preencha todos os campos.",
            Notice::SendFailed => "❌ Não foi possível enviar, veja os logs do bot.",
        }
    }
}

#[derive(Template)]
#[template(path = "panel.html")]
pub struct PanelPage {
    active: bool,
    entrant_count: usize,
    chat_id: Option<String>,
    notice: Option<&'static str>,
}

impl PanelPage {
    pub fn new(status: RaffleStatus, notice: Option<Notice>) -> Self {
        PanelPage {
            active: status.active,
            entrant_count: status.entrant_count,
            chat_id: status.chat_id,
            notice: notice.map(Notice::text),
        }
    }
}
