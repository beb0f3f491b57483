//! Raffle announcements posted in the raffle chat.

use crate::raffle::Origin;

/// Formats the message opening a raffle. The wording depends on where it was started.
pub fn format_raffle_started(origin: Origin) -> String {
    match origin {
        Origin::Chat => "🎉 **SORTEIO INICIADO!** 🎉\n\
            Digite `/entrar` para participar.\n\
            Admin: use `/ganhador` ou controle pelo painel."
            .to_owned(),
        Origin::Panel => "🎉 **SORTEIO INICIADO PELO PAINEL!** 🎉\n\n\
            Digite `/entrar` para participar!"
            .to_owned(),
    }
}

/// Formats the winner announcement, with a link that clients render as a mention pill.
///
/// # Examples
///
/// ```ignore
/// let message = format_winner("@alice:example.org");
/// assert!(message.contains("https://matrix.to/#/@alice:example.org"));
/// ```
pub fn format_winner(contact_id: &str) -> String {
    format!(
        "🏆 **O VENCEDOR É:** [{}](https://matrix.to/#/{}) 🎊",
        contact_id, contact_id
    )
}
