//! Markdown response formatters for bot commands.
//!
//! Replies to chat commands are built here. Raffle announcements live in
//! [`crate::raffle`]. Messages are in Portuguese, like the command names.

/// Formats the help message listing every command.
pub fn format_help() -> String {
    "🤖 **MENU DO BOT**\n\n\
        📸 `/sticker` - cria uma figurinha\n\
        🎲 `/dado` - rola um dado\n\
        🆔 `/id` - mostra o ID do chat\n\
        🎉 `/sorteio` - inicia um sorteio\n\
        🎟️ `/entrar` - entra no sorteio\n\
        🏆 `/ganhador` - encerra o sorteio\n\n\
        _O sorteio também pode ser controlado pelo painel._"
        .to_owned()
}

/// Formats the result of a die roll.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_dice(4), "🎲 Você rolou: **4**");
/// ```
pub fn format_dice(value: u8) -> String {
    format!("🎲 Você rolou: **{}**", value)
}

/// Formats the identifier of a chat, ready to be pasted in the control panel.
pub fn format_chat_id(chat_id: &str) -> String {
    format!("🆔 O ID deste chat é:\n`{}`", chat_id)
}

/// Formats the sticker error when neither the message nor a replied message has an image.
pub fn format_missing_media() -> String {
    "❌ Mande uma imagem com a legenda `/sticker` ou responda a uma imagem.".to_owned()
}

/// Formats the sticker error when the replied message has no image.
pub fn format_quoted_without_media() -> String {
    "❌ A mensagem respondida não tem imagem!".to_owned()
}

/// Formats the warning sent when a raffle is already open.
pub fn format_raffle_already_active() -> String {
    "⚠️ Já tem um sorteio rolando!".to_owned()
}

/// Formats the confirmation of a raffle entry.
pub fn format_raffle_joined() -> String {
    "✅ Você entrou no sorteio!".to_owned()
}

/// Formats the answer to a second entry attempt.
pub fn format_raffle_already_joined() -> String {
    "Você já está dentro! 🤨".to_owned()
}

/// Formats the answer to a draw without entrants.
pub fn format_no_entrants() -> String {
    "Ninguém entrou... 😢".to_owned()
}

/// Formats the generic error sent when an external call failed.
pub fn format_internal_error() -> String {
    "❌ Algo deu errado, tente novamente.".to_owned()
}
