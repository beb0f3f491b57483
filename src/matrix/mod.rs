//! Matrix protocol integration for the bot.
//!
//! This module implements the [`MessagingSession`](crate::session::MessagingSession)
//! on top of the Matrix SDK:
//! - Login on first start, session restoration afterwards
//! - Real-time event synchronization, turned into [`InboundMessage`](crate::session::InboundMessage)s
//! - Message sending with mentions, replies and stickers
//! - Resolution of panel targets (user IDs, room IDs, aliases) to rooms
//!
//! # Architecture
//!
//! - **Session**: login and restoration via the login submodule, persisted by the session submodule
//! - **Sync**: event handling and room auto-join via the sync submodule
//! - **Media**: images seen during sync are remembered by the media submodule, so that
//!   `/sticker` can find the image a command replies to

mod client;
mod login;
mod media;
mod session;
mod sync;

pub use crate::matrix::client::MatrixClient;

/// User credentials for a Matrix account
#[derive(Debug, Clone)]
pub struct UserCredentials {
    /// User ID of the matrix account
    pub user_id: String,
    /// Password of the matrix account
    pub password: String,
    /// Passphrase encrypting the local SDK store
    pub passphrase: String,
}

/// Turns a chat target typed in the control panel into a Matrix identifier.
///
/// - Room IDs (`!…`) and room aliases (`#…`) are kept as is
/// - User IDs (`@alice:example.org`) are kept as is
/// - A bare localpart or phone number (`alice`, `5511999998888`) becomes a user ID
///   on `server_name`
/// - A localpart with a server (`alice:example.org`) gets the missing `@`
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_target(" 5511999998888 ", "example.org"), "@5511999998888:example.org");
/// assert_eq!(normalize_target("!room:example.org", "example.org"), "!room:example.org");
/// ```
pub fn normalize_target(target: &str, server_name: &str) -> String {
    let target = target.trim();

    if target.starts_with('!') || target.starts_with('#') {
        return target.to_owned();
    }

    let localpart = target.strip_prefix('@').unwrap_or(target);
    if localpart.contains(':') {
        format!("@{}", localpart)
    } else {
        format!("@{}:{}", localpart, server_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone_number() {
        assert_eq!(
            normalize_target("5511999998888", "example.org"),
            "@5511999998888:example.org"
        );
    }

    #[test]
    fn test_normalize_localpart() {
        assert_eq!(
            normalize_target("  alice ", "example.org"),
            "@alice:example.org"
        );
        assert_eq!(normalize_target("@alice", "example.org"), "@alice:example.org");
    }

    #[test]
    fn test_normalize_full_user_id() {
        assert_eq!(
            normalize_target("@alice:other.org", "example.org"),
            "@alice:other.org"
        );
        assert_eq!(
            normalize_target("alice:other.org", "example.org"),
            "@alice:other.org"
        );
    }

    #[test]
    fn test_normalize_rooms() {
        assert_eq!(
            normalize_target("!abc:example.org", "other.org"),
            "!abc:example.org"
        );
        assert_eq!(
            normalize_target("#general:example.org", "other.org"),
            "#general:example.org"
        );
    }
}
