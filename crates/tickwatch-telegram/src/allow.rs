//! Allowlist check for incoming commands.
//!
//! Entries may include or omit the leading `@`; `"*"` allows everyone.
//! An empty list also allows everyone — the bot does nothing but send the
//! asker prices, and a fresh install has no config to put names in yet.

/// Returns `true` when the given Telegram user may issue commands.
///
/// Matching rules (case-sensitive, matching the Telegram API):
/// - `"*"` — allow everyone
/// - `"@username"` or `"username"` — match by Telegram username
/// - `"123456789"` — match by numeric Telegram user ID
pub fn is_allowed(allow_users: &[String], username: &str, user_id: &str) -> bool {
    if allow_users.is_empty() {
        return true;
    }
    allow_users.iter().any(|entry| {
        let entry = entry.trim_start_matches('@');
        entry == "*" || entry == username || entry == user_id
    })
}
