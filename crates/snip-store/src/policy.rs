use crate::object::Paste;

/// Decide whether a caller presenting `token` may mutate `paste`.
///
/// Pure and stateless: possession of the edit token is the sole
/// authorization mechanism. How the token reached the caller (query
/// parameter, stored client-side, …) is the transport's concern, not
/// this function's.
///
/// Returns `true` iff the paste is editable, the presented token is
/// non-empty, and it exactly equals the stored token. Non-editable pastes
/// deny every caller unconditionally.
pub fn can_edit(paste: &Paste, token: &str) -> bool {
    if !paste.editable || token.is_empty() {
        return false;
    }
    paste
        .edit_key
        .as_ref()
        .is_some_and(|key| key.as_str() == token)
}
