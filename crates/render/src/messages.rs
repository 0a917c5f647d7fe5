//! Inline messages replacing a region's content
use util::string::escape_html;

pub const NO_MEMBERS: &str = r#"<p class="text-center text-gray-400">No members to show.</p>"#;
pub const MEMBER_LIST_ERROR: &str = r#"<p class="text-center text-red-400">Failed to load the member list.</p>"#;
pub const NO_MEMBER_SPECIFIED: &str = r#"<p class="text-red-400">No member was specified.</p>"#;
pub const MEMBER_NOT_FOUND: &str = r#"<p class="text-red-400">Member not found.</p>"#;
pub const PROFILE_ERROR: &str = r#"<p class="text-red-400">Failed to load the member data.</p>"#;

/// Shown in place of a fragment that failed to load
/// ```
/// use render::messages::fragment_error;
///
/// assert_eq!(
///     fragment_error("partials/nav.html"),
///     r#"<div class="text-red-400 text-center">Failed to load partials/nav.html</div>"#
/// );
/// ```
pub fn fragment_error(url: &str) -> String {
    format!(r#"<div class="text-red-400 text-center">Failed to load {}</div>"#, escape_html(url))
}
