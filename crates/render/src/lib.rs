//! Markup for the member directory and profile pages.
//!
//! Every function here is pure: it takes records and returns markup plus the target keys the
//! caller binds listeners to. Every interpolated value goes through
//! [`util::string::escape_html`].
pub mod card;
pub mod controls;
pub mod messages;
pub mod pager;
pub mod profile;

/// Shown in place of a missing card value
pub const PLACEHOLDER: &str = "—";
