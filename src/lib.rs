//! Guild member directory site.
//!
//! The site has two page scripts, the paginated [`directory`] and the single member
//! [`profile`], and shares its chrome through fragments loaded by the `partials` crate.
//! [`session::Session`] drives them the way a browser would.
pub mod data;
pub mod directory;
pub mod logging;
pub mod profile;
pub mod session;
