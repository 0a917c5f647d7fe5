//! Site configuration
//!
//! [`SiteConfig`] names every resource and DOM marker the page scripts depend on. All fields
//! have defaults matching the published site layout, so a missing config file is not an error.
//! ```
//! use config::SiteConfig;
//!
//! let config = SiteConfig::default();
//! assert_eq!(config.dataset_path, "data/members.json");
//! assert_eq!(config.profile_page, "members/member.html");
//! ```
use serde::{Deserialize, Serialize};
use tracing::info;

use util::read_json;

/// Configuration data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Dataset location, relative to the directory page
    pub dataset_path: String,
    /// Dataset location, relative to the profile page
    pub profile_dataset_path: String,
    /// Profile page, relative to the directory page
    pub profile_page: String,
    /// Site root, relative to the profile page
    pub profile_site_root: String,
    /// Placeholder avatar service, called with `?seed=<nickname>`
    pub avatar_service: String,
    /// Attribute marking elements whose content is loaded from a fragment
    pub include_attr: String,
    /// Attribute marking the home link inside a fragment
    pub home_link_attr: String,
    pub member_list_id: String,
    pub pagination_id: String,
    pub profile_id: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            dataset_path: "data/members.json".to_string(),
            profile_dataset_path: "../data/members.json".to_string(),
            profile_page: "members/member.html".to_string(),
            profile_site_root: "../".to_string(),
            avatar_service: "https://api.dicebear.com/7.x/adventurer/svg".to_string(),
            include_attr: "data-include".to_string(),
            home_link_attr: "data-home-link".to_string(),
            member_list_id: "member-list".to_string(),
            pagination_id: "pagination".to_string(),
            profile_id: "profile".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load config from file.
    ///
    /// A missing file yields the default config, `None` is only returned when the file exists
    /// but can't be read or parsed.
    pub fn new(file: &str) -> Option<Self> {
        let config = read_json!(file, Self::default());
        if config.is_some() {
            info!("Loaded site config from '{}'", file);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.json");
        let config = SiteConfig::new(path.to_str().unwrap()).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"dataset_path": "api/guild.json", "pagination_id": "pager"}}"#).unwrap();
        let config = SiteConfig::new(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.dataset_path, "api/guild.json");
        assert_eq!(config.pagination_id, "pager");
        assert_eq!(config.member_list_id, "member-list");
    }

    #[test]
    fn malformed_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(SiteConfig::new(file.path().to_str().unwrap()).is_none());
    }
}
