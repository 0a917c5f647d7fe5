//! Site data initialization
use std::sync::Arc;

use config::SiteConfig;
use page::fetch::Fetch;

#[derive(Clone)]
/// Container for everything a page load needs, so they can all be cloned at once.
pub struct SiteData {
    pub config: Arc<SiteConfig>,
    pub fetcher: Arc<dyn Fetch>,
}

impl SiteData {
    pub fn new(config: SiteConfig, fetcher: Arc<dyn Fetch>) -> Self {
        Self { config: Arc::new(config), fetcher }
    }
}

impl std::fmt::Debug for SiteData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteData").field("config", &self.config).finish_non_exhaustive()
    }
}
