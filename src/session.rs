//! One browsing session over the site.
//!
//! A [`Session`] loads pages the way a browser tab does: it fetches the page markup, then runs
//! the include scan and the page specific script concurrently. Page scripts are picked by the
//! containers the page provides, a member list container gets the directory script and a
//! profile container gets the profile script.
//!
//! User input is fed through [`Session::click`] and [`Session::press_enter`], history traversal
//! through [`Session::back`] and [`Session::forward`].
use std::sync::Arc;

use anyhow::{Context, Result};
use page::fetch::fetch_text;
use page::location::Traversal;
use page::{anchor_id, Action, Document, Page, Trigger, Url};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::data::SiteData;
use crate::directory::{self, Directory};
use crate::profile::{render_profile_page, ProfileOutcome};

/// The script running on the current page
#[derive(Debug, Clone)]
pub enum Script {
    /// Member directory, `None` if the dataset failed to load
    Directory(Option<Directory>),
    Profile(ProfileOutcome),
    /// No page script, only fragments
    Static,
}

#[derive(Debug)]
pub struct Session {
    data: SiteData,
    page: Page,
    script: Script,
    /// Number of page loads so far, identifies history entries
    loads: u64,
}

/// Checks if two urls only differ by fragment
fn same_document(a: &Url, b: &Url) -> bool {
    let mut a = a.clone();
    let mut b = b.clone();
    a.set_fragment(None);
    b.set_fragment(None);
    a == b
}

impl Session {
    /// Open a session on `url`.
    ///
    /// # Errors
    /// Returns [`Err`] if the page markup itself can't be fetched.
    pub async fn open(data: SiteData, url: Url) -> Result<Self> {
        let (page, script) = Self::load(&data, url, Default::default(), Some(1)).await?;
        Ok(Self { data, page, script, loads: 1 })
    }

    /// Load a page, `load` is the id of a new history entry, `None` restores the current one
    async fn load(
        data: &SiteData, url: Url, history: page::location::History, load: Option<u64>,
    ) -> Result<(Page, Script)> {
        let html = fetch_text(data.fetcher.as_ref(), &url)
            .await
            .with_context(|| format!("Failed to load page '{}'", url))?;
        let config = data.config.as_ref();
        let doc = Document::parse(url.clone(), &html, &config.include_attr);
        let doc = match load {
            Some(id) => doc.with_history(history, id),
            None => doc.restore_history(history),
        };
        let is_directory = doc.element(&config.member_list_id).is_some();
        let is_profile = doc.element(&config.profile_id).is_some();
        let page: Page = Arc::new(RwLock::new(doc));

        let script = async {
            if is_directory {
                Script::Directory(Directory::load(&page, data.fetcher.as_ref(), config).await)
            } else if is_profile {
                Script::Profile(render_profile_page(&page, data.fetcher.as_ref(), config).await)
            } else {
                Script::Static
            }
        };
        let ((), script) = tokio::join!(partials::load_includes(&page, data.fetcher.as_ref(), config), script);

        if let Some(fragment) = url.fragment() {
            let mut doc = page.write().await;
            if doc.has_anchor_target(fragment) {
                doc.scroll_into_view(&anchor_id(fragment));
            }
        }
        info!("Loaded page '{}'", url);
        Ok((page, script))
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub async fn location(&self) -> Url {
        self.page.read().await.location().clone()
    }

    /// Render the current page
    pub async fn render(&self) -> String {
        self.page.read().await.render()
    }

    /// Load a new page, adding a history entry
    ///
    /// # Errors
    /// Returns [`Err`] if the page can't be fetched, the current page stays in place.
    pub async fn navigate(&mut self, url: Url) -> Result<()> {
        let history = self.page.read().await.history().clone();
        let (page, script) = Self::load(&self.data, url, history, Some(self.loads + 1)).await?;
        self.loads += 1;
        self.page = page;
        self.script = script;
        Ok(())
    }

    /// Click a target inside a container, returns `false` if nothing listens to it
    pub async fn click(&mut self, key: &str, target: &str) -> Result<bool> {
        self.trigger(key, target, Trigger::Click).await
    }

    /// Press Enter on a target inside a container, returns `false` if nothing listens to it
    pub async fn press_enter(&mut self, key: &str, target: &str) -> Result<bool> {
        self.trigger(key, target, Trigger::enter()).await
    }

    async fn trigger(&mut self, key: &str, target: &str, trigger: Trigger) -> Result<bool> {
        let action = match self.page.read().await.dispatch(key, target, &trigger) {
            Some(action) => action,
            None => return Ok(false),
        };
        {
            let mut doc = self.page.write().await;
            match &action {
                Action::ScrollTo(_) | Action::Redirect(_) => {
                    partials::follow_fragment(&mut doc, &action);
                }
                Action::OpenMember(encoded) => directory::open_member(&mut doc, &self.data.config, encoded),
                Action::GoToPage(page) => match &self.script {
                    Script::Directory(Some(directory)) => {
                        directory.go_to_page(&mut doc, *page);
                    }
                    _ => warn!("Page {} requested without a member list", page),
                },
                Action::Copy(text) => doc.copy_to_clipboard(text),
            }
        }
        self.follow_pending().await?;
        Ok(true)
    }

    /// Carry out a navigation requested by the page
    async fn follow_pending(&mut self) -> Result<()> {
        let url = match self.page.write().await.take_pending_navigation() {
            Some(url) => url,
            None => return Ok(()),
        };
        {
            let mut doc = self.page.write().await;
            if let Some(fragment) = url.fragment() {
                if same_document(doc.location(), &url) {
                    doc.set_hash(fragment);
                    if doc.has_anchor_target(fragment) {
                        doc.scroll_into_view(&anchor_id(fragment));
                    }
                    return Ok(());
                }
            }
        }
        self.navigate(url).await
    }

    /// Go back one history entry, returns `false` if there is none
    pub async fn back(&mut self) -> Result<bool> {
        let traversal = self.page.write().await.back();
        self.traverse(traversal).await
    }

    /// Go forward one history entry, returns `false` if there is none
    pub async fn forward(&mut self) -> Result<bool> {
        let traversal = self.page.write().await.forward();
        self.traverse(traversal).await
    }

    async fn traverse(&mut self, traversal: Option<Traversal>) -> Result<bool> {
        match traversal {
            None => Ok(false),
            Some(Traversal::PopState(_)) => {
                if let Script::Directory(Some(directory)) = &self.script {
                    let mut doc = self.page.write().await;
                    directory.on_popstate(&mut doc);
                }
                Ok(true)
            }
            Some(Traversal::Load(url)) => {
                let history = self.page.read().await.history().clone();
                let (page, script) = Self::load(&self.data, url, history, None).await?;
                self.page = page;
                self.script = script;
                Ok(true)
            }
        }
    }
}
