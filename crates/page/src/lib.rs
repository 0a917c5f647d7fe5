//! Host page model.
//!
//! A [`Document`] is built from page markup and tracks its *containers*: elements carrying an
//! `id` or the include marker attribute. Page scripts replace a container's content, bind
//! [`Listener`]s to targets inside it, and move the [`location`] around. [`Document::render`]
//! splices the current container contents back into the page.
//!
//! Listeners are bound programmatically, generated markup never carries inline event handler
//! source.
//! ```
//! use page::{Action, Document, Trigger, Url};
//!
//! let url = Url::parse("https://guild.test/index.html").unwrap();
//! let mut doc = Document::parse(url, r#"<body><div id="member-list"></div></body>"#, "data-include");
//!
//! doc.set_inner_html("member-list", r#"<div data-member="Foo">Foo</div>"#);
//! doc.listen("member-list", "Foo", true, Action::OpenMember("Foo".to_string()));
//!
//! assert_eq!(
//!     doc.dispatch("member-list", "Foo", &Trigger::Click),
//!     Some(Action::OpenMember("Foo".to_string()))
//! );
//! assert_eq!(doc.render(), r#"<body><div id="member-list"><div data-member="Foo">Foo</div></div></body>"#);
//! ```
pub mod fetch;
pub mod location;
pub mod markup;

use std::ops::Range;
use std::sync::Arc;

pub use reqwest::Url;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::location::{History, Traversal};

/// A document shared between the concurrent tasks of one page load
pub type Page = Arc<RwLock<Document>>;

/// What activated a listener
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Click,
    Key(String),
}

impl Trigger {
    pub fn enter() -> Self {
        Self::Key("Enter".to_string())
    }
}

/// Behavior bound to a target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Scroll to an in-page fragment, or set the location hash if it isn't there
    ScrollTo(String),
    /// Leave the page for another url
    Redirect(String),
    /// Open the profile of a member, holds the encoded nickname
    OpenMember(String),
    /// Show a page of the member list
    GoToPage(usize),
    /// Copy text to the clipboard
    Copy(String),
}

/// A listener bound to a target key inside a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listener {
    pub target: String,
    /// Also fire on the Enter key
    pub on_enter: bool,
    pub action: Action,
}

/// An element whose content can be replaced
#[derive(Debug, Clone)]
pub struct Container {
    /// Element id, or `<include attr>:<index>` for unnamed include elements
    pub key: String,
    pub tag: String,
    pub id: Option<String>,
    /// Value of the include marker attribute, if any
    pub include: Option<String>,
    inner_html: String,
    /// Content range in the source markup
    source: Option<Range<usize>>,
    dirty: bool,
    listeners: Vec<Listener>,
}

impl Container {
    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }

    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }
}

/// Element id a fragment points at, `fragment` may carry its `#` and percent escapes.
/// ```
/// use page::anchor_id;
///
/// assert_eq!(anchor_id("#about"), "about");
/// assert_eq!(anchor_id("secci%C3%B3n"), "sección");
/// assert_eq!(anchor_id("#100%"), "100%");
/// ```
pub fn anchor_id(fragment: &str) -> String {
    let raw = fragment.trim_start_matches('#');
    util::string::decode_component(raw).unwrap_or_else(|_| raw.to_string())
}

#[derive(Debug, Clone)]
pub struct Document {
    location: Url,
    source: String,
    containers: Vec<Container>,
    history: History,
    /// Identifies this page load in the session history
    load: u64,
    pending: Option<Url>,
    scrolled_to: Option<String>,
    clipboard: Option<String>,
}

impl Document {
    /// Build a document from page markup.
    ///
    /// Every element with an `id` or an `include_attr` attribute becomes a container.
    pub fn parse(location: Url, html: &str, include_attr: &str) -> Self {
        let mut containers = Vec::new();
        for tag in markup::open_tags(html) {
            let id = tag.get("id").filter(|id| !id.is_empty()).map(str::to_string);
            let include = tag.get(include_attr).map(str::to_string);
            if id.is_none() && include.is_none() {
                continue;
            }
            let key = match &id {
                Some(id) => id.clone(),
                None => format!("{}:{}", include_attr, containers.len()),
            };
            let source = markup::inner_range(html, &tag);
            let inner_html = source.clone().map(|r| html[r].to_string()).unwrap_or_default();
            containers.push(Container {
                key,
                tag: tag.name.clone(),
                id,
                include,
                inner_html,
                source,
                dirty: false,
                listeners: Vec::new(),
            });
        }
        let mut history = History::default();
        history.push(location.clone(), 0);
        Self {
            location,
            source: html.to_string(),
            containers,
            history,
            load: 0,
            pending: None,
            scrolled_to: None,
            clipboard: None,
        }
    }

    /// An empty document, containers are added with [`Document::add_container`]
    pub fn blank(location: Url) -> Self {
        Self::parse(location, "", "")
    }

    /// Add a `<div>` container that isn't part of the source markup
    pub fn add_container(&mut self, id: &str, include: Option<&str>) {
        self.containers.push(Container {
            key: id.to_string(),
            tag: "div".to_string(),
            id: Some(id.to_string()),
            include: include.map(str::to_string),
            inner_html: String::new(),
            source: None,
            dirty: true,
            listeners: Vec::new(),
        });
    }

    /// Continue the session history of a previous page load
    pub fn with_history(mut self, mut history: History, load: u64) -> Self {
        history.push(self.location.clone(), load);
        self.history = history;
        self.load = load;
        self
    }

    /// Take over the session history of a previous page load, without adding an entry.
    ///
    /// Used when the load itself came from a history traversal.
    pub fn restore_history(mut self, history: History) -> Self {
        if let Some(entry) = history.current() {
            self.load = entry.load;
        }
        self.history = history;
        self
    }

    pub fn location(&self) -> &Url {
        &self.location
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn load(&self) -> u64 {
        self.load
    }

    pub fn element(&self, key: &str) -> Option<&Container> {
        self.containers.iter().find(|c| c.key == key)
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    /// List `(key, include path)` of every include element, in document order
    pub fn include_targets(&self) -> Vec<(String, String)> {
        self.containers
            .iter()
            .filter_map(|c| c.include.as_ref().map(|path| (c.key.clone(), path.clone())))
            .collect()
    }

    /// Replace the content of a container, dropping the listeners bound to the old content.
    ///
    /// Returns `false` if there is no such container.
    pub fn set_inner_html(&mut self, key: &str, html: impl Into<String>) -> bool {
        match self.containers.iter_mut().find(|c| c.key == key) {
            Some(container) => {
                container.inner_html = html.into();
                container.dirty = true;
                container.listeners.clear();
                true
            }
            None => {
                warn!("No container '{}' to write into", key);
                false
            }
        }
    }

    /// Bind an action to `target` inside a container, replacing an earlier binding of the same
    /// target
    pub fn listen(&mut self, key: &str, target: &str, on_enter: bool, action: Action) {
        let container = match self.containers.iter_mut().find(|c| c.key == key) {
            Some(c) => c,
            None => {
                warn!("No container '{}' to bind '{}' in", key, target);
                return;
            }
        };
        container.listeners.retain(|l| l.target != target);
        container.listeners.push(Listener { target: target.to_string(), on_enter, action });
    }

    /// Find the action a trigger on `target` activates
    pub fn dispatch(&self, key: &str, target: &str, trigger: &Trigger) -> Option<Action> {
        let listener = self.element(key)?.listeners.iter().find(|l| l.target == target)?;
        let fires = match trigger {
            Trigger::Click => true,
            Trigger::Key(k) => listener.on_enter && k == "Enter",
        };
        debug!(container = key, listener = target, ?trigger, fires = fires, "Dispatching");
        fires.then(|| listener.action.clone())
    }

    /// Checks if an element with the given fragment's id is part of the rendered page.
    ///
    /// Elements inside a container whose content was replaced no longer count.
    pub fn has_anchor_target(&self, fragment: &str) -> bool {
        let id = anchor_id(fragment);
        if id.is_empty() {
            return false;
        }
        let html = self.render();
        let found = markup::open_tags(&html).any(|t| t.get("id") == Some(id.as_str()));
        found
    }

    pub fn scroll_into_view(&mut self, id: &str) {
        self.scrolled_to = Some(id.to_string());
    }

    pub fn scrolled_to(&self) -> Option<&str> {
        self.scrolled_to.as_deref()
    }

    /// Set the location hash, which adds a history entry without loading
    pub fn set_hash(&mut self, fragment: &str) {
        let mut url = self.location.clone();
        let hash = fragment.trim_start_matches('#');
        url.set_fragment(if hash.is_empty() { None } else { Some(hash) });
        self.push_state(url);
    }

    /// Update the location and add a history entry without loading
    pub fn push_state(&mut self, url: Url) {
        self.history.push(url.clone(), self.load);
        self.location = url;
    }

    /// Request a full navigation to `href`, resolved against the current location
    pub fn assign(&mut self, href: &str) {
        match self.location.join(href) {
            Ok(url) => self.pending = Some(url),
            Err(why) => warn!("Ignoring navigation to malformed url '{}': {}", href, why),
        }
    }

    pub fn pending_navigation(&self) -> Option<&Url> {
        self.pending.as_ref()
    }

    pub fn take_pending_navigation(&mut self) -> Option<Url> {
        self.pending.take()
    }

    /// Step back in history, a same-document entry updates the location right away
    pub fn back(&mut self) -> Option<Traversal> {
        let traversal = self.history.back()?;
        if let Traversal::PopState(url) = &traversal {
            self.location = url.clone();
        }
        Some(traversal)
    }

    /// Step forward in history, a same-document entry updates the location right away
    pub fn forward(&mut self) -> Option<Traversal> {
        let traversal = self.history.forward()?;
        if let Traversal::PopState(url) = &traversal {
            self.location = url.clone();
        }
        Some(traversal)
    }

    pub fn copy_to_clipboard(&mut self, text: &str) {
        self.clipboard = Some(text.to_string());
    }

    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    /// Render the page with the current container contents.
    ///
    /// Containers that are not part of the source markup are appended after it.
    pub fn render(&self) -> String {
        let mut spliced: Vec<(&Range<usize>, &str)> = self
            .containers
            .iter()
            .filter(|c| c.dirty)
            .filter_map(|c| c.source.as_ref().map(|r| (r, c.inner_html.as_str())))
            .collect();
        spliced.sort_by_key(|(r, _)| r.start);

        let mut out = String::with_capacity(self.source.len());
        let mut cursor = 0;
        for (range, html) in spliced {
            // Nested in a container that was already replaced
            if range.start < cursor {
                continue;
            }
            out.push_str(&self.source[cursor..range.start]);
            out.push_str(html);
            cursor = range.end;
        }
        out.push_str(&self.source[cursor..]);

        for c in self.containers.iter().filter(|c| c.source.is_none() && c.dirty) {
            out.push_str(&format!("<{0} id=\"{1}\">{2}</{0}>", c.tag, c.key, c.inner_html));
        }
        out
    }
}
