//! Page location and session history
use reqwest::Url;

/// Get the first value of a query parameter, decoded.
/// ```
/// use page::location::query_param;
/// use page::Url;
///
/// let url = Url::parse("https://x.io/members/member.html?nickname=Se%C3%B1or+Foo&page=2").unwrap();
/// assert_eq!(query_param(&url, "nickname").as_deref(), Some("Señor Foo"));
/// assert_eq!(query_param(&url, "page").as_deref(), Some("2"));
/// assert_eq!(query_param(&url, "missing"), None);
/// ```
pub fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs().find(|(k, _)| k == name).map(|(_, v)| v.into_owned())
}

/// Return a copy of `url` with query parameter `name` set to `value`.
///
/// Other parameters keep their order, an existing `name` is replaced in place.
/// ```
/// use page::location::with_query_param;
/// use page::Url;
///
/// let url = Url::parse("https://x.io/index.html?lang=es&page=1#top").unwrap();
/// let next = with_query_param(&url, "page", "3");
/// assert_eq!(next.as_str(), "https://x.io/index.html?lang=es&page=3#top");
///
/// let url = Url::parse("https://x.io/").unwrap();
/// assert_eq!(with_query_param(&url, "page", "2").as_str(), "https://x.io/?page=2");
/// ```
pub fn with_query_param(url: &Url, name: &str, value: &str) -> Url {
    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    match pairs.iter_mut().find(|(k, _)| k == name) {
        Some(pair) => pair.1 = value.to_string(),
        None => pairs.push((name.to_string(), value.to_string())),
    }
    let mut next = url.clone();
    next.query_pairs_mut().clear().extend_pairs(pairs);
    next
}

/// One history entry.
///
/// `load` identifies the page load that created the entry, entries created by
/// [`History::push`] within one load share it, so going back between them only fires a
/// popstate instead of a full load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub url: Url,
    pub load: u64,
}

/// Where a history traversal leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Traversal {
    /// Same document, the page script should re-render from this url
    PopState(Url),
    /// Different document, the page must be loaded again
    Load(Url),
}

/// Session history of one browsing context
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<Entry>,
    index: usize,
}

impl History {
    /// Push a new entry after the current one, forward entries are dropped
    pub fn push(&mut self, url: Url, load: u64) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push(Entry { url, load });
        self.index = self.entries.len() - 1;
    }

    pub fn current(&self) -> Option<&Entry> {
        self.entries.get(self.index)
    }

    /// Step back one entry
    pub fn back(&mut self) -> Option<Traversal> {
        if self.index == 0 || self.entries.is_empty() {
            return None;
        }
        self.traverse(self.index - 1)
    }

    /// Step forward one entry
    pub fn forward(&mut self) -> Option<Traversal> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.traverse(self.index + 1)
    }

    fn traverse(&mut self, to: usize) -> Option<Traversal> {
        let from_load = self.entries.get(self.index)?.load;
        self.index = to;
        let entry = &self.entries[to];
        Some(if entry.load == from_load {
            Traversal::PopState(entry.url.clone())
        } else {
            Traversal::Load(entry.url.clone())
        })
    }
}
