//! Fragment loader.
//!
//! Shared page chrome (navigation, footer) lives in HTML fragments that are fetched and injected
//! into placeholder containers. After injection, same-page anchors (`href="#..."`) inside the
//! fragment are rewired so they work from any page of the site: on an index page they scroll,
//! on any other page they go back to the index page at that fragment. The fragment's home link
//! is pointed at the index page the same way.
//!
//! The site may be served under a project path (`/<owner>/<project>/`), which is why the index
//! page is located with [`base_path`] rather than assumed to be `/`.
use config::SiteConfig;
use futures::future::join_all;
use page::fetch::{fetch_text, Fetch};
use page::{anchor_id, markup, Action, Document, Page};
use tracing::{info, warn};
use util::{ok, some};

/// Checks if a path is an index page, or equivalent to one.
/// ```
/// use partials::is_index_path;
///
/// assert!(is_index_path("/"));
/// assert!(is_index_path(""));
/// assert!(is_index_path("/owner/site/"));
/// assert!(is_index_path("/owner/site/index.html"));
/// assert!(!is_index_path("/owner/site/members/member.html"));
/// ```
pub fn is_index_path(path: &str) -> bool {
    path.is_empty() || path.ends_with('/') || path.ends_with("index.html")
}

/// Site base path for a page path: its first two non empty segments, or `/` if there are fewer.
/// ```
/// use partials::base_path;
///
/// assert_eq!(base_path("/owner/site/members/member.html"), "/owner/site/");
/// assert_eq!(base_path("//owner//site"), "/owner/site/");
/// assert_eq!(base_path("/member.html"), "/");
/// assert_eq!(base_path("/"), "/");
/// ```
pub fn base_path(path: &str) -> String {
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    match (segments.next(), segments.next()) {
        (Some(first), Some(second)) => format!("/{}/{}/", first, second),
        _ => "/".to_string(),
    }
}

/// Where the home link of a fragment points to from a page path
/// ```
/// use partials::home_href;
///
/// assert_eq!(home_href("/owner/site/index.html"), "index.html");
/// assert_eq!(home_href("/owner/site/members/member.html"), "/owner/site/index.html");
/// ```
pub fn home_href(path: &str) -> String {
    if is_index_path(path) {
        "index.html".to_string()
    } else {
        format!("{}index.html", base_path(path))
    }
}

/// The action a same-page anchor gets on a page path
/// ```
/// use page::Action;
/// use partials::fragment_action;
///
/// assert_eq!(fragment_action("/", "#about"), Action::ScrollTo("#about".to_string()));
/// assert_eq!(
///     fragment_action("/owner/site/members/member.html", "#about"),
///     Action::Redirect("/owner/site/index.html#about".to_string())
/// );
/// ```
pub fn fragment_action(path: &str, href: &str) -> Action {
    if is_index_path(path) {
        Action::ScrollTo(href.to_string())
    } else {
        Action::Redirect(format!("{}index.html{}", base_path(path), href))
    }
}

/// Bind every same-page anchor inside a container.
///
/// The anchor's `href` is its listener target, and it fires on click and on the Enter key.
/// Binding again replaces the earlier listener of the same anchor.
pub fn attach_fragment_behavior(doc: &mut Document, key: &str) {
    let container = some!(doc.element(key), "No container to rewire anchors in", return);
    let html = container.inner_html().to_string();
    let path = doc.location().path().to_string();
    let hrefs: Vec<String> = markup::open_tags(&html)
        .filter(|t| t.name == "a")
        .filter_map(|t| t.get("href").map(str::to_string))
        .filter(|href| href.starts_with('#'))
        .collect();
    for href in hrefs {
        let action = fragment_action(&path, &href);
        doc.listen(key, &href, true, action);
    }
}

/// Point the home link inside a container at the index page
pub fn adjust_home_link(doc: &mut Document, key: &str, home_attr: &str) {
    let html = some!(doc.element(key), return).inner_html().to_string();
    let tag = some!(markup::open_tags(&html).find(|t| t.has(home_attr)), return);
    let href = home_href(doc.location().path());
    let adjusted = markup::set_attr(&html, &tag, "href", &href);
    // Listeners are bound to the content, keep them across the rewrite
    let listeners = doc.element(key).map(|c| c.listeners().to_vec()).unwrap_or_default();
    doc.set_inner_html(key, adjusted);
    for l in listeners {
        doc.listen(key, &l.target, l.on_enter, l.action);
    }
}

/// Run a fragment action bound by [`attach_fragment_behavior`].
///
/// Returns `false` for actions that aren't fragment actions.
pub fn follow_fragment(doc: &mut Document, action: &Action) -> bool {
    match action {
        Action::ScrollTo(href) => {
            if doc.has_anchor_target(href) {
                doc.scroll_into_view(&anchor_id(href));
            } else {
                doc.set_hash(href);
            }
            true
        }
        Action::Redirect(dest) => {
            doc.assign(dest);
            true
        }
        _ => false,
    }
}

/// Load a fragment into a container.
///
/// `url` is resolved against the page location. Failures never propagate: a missing container
/// is only logged, a failed fetch is logged and replaces the container's content with an
/// inline error.
pub async fn load_partial(page: &Page, fetcher: &dyn Fetch, config: &SiteConfig, key: &str, url: &str) {
    let resolved = {
        let doc = page.read().await;
        if doc.element(key).is_none() {
            warn!("Container '{}' not found to load '{}' into", key, url);
            return;
        }
        doc.location().join(url)
    };
    let resolved = ok!(resolved, "Malformed fragment url", {
        page.write().await.set_inner_html(key, render::messages::fragment_error(url));
        return;
    });

    match fetch_text(fetcher, &resolved).await {
        Ok(body) => {
            let mut doc = page.write().await;
            doc.set_inner_html(key, body);
            attach_fragment_behavior(&mut doc, key);
            adjust_home_link(&mut doc, key, &config.home_link_attr);
            info!("Loaded fragment '{}' into '{}'", url, key);
        }
        Err(why) => {
            warn!("Failed to load fragment '{}': {}", url, why);
            page.write().await.set_inner_html(key, render::messages::fragment_error(url));
        }
    }
}

/// Load every include element of the page.
///
/// The include elements are listed once, then each one is loaded independently and
/// concurrently. No order between them is kept.
pub async fn load_includes(page: &Page, fetcher: &dyn Fetch, config: &SiteConfig) {
    let targets = page.read().await.include_targets();
    let loads = targets
        .iter()
        .filter(|(_, path)| !path.is_empty())
        .map(|(key, path)| load_partial(page, fetcher, config, key, path));
    join_all(loads).await;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use page::fetch::MemoryFetcher;
    use page::{Trigger, Url};
    use tokio::sync::RwLock;

    use super::*;

    const NAV: &str = concat!(
        r#"<nav><a data-home-link href="/"><img src="logo.png"></a>"#,
        r##"<a href="#about">About</a><a href="#members">Members</a><a href="https://x.test/">Out</a></nav>"##,
    );

    fn page(url: &str, html: &str) -> Page {
        Arc::new(RwLock::new(Document::parse(Url::parse(url).unwrap(), html, "data-include")))
    }

    fn fetcher() -> MemoryFetcher {
        MemoryFetcher::new()
            .with("/owner/site/partials/nav.html", 200, NAV)
            .with("/partials/nav.html", 200, NAV)
            .with("/owner/site/partials/footer.html", 200, "<footer>f</footer>")
            .with_failure("/owner/site/partials/broken.html", "connection reset")
    }

    #[tokio::test]
    async fn missing_container_is_logged_not_thrown() {
        let page = page("https://g.test/index.html", "<body></body>");
        load_partial(&page, &fetcher(), &SiteConfig::default(), "nav", "partials/nav.html").await;
        assert_eq!(page.read().await.render(), "<body></body>");
    }

    #[test]
    fn rewiring_without_container_or_home_link_leaves_page_alone() {
        let mut doc = Document::parse(
            Url::parse("https://g.test/owner/site/index.html").unwrap(),
            r##"<div id="nav"><a href="#about">About</a></div>"##,
            "data-include",
        );
        attach_fragment_behavior(&mut doc, "footer");
        adjust_home_link(&mut doc, "footer", "data-home-link");
        adjust_home_link(&mut doc, "nav", "data-home-link");
        assert_eq!(doc.render(), r##"<div id="nav"><a href="#about">About</a></div>"##);
        assert_eq!(doc.dispatch("nav", "#about", &Trigger::Click), None);
    }

    #[tokio::test]
    async fn load_partial_injects_and_rewires() {
        let page = page("https://g.test/owner/site/index.html", r#"<div id="nav"></div><section id="about"></section>"#);
        load_partial(&page, &fetcher(), &SiteConfig::default(), "nav", "partials/nav.html").await;
        let doc = page.read().await;
        let nav = doc.element("nav").unwrap();
        assert!(nav.inner_html().contains(r#"<a data-home-link href="index.html">"#));
        assert_eq!(
            doc.dispatch("nav", "#about", &Trigger::Click),
            Some(Action::ScrollTo("#about".to_string()))
        );
        assert_eq!(
            doc.dispatch("nav", "#members", &Trigger::enter()),
            Some(Action::ScrollTo("#members".to_string()))
        );
        assert_eq!(doc.dispatch("nav", "https://x.test/", &Trigger::Click), None);
    }

    #[tokio::test]
    async fn subpage_anchors_redirect_to_index() {
        let page = page("https://g.test/owner/site/members/member.html?nickname=Foo", r#"<div id="nav"></div>"#);
        load_partial(&page, &fetcher(), &SiteConfig::default(), "nav", "../partials/nav.html").await;
        let mut doc = page.write().await;
        assert!(doc.element("nav").unwrap().inner_html().contains(r#"href="/owner/site/index.html""#));

        let action = doc.dispatch("nav", "#about", &Trigger::Click).unwrap();
        assert_eq!(action, Action::Redirect("/owner/site/index.html#about".to_string()));
        assert!(follow_fragment(&mut doc, &action));
        assert_eq!(
            doc.take_pending_navigation().unwrap().as_str(),
            "https://g.test/owner/site/index.html#about"
        );
    }

    #[tokio::test]
    async fn failed_fetch_renders_inline_error() {
        let page = page(
            "https://g.test/owner/site/index.html",
            r#"<div data-include="partials/missing.html"></div><div data-include="partials/broken.html"></div>"#,
        );
        load_includes(&page, &fetcher(), &SiteConfig::default()).await;
        let html = page.read().await.render();
        assert!(html.contains("Failed to load partials/missing.html"));
        assert!(html.contains("Failed to load partials/broken.html"));
    }

    #[tokio::test]
    async fn includes_load_independently() {
        let page = page(
            "https://g.test/owner/site/",
            concat!(
                r#"<header data-include="partials/nav.html"></header>"#,
                r#"<div data-include="partials/broken.html"></div>"#,
                r#"<footer data-include="partials/footer.html"></footer>"#,
                r#"<div data-include=""></div>"#,
            ),
        );
        load_includes(&page, &fetcher(), &SiteConfig::default()).await;
        let doc = page.read().await;
        let html = doc.render();
        assert!(html.contains(r#"<header data-include="partials/nav.html"><nav>"#));
        assert!(html.contains("<footer>f</footer>"));
        assert!(html.contains("Failed to load partials/broken.html"));
        assert!(html.ends_with(r#"<div data-include=""></div>"#));
        assert!(doc.dispatch("data-include:0", "#about", &Trigger::Click).is_some());
    }

    #[test]
    fn scroll_falls_back_to_hash() {
        let url = Url::parse("https://g.test/index.html").unwrap();
        let mut doc = Document::parse(url, r#"<section id="about"></section>"#, "data-include");
        follow_fragment(&mut doc, &Action::ScrollTo("#about".to_string()));
        assert_eq!(doc.scrolled_to(), Some("about"));
        assert_eq!(doc.location().fragment(), None);

        follow_fragment(&mut doc, &Action::ScrollTo("#contact".to_string()));
        assert_eq!(doc.location().fragment(), Some("contact"));
        assert!(doc.pending_navigation().is_none());
    }

    #[test]
    fn other_actions_are_not_fragment_actions() {
        let mut doc = Document::blank(Url::parse("https://g.test/").unwrap());
        assert!(!follow_fragment(&mut doc, &Action::GoToPage(2)));
    }
}
