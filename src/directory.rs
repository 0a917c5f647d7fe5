//! Member directory page script.
//!
//! The dataset is fetched once per page load into a [`Directory`], which then renders any page
//! of the member list on demand. The current page lives in the `page` query parameter, so it
//! survives reloads and history traversal and can be shared as a link.
use anyhow::Context;
use config::SiteConfig;
use memberdb::dataset::fetch_members;
use memberdb::model::MemberRecord;
use page::fetch::Fetch;
use page::location::{query_param, with_query_param};
use page::{Action, Document, Page, Url};
use render::card::{card_ids, render_card};
use render::controls::{pagination_buttons, render_controls};
use render::messages;
use render::pager::{parse_page_param, Pager};
use tracing::{info, warn};
use util::ctxw;
use util::string::{decode_component, encode_component, slugify};

/// Page number a url asks for, see [`parse_page_param`]
pub fn current_page(url: &Url) -> usize {
    parse_page_param(query_param(url, "page").as_deref())
}

/// Profile link for an encoded nickname.
///
/// A nickname that doesn't decode falls back to a slug of the raw value.
/// ```
/// use guildsite::directory::profile_href;
///
/// assert_eq!(profile_href("members/member.html", "Dark%20Knight"), "members/member.html?nickname=Dark%20Knight");
/// assert_eq!(profile_href("members/member.html", "Bad%FF%FE"), "members/member.html?nickname=bad-ff-fe");
/// ```
pub fn profile_href(profile_page: &str, encoded_nickname: &str) -> String {
    let nickname = match decode_component(encoded_nickname) {
        Ok(nickname) => nickname,
        Err(why) => {
            warn!("Falling back to a slug for nickname '{}': {:#}", encoded_nickname, why);
            slugify(encoded_nickname)
        }
    };
    format!("{}?nickname={}", profile_page, encode_component(&nickname))
}

/// Navigate to the profile of a member, given its encoded nickname
pub fn open_member(doc: &mut Document, config: &SiteConfig, encoded_nickname: &str) {
    let href = profile_href(&config.profile_page, encoded_nickname);
    info!("Opening member profile '{}'", href);
    doc.assign(&href);
}

/// The member list of one page load
#[derive(Debug, Clone)]
pub struct Directory {
    members: Vec<MemberRecord>,
    /// Card element ids, by member position
    card_ids: Vec<Option<String>>,
    config: SiteConfig,
}

impl Directory {
    pub fn new(members: Vec<MemberRecord>, config: SiteConfig) -> Self {
        let card_ids = card_ids(&members);
        Self { members, card_ids, config }
    }

    /// Fetch the dataset and render the page the url asks for.
    ///
    /// On failure the member list shows an error and `None` is returned, nothing is retried.
    pub async fn load(page: &Page, fetcher: &dyn Fetch, config: &SiteConfig) -> Option<Self> {
        let url = page.read().await.location().join(&config.dataset_path);
        let result = match url.context("Malformed dataset url") {
            Ok(url) => fetch_members(fetcher, &url).await,
            Err(why) => Err(why),
        };
        let mut doc = page.write().await;
        match ctxw!(result, "Failed to load the member list") {
            Ok(members) => {
                let directory = Self::new(members, config.clone());
                let requested = current_page(doc.location());
                directory.render_page(&mut doc, requested);
                Some(directory)
            }
            Err(_) => {
                if doc.element(&config.member_list_id).is_some() {
                    doc.set_inner_html(&config.member_list_id, messages::MEMBER_LIST_ERROR);
                }
                None
            }
        }
    }

    /// Render a page of the member list and its controls, returns the page actually shown.
    ///
    /// The page number is clamped into the existing pages.
    pub fn render_page(&self, doc: &mut Document, page: usize) -> usize {
        let list_id = self.config.member_list_id.as_str();
        let pagination_id = self.config.pagination_id.as_str();
        if doc.element(list_id).is_none() {
            return 1;
        }
        let has_controls = doc.element(pagination_id).is_some();

        let pager = Pager::new(&self.members);
        if pager.is_empty() {
            doc.set_inner_html(list_id, messages::NO_MEMBERS);
            if has_controls {
                doc.set_inner_html(pagination_id, "");
            }
            return 1;
        }

        let current = pager.clamp(page);
        let ids = Pager::new(&self.card_ids).items(current);
        let cards: Vec<_> = pager
            .items(current)
            .iter()
            .zip(ids)
            .map(|(m, id)| render_card(m, id.as_deref(), &self.config.avatar_service))
            .collect();
        doc.set_inner_html(list_id, cards.iter().map(|c| c.html.as_str()).collect::<String>());
        for card in cards {
            let action = Action::OpenMember(card.target.clone());
            doc.listen(list_id, &card.target, true, action);
        }

        if has_controls {
            let buttons = pagination_buttons(pager.total_pages(), current);
            doc.set_inner_html(pagination_id, render_controls(&buttons));
            for button in buttons.iter().filter(|b| !b.disabled) {
                doc.listen(pagination_id, &button.target(), false, Action::GoToPage(button.page));
            }
        }
        current
    }

    /// Show another page, recording it in the url without reloading
    pub fn go_to_page(&self, doc: &mut Document, page: usize) -> usize {
        let page = Pager::new(&self.members).clamp(page);
        let url = with_query_param(doc.location(), "page", &page.to_string());
        doc.push_state(url);
        self.render_page(doc, page)
    }

    /// Re-render after a history traversal, from the page now in the url
    pub fn on_popstate(&self, doc: &mut Document) -> usize {
        let page = current_page(doc.location());
        self.render_page(doc, page)
    }
}

#[cfg(test)]
mod tests {
    use page::Trigger;

    use super::*;

    fn directory(n: usize) -> Directory {
        let members = (1..=n).map(|i| MemberRecord::named(&format!("Member {}", i))).collect();
        Directory::new(members, SiteConfig::default())
    }

    fn document(url: &str) -> Document {
        Document::parse(
            Url::parse(url).unwrap(),
            r#"<div id="member-list"></div><div id="pagination"></div>"#,
            "data-include",
        )
    }

    fn card_count(doc: &Document) -> usize {
        doc.element("member-list").unwrap().inner_html().matches("member-card").count()
    }

    #[test]
    fn pages_show_their_slice() {
        let directory = directory(25);
        let mut doc = document("https://g.test/index.html");
        assert_eq!(directory.render_page(&mut doc, 1), 1);
        assert_eq!(card_count(&doc), 12);
        assert_eq!(directory.render_page(&mut doc, 2), 2);
        assert_eq!(card_count(&doc), 12);
        assert!(doc.element("member-list").unwrap().inner_html().contains(">Member 13</h4>"));
        assert_eq!(directory.render_page(&mut doc, 3), 3);
        assert_eq!(card_count(&doc), 1);
        assert!(doc.element("member-list").unwrap().inner_html().contains(">Member 25</h4>"));
    }

    #[test]
    fn card_ids_are_unique_across_pages() {
        let mut members = vec![MemberRecord::named("Foo")];
        members.extend((2..=12).map(|i| MemberRecord::named(&format!("Member {}", i))));
        members.push(MemberRecord::named("FOO"));
        let directory = Directory::new(members, SiteConfig::default());
        let mut doc = document("https://g.test/index.html");

        directory.render_page(&mut doc, 1);
        assert!(doc.element("member-list").unwrap().inner_html().contains(r#"id="member-foo""#));
        directory.render_page(&mut doc, 2);
        let list = doc.element("member-list").unwrap().inner_html();
        assert!(list.contains(r#"id="member-foo-2""#));
        assert!(!list.contains(r#"id="member-foo""#));
    }

    #[test]
    fn out_of_range_pages_clamp() {
        let directory = directory(25);
        let mut doc = document("https://g.test/index.html");
        assert_eq!(directory.render_page(&mut doc, 0), 1);
        assert_eq!(directory.render_page(&mut doc, 99), 3);
        assert_eq!(directory.render_page(&mut doc, usize::MAX), 3);
    }

    #[test]
    fn empty_directory_shows_message() {
        let directory = directory(0);
        let mut doc = document("https://g.test/index.html");
        directory.render_page(&mut doc, 1);
        assert_eq!(doc.element("member-list").unwrap().inner_html(), messages::NO_MEMBERS);
        assert_eq!(doc.element("pagination").unwrap().inner_html(), "");
    }

    #[test]
    fn single_page_has_no_controls() {
        let directory = directory(12);
        let mut doc = document("https://g.test/index.html");
        directory.render_page(&mut doc, 1);
        assert_eq!(card_count(&doc), 12);
        assert_eq!(doc.element("pagination").unwrap().inner_html(), "");
    }

    #[test]
    fn cards_and_buttons_are_bound() {
        let directory = directory(25);
        let mut doc = document("https://g.test/index.html");
        directory.render_page(&mut doc, 1);
        assert_eq!(
            doc.dispatch("member-list", "Member%2013", &Trigger::Click),
            None,
            "cards of other pages are not bound"
        );
        assert_eq!(
            doc.dispatch("member-list", "Member%201", &Trigger::enter()),
            Some(Action::OpenMember("Member%201".to_string()))
        );
        assert_eq!(doc.dispatch("pagination", "0", &Trigger::Click), None, "disabled previous");
        assert_eq!(doc.dispatch("pagination", "2", &Trigger::Click), Some(Action::GoToPage(2)));
        assert_eq!(doc.dispatch("pagination", "3", &Trigger::Click), Some(Action::GoToPage(3)));
    }

    #[test]
    fn go_to_page_updates_url_without_loading() {
        let directory = directory(25);
        let mut doc = document("https://g.test/index.html?lang=es");
        assert_eq!(directory.go_to_page(&mut doc, 3), 3);
        assert_eq!(doc.location().as_str(), "https://g.test/index.html?lang=es&page=3");
        assert!(doc.pending_navigation().is_none());
        assert_eq!(card_count(&doc), 1);

        assert_eq!(directory.go_to_page(&mut doc, 7), 3);
        assert_eq!(current_page(doc.location()), 3);
    }

    #[test]
    fn popstate_renders_page_in_url() {
        let directory = directory(25);
        let mut doc = document("https://g.test/index.html?page=2");
        let requested = current_page(doc.location());
        assert_eq!(directory.render_page(&mut doc, requested), 2);
        directory.go_to_page(&mut doc, 3);
        doc.back();
        assert_eq!(directory.on_popstate(&mut doc), 2);
        assert_eq!(card_count(&doc), 12);
    }

    #[test]
    fn open_member_navigates_to_profile() {
        let mut doc = document("https://g.test/owner/site/index.html");
        open_member(&mut doc, &SiteConfig::default(), "Se%C3%B1or%20X");
        assert_eq!(
            doc.take_pending_navigation().unwrap().as_str(),
            "https://g.test/owner/site/members/member.html?nickname=Se%C3%B1or%20X"
        );
    }

    #[test]
    fn missing_list_container_is_ignored() {
        let directory = directory(3);
        let mut doc = Document::blank(Url::parse("https://g.test/").unwrap());
        assert_eq!(directory.render_page(&mut doc, 1), 1);
        assert!(doc.containers().is_empty());
    }
}
