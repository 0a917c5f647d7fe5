//! Member profile page script
use anyhow::Context;
use config::SiteConfig;
use memberdb::dataset::fetch_members;
use memberdb::query::find_by_nickname;
use page::fetch::Fetch;
use page::location::query_param;
use page::{Action, Page};
use render::messages;
use render::profile::{render_profile, COPY_TARGET};
use tracing::info;
use util::ctxw;

/// How a profile page load ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileOutcome {
    Shown(String),
    NoNickname,
    NotFound(String),
    Failed,
    NoContainer,
}

/// Render the profile of the member named by the `nickname` query parameter.
///
/// Every failure ends in an inline message inside the profile container, nothing is retried.
pub async fn render_profile_page(page: &Page, fetcher: &dyn Fetch, config: &SiteConfig) -> ProfileOutcome {
    let key = config.profile_id.as_str();
    let (nickname, dataset_url) = {
        let doc = page.read().await;
        if doc.element(key).is_none() {
            return ProfileOutcome::NoContainer;
        }
        let nickname = query_param(doc.location(), "nickname").filter(|n| !n.is_empty());
        (nickname, doc.location().join(&config.profile_dataset_path))
    };

    let nickname = match nickname {
        Some(nickname) => nickname,
        None => {
            page.write().await.set_inner_html(key, messages::NO_MEMBER_SPECIFIED);
            return ProfileOutcome::NoNickname;
        }
    };

    let members = match dataset_url.context("Malformed dataset url") {
        Ok(url) => fetch_members(fetcher, &url).await,
        Err(why) => Err(why),
    };
    let members = match ctxw!(members, "Failed to load the member data") {
        Ok(members) => members,
        Err(_) => {
            page.write().await.set_inner_html(key, messages::PROFILE_ERROR);
            return ProfileOutcome::Failed;
        }
    };

    let member = match find_by_nickname(&members, &nickname) {
        Some(member) => member,
        None => {
            info!("No member named '{}'", nickname);
            page.write().await.set_inner_html(key, messages::MEMBER_NOT_FOUND);
            return ProfileOutcome::NotFound(nickname);
        }
    };

    let profile = render_profile(member, &config.profile_site_root, &config.avatar_service);
    let mut doc = page.write().await;
    doc.set_inner_html(key, profile.html);
    doc.listen(key, COPY_TARGET, true, Action::Copy(profile.uid));
    ProfileOutcome::Shown(member.nickname().unwrap_or_default().to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use page::fetch::MemoryFetcher;
    use page::{Document, Trigger, Url};
    use tokio::sync::RwLock;

    use super::*;

    const MEMBERS: &str = r#"{"members":[{"nickname":"Foo","uid":"4'2\"","gremio":"Alfa"},{"nickname":"foo","uid":"dup"}]}"#;

    fn page(url: &str) -> Page {
        let doc = Document::parse(Url::parse(url).unwrap(), r#"<main id="profile"></main>"#, "data-include");
        Arc::new(RwLock::new(doc))
    }

    fn fetcher() -> MemoryFetcher {
        MemoryFetcher::new().with("/site/data/members.json", 200, MEMBERS)
    }

    #[tokio::test]
    async fn lookup_ignores_case_and_takes_first() {
        for query in ["foo", "FOO", "Foo"] {
            let page = page(&format!("https://g.test/site/members/member.html?nickname={}", query));
            let outcome = render_profile_page(&page, &fetcher(), &SiteConfig::default()).await;
            assert_eq!(outcome, ProfileOutcome::Shown("Foo".to_string()));
            let doc = page.read().await;
            assert!(doc.element("profile").unwrap().inner_html().contains(">Alfa</h3>"));
        }
    }

    #[tokio::test]
    async fn copy_button_is_bound_to_uid() {
        let page = page("https://g.test/site/members/member.html?nickname=foo");
        render_profile_page(&page, &fetcher(), &SiteConfig::default()).await;
        let doc = page.read().await;
        assert_eq!(
            doc.dispatch("profile", COPY_TARGET, &Trigger::Click),
            Some(Action::Copy("4'2\"".to_string()))
        );
    }

    #[tokio::test]
    async fn missing_nickname() {
        for url in ["https://g.test/site/members/member.html", "https://g.test/site/members/member.html?nickname="] {
            let page = page(url);
            let outcome = render_profile_page(&page, &fetcher(), &SiteConfig::default()).await;
            assert_eq!(outcome, ProfileOutcome::NoNickname);
            assert_eq!(page.read().await.element("profile").unwrap().inner_html(), messages::NO_MEMBER_SPECIFIED);
        }
    }

    #[tokio::test]
    async fn unknown_member() {
        let page = page("https://g.test/site/members/member.html?nickname=Bar");
        let outcome = render_profile_page(&page, &fetcher(), &SiteConfig::default()).await;
        assert_eq!(outcome, ProfileOutcome::NotFound("Bar".to_string()));
        assert_eq!(page.read().await.element("profile").unwrap().inner_html(), messages::MEMBER_NOT_FOUND);
    }

    #[tokio::test]
    async fn fetch_failure_renders_error() {
        let page = page("https://g.test/site/members/member.html?nickname=Foo");
        let fetcher = MemoryFetcher::new().with_failure("/site/data/members.json", "offline");
        let outcome = render_profile_page(&page, &fetcher, &SiteConfig::default()).await;
        assert_eq!(outcome, ProfileOutcome::Failed);
        assert_eq!(page.read().await.element("profile").unwrap().inner_html(), messages::PROFILE_ERROR);
    }

    #[tokio::test]
    async fn no_container_does_nothing() {
        let page = Arc::new(RwLock::new(Document::blank(
            Url::parse("https://g.test/site/members/member.html?nickname=Foo").unwrap(),
        )));
        let outcome = render_profile_page(&page, &fetcher(), &SiteConfig::default()).await;
        assert_eq!(outcome, ProfileOutcome::NoContainer);
    }
}
