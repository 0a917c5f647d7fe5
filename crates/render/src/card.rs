//! Member cards for the directory page
use std::collections::HashSet;

use memberdb::model::MemberRecord;
use util::string::{encode_component, escape_html};

use crate::PLACEHOLDER;

/// A rendered card and the key its click listener is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub html: String,
    /// The encoded nickname, also carried by the card's `data-member` attribute
    pub target: String,
}

/// Placeholder avatar for a nickname, the same nickname always gives the same url.
/// ```
/// use render::card::avatar_url;
///
/// assert_eq!(
///     avatar_url("https://api.dicebear.com/7.x/adventurer/svg", "Dark Knight"),
///     "https://api.dicebear.com/7.x/adventurer/svg?seed=Dark%20Knight"
/// );
/// ```
pub fn avatar_url(service: &str, nickname: &str) -> String {
    format!("{}?seed={}", service, encode_component(nickname))
}

/// Element ids for the cards of a whole dataset, one per member in order.
///
/// Ids are `member-` followed by [`MemberRecord::id`]. A repeated id gets the first free
/// `-2`, `-3`, ... suffix, so no two cards share one. Members without an id get none.
/// ```
/// use memberdb::model::MemberRecord;
/// use render::card::card_ids;
///
/// let members = [MemberRecord::named("Foo"), MemberRecord::named("FOO"), MemberRecord::default()];
/// assert_eq!(
///     card_ids(&members),
///     vec![Some("member-foo".to_string()), Some("member-foo-2".to_string()), None]
/// );
/// ```
pub fn card_ids(members: &[MemberRecord]) -> Vec<Option<String>> {
    let mut taken = HashSet::new();
    members
        .iter()
        .map(|member| {
            let base = format!("member-{}", member.id()?);
            let mut id = base.clone();
            let mut n = 1;
            while !taken.insert(id.clone()) {
                n += 1;
                id = format!("{}-{}", base, n);
            }
            Some(id)
        })
        .collect()
}

/// Render one member card, `dom_id` is its element id from [`card_ids`].
///
/// Missing nickname, guild, rank and level show as [`PLACEHOLDER`], a missing avatar falls back
/// to [`avatar_url`].
pub fn render_card(member: &MemberRecord, dom_id: Option<&str>, avatar_service: &str) -> Card {
    let nickname = member.nickname().unwrap_or(PLACEHOLDER);
    let guild = member.guild().unwrap_or(PLACEHOLDER);
    let rank = member.rank().unwrap_or(PLACEHOLDER);
    let level = member.level().map_or_else(|| PLACEHOLDER.to_string(), |l| l.to_string());
    let avatar = match member.avatar() {
        Some(avatar) => avatar.to_string(),
        None => avatar_url(avatar_service, nickname),
    };
    let target = encode_component(nickname);
    let dom_id = dom_id.map(|id| format!(" id=\"{}\"", escape_html(id))).unwrap_or_default();

    let html = format!(
        concat!(
            r#"<div class="member-card bg-gray-700 p-4 rounded-xl shadow-lg cursor-pointer"{} data-member="{}" role="link" tabindex="0">"#,
            r#"<img src="{}" alt="{}" class="w-24 h-24 mx-auto rounded-full mb-3 border-2 border-emerald-500">"#,
            r#"<h4 class="text-xl font-bold text-center text-emerald-300">{}</h4>"#,
            r#"<p class="text-center text-sm text-gray-300">{}</p>"#,
            r#"<p class="text-center text-sm text-gray-300">Rank: <span class="font-medium">{}</span></p>"#,
            r#"<p class="text-center text-sm text-gray-300">Level: <span class="font-medium">{}</span></p>"#,
            "</div>",
        ),
        dom_id,
        escape_html(&target),
        escape_html(&avatar),
        escape_html(nickname),
        escape_html(nickname),
        escape_html(guild),
        escape_html(rank),
        escape_html(&level),
    );
    Card { html, target }
}
