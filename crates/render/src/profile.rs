//! Member profile panel
use memberdb::model::MemberRecord;
use util::string::escape_html;

use crate::card::avatar_url;

/// Listener target of the copy UID button
pub const COPY_TARGET: &str = "uid";

/// A rendered profile panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub html: String,
    /// Text the copy button puts on the clipboard
    pub uid: String,
}

/// Format the labeled fields of a profile.
///
/// Returns a list of (label, value) tuples in display order, missing values are empty.
/// ```
/// use memberdb::model::MemberRecord;
/// use render::profile::format_profile_fields;
///
/// let member = MemberRecord {
///     uid: Some("1234".to_string()),
///     rango: Some("Elder".to_string()),
///     pais: Some("Chile".to_string()),
///     ..MemberRecord::named("Foo")
/// };
/// assert_eq!(format_profile_fields(&member), vec![
///     ("UID", "1234".to_string()),
///     ("Rank", "Elder".to_string()),
///     ("Level", "".to_string()),
///     ("Birth date", "".to_string()),
///     ("WhatsApp", "".to_string()),
///     ("WhatsApp alias", "".to_string()),
///     ("Country", "Chile".to_string()),
///     ("Discord", "".to_string()),
///     ("Discord alias", "".to_string()),
/// ]);
/// ```
pub fn format_profile_fields(member: &MemberRecord) -> Vec<(&'static str, String)> {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    vec![
        ("UID", text(&member.uid)),
        ("Rank", member.rank().unwrap_or_default().to_string()),
        ("Level", member.level().map(|l| l.to_string()).unwrap_or_default()),
        ("Birth date", text(&member.fecha_nacimiento)),
        ("WhatsApp", text(&member.whatsapp)),
        ("WhatsApp alias", text(&member.alias_wa)),
        ("Country", text(&member.pais)),
        ("Discord", text(&member.discord)),
        ("Discord alias", text(&member.alias_dc)),
    ]
}

/// Resolve the profile image.
///
/// Relative paths are relative to the site root, which is `site_root` as seen from the profile
/// page. Without a profile image the avatar is used.
fn image_src(member: &MemberRecord, site_root: &str, avatar_service: &str) -> String {
    let resolve = |p: &str| {
        if p.contains("://") || p.starts_with('/') {
            p.to_string()
        } else {
            format!("{}{}", site_root, p)
        }
    };
    match member.profile.as_deref().filter(|p| !p.is_empty()) {
        Some(p) => resolve(p),
        None => match member.avatar() {
            Some(avatar) => resolve(avatar),
            None => avatar_url(avatar_service, member.nickname().unwrap_or_default()),
        },
    }
}

/// Render the profile panel of a member.
///
/// The copy button carries no handler source, the caller binds [`COPY_TARGET`] to a copy of
/// [`Profile::uid`].
pub fn render_profile(member: &MemberRecord, site_root: &str, avatar_service: &str) -> Profile {
    let nickname = escape_html(member.nickname().unwrap_or_default());
    let src = escape_html(&image_src(member, site_root, avatar_service));
    let uid = member.uid.clone().unwrap_or_default();

    let mut items = String::new();
    for (label, value) in format_profile_fields(member) {
        if label == "UID" {
            items.push_str(&format!(
                concat!(
                    r#"<li class="flex items-center"><b class="text-emerald-400 mr-2">UID:</b>"#,
                    r#"<span id="uid-value" class="font-mono bg-gray-900 px-2 py-1 rounded">{}</span>"#,
                    r#"<button type="button" data-copy="{}" class="ml-2 px-2 py-1 bg-emerald-500 text-white rounded hover:bg-emerald-600 transition text-xs" title="Copy UID">Copy</button></li>"#,
                ),
                escape_html(&value),
                COPY_TARGET,
            ));
        } else {
            items.push_str(&format!(
                r#"<li><b class="text-emerald-400">{}:</b> <span>{}</span></li>"#,
                label,
                escape_html(&value)
            ));
        }
    }

    let html = format!(
        concat!(
            r#"<div class="bg-gray-800 p-8 rounded-xl shadow-xl w-full max-w-4xl flex flex-col md:flex-row gap-8 items-center justify-center">"#,
            r#"<div class="md:w-1/2 w-full flex justify-center">"#,
            r#"<a href="{src}" target="_blank" rel="noopener">"#,
            r#"<img src="{src}" alt="{nickname}" class="w-full max-w-md aspect-video rounded-2xl border-4 border-emerald-500 object-cover shadow-lg">"#,
            "</a></div>",
            r#"<div class="md:w-1/2 w-full flex flex-col justify-center">"#,
            r#"<h2 class="text-3xl font-extrabold mb-2 text-emerald-300 tracking-wide">{nickname}</h2>"#,
            r#"<h3 class="text-lg text-gray-400 mb-4 font-semibold">{guild}</h3>"#,
            r#"<ul class="text-left text-base text-gray-200 space-y-2 mb-4">{items}</ul>"#,
            r#"<div class="text-center"><a href="{back}" class="inline-block mt-4 px-6 py-2 bg-emerald-500 text-white font-semibold rounded-lg shadow hover:bg-emerald-600 transition">Back</a></div>"#,
            "</div></div>",
        ),
        src = src,
        nickname = nickname,
        guild = escape_html(member.guild().unwrap_or_default()),
        items = items,
        back = escape_html(&format!("{}index.html", site_root)),
    );
    Profile { html, uid }
}
