//! Minimal tag scanner for page and fragment markup.
//!
//! This is not an HTML parser. It finds start and end tags, reads their attributes and can
//! rewrite a single attribute in place, which is all the page scripts need from first-party
//! markup.
use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

/// Elements that never have a closing tag
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source", "track",
    "wbr",
];

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<(/?)([a-zA-Z][a-zA-Z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#).expect("valid tag regex")
    })
}

fn attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
            .expect("valid attribute regex")
    })
}

/// A start or end tag found in markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Lowercased tag name
    pub name: String,
    /// Byte range of the whole tag, `<` to `>` inclusive
    pub span: Range<usize>,
    pub closing: bool,
    attrs: Vec<Attr>,
}

/// A single attribute of a [`Tag`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    /// Lowercased attribute name
    pub name: String,
    /// Unescaped value, empty for bare attributes
    pub value: String,
    /// Byte range of `name="value"` in the markup the tag was scanned from
    pub span: Range<usize>,
}

impl Tag {
    /// Get the value of an attribute, bare attributes have an empty value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|a| a.name == name).map(|a| a.value.as_str())
    }

    /// Checks if the tag carries an attribute
    pub fn has(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }

    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    /// Checks if the tag never has a matching end tag
    pub fn is_void(&self, html: &str) -> bool {
        VOID_ELEMENTS.contains(&self.name.as_str()) || html[self.span.clone()].ends_with("/>")
    }
}

/// Scan every start and end tag in order of appearance
/// ```
/// use page::markup::tags;
///
/// let html = r##"<nav><a href="#about" class='x'>About</a></nav>"##;
/// let found: Vec<_> = tags(html).map(|t| (t.name.clone(), t.closing)).collect();
/// assert_eq!(found, vec![
///     ("nav".to_string(), false),
///     ("a".to_string(), false),
///     ("a".to_string(), true),
///     ("nav".to_string(), true),
/// ]);
/// ```
pub fn tags(html: &str) -> impl Iterator<Item = Tag> + '_ {
    tag_re().captures_iter(html).map(|caps| {
        let whole = caps.get(0).expect("group 0 always matches");
        let closing = !caps[1].is_empty();
        let attrs = match caps.get(3) {
            Some(m) if !closing => parse_attrs(m.as_str(), m.start()),
            _ => Vec::new(),
        };
        Tag {
            name: caps[2].to_ascii_lowercase(),
            span: whole.range(),
            closing,
            attrs,
        }
    })
}

/// Scan only the start tags
pub fn open_tags(html: &str) -> impl Iterator<Item = Tag> + '_ {
    tags(html).filter(|t| !t.closing)
}

/// Find the end tag matching the start tag `open`, returns the range of the element's content.
///
/// Nested elements of the same name are counted. An unclosed element is treated as empty.
pub fn inner_range(html: &str, open: &Tag) -> Option<Range<usize>> {
    if open.closing || open.is_void(html) {
        return None;
    }
    let rest = &html[open.span.end..];
    let mut depth = 1usize;
    for tag in tags(rest).filter(|t| t.name == open.name) {
        if tag.closing {
            depth -= 1;
            if depth == 0 {
                return Some(open.span.end..open.span.end + tag.span.start);
            }
        } else if !tag.is_void(rest) {
            depth += 1;
        }
    }
    Some(open.span.end..open.span.end)
}

/// Return `html` with attribute `name` of `tag` set to `value`.
///
/// The attribute is replaced if it exists, otherwise it is appended to the tag.
/// ```
/// use page::markup::{open_tags, set_attr};
///
/// let html = r#"<p><a data-home-link href="/old">Home</a><img src=x></p>"#;
/// let tag = open_tags(html).find(|t| t.has("data-home-link")).unwrap();
/// let html = set_attr(html, &tag, "href", "index.html");
/// assert_eq!(html, r#"<p><a data-home-link href="index.html">Home</a><img src=x></p>"#);
///
/// let tag = open_tags(&html).find(|t| t.name == "img").unwrap();
/// let html = set_attr(&html, &tag, "alt", "a \"b\"");
/// assert!(html.contains(r#"<img src=x alt="a &quot;b&quot;">"#));
/// ```
pub fn set_attr(html: &str, tag: &Tag, name: &str, value: &str) -> String {
    let rendered = format!("{}=\"{}\"", name, util::string::escape_html(value));
    let mut out = String::with_capacity(html.len() + rendered.len() + 1);
    match tag.attrs.iter().find(|a| a.name == name) {
        Some(attr) => {
            out.push_str(&html[..attr.span.start]);
            out.push_str(&rendered);
            out.push_str(&html[attr.span.end..]);
        }
        None => {
            let raw = &html[tag.span.clone()];
            let insert_at = if raw.ends_with("/>") { tag.span.end - 2 } else { tag.span.end - 1 };
            let head = html[..insert_at].trim_end();
            out.push_str(head);
            out.push(' ');
            out.push_str(&rendered);
            if raw.ends_with("/>") {
                out.push(' ');
            }
            out.push_str(&html[insert_at..]);
        }
    }
    out
}

fn parse_attrs(section: &str, offset: usize) -> Vec<Attr> {
    attr_re()
        .captures_iter(section)
        .map(|caps| {
            let whole = caps.get(0).expect("group 0 always matches");
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| unescape(m.as_str()))
                .unwrap_or_default();
            Attr {
                name: caps[1].to_ascii_lowercase(),
                value,
                span: offset + whole.start()..offset + whole.end(),
            }
        })
        .collect()
}

/// Reverse of [`util::string::escape_html`] for attribute values
fn unescape(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}
