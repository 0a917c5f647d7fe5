//! String related functions
use anyhow::{Context, Result};

/// Escape a string for use as HTML text or as a quoted attribute value.
///
/// Replaces `&`, `<`, `>`, `"` and `'` with their entity forms, everything else is kept as is.
/// ```
/// # use util::string::escape_html;
/// assert_eq!(escape_html("<b>\"Tom\" & 'Jerry'</b>"),
///     "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
/// assert_eq!(escape_html("plain"), "plain");
/// ```
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Percent encode a string so it can be used as a single URI component, such as a query value.
/// ```
/// # use util::string::encode_component;
/// assert_eq!(encode_component("Señor Foo"), "Se%C3%B1or%20Foo");
/// assert_eq!(encode_component("a&b=c"), "a%26b%3Dc");
/// ```
pub fn encode_component(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Decode a percent encoded URI component.
///
/// # Errors
/// Returns [`Err`] if the decoded bytes are not valid UTF-8.
/// ```
/// # use util::string::decode_component;
/// assert_eq!(decode_component("Se%C3%B1or%20Foo").unwrap(), "Señor Foo");
/// assert!(decode_component("%FF%FE").is_err());
/// ```
///
/// [`Err`]: std::result::Result::Err
pub fn decode_component(s: &str) -> Result<String> {
    let decoded = urlencoding::decode(s).with_context(|| format!("Malformed URI component '{}'", s))?;
    Ok(decoded.into_owned())
}

/// Turn arbitrary text into a lowercase slug.
///
/// Every character that is not an ASCII letter, digit, `_` or `-` becomes `-`.
/// ```
/// # use util::string::slugify;
/// assert_eq!(slugify("Dark Knight%FF"), "dark-knight-ff");
/// assert_eq!(slugify("ok_Name-1"), "ok_name-1");
/// ```
pub fn slugify(s: &str) -> String {
    s.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
                ch.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

/// Lowercase a string and collapse every whitespace run into a single `-`.
/// ```
/// # use util::string::dash_whitespace;
/// assert_eq!(dash_whitespace("Big  Red\tFox"), "big-red-fox");
/// ```
pub fn dash_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
        } else {
            out.extend(ch.to_lowercase());
            in_space = false;
        }
    }
    out
}

/// Deserialize content of file into `Option<...>`.
///
/// Takes the path to the json file, and an optional default value.
/// If the file doesn't exists and default value is provided, then returns that default value.
/// ```no_run
/// # use util::read_json;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Settings;
///
/// let settings: Option<Settings> = read_json!("site.json");
/// let pages: Option<Vec<String>> = read_json!("pages.json", Vec::new());
/// ```
#[macro_export]
macro_rules! read_json {
    ($path:expr) => {
        match ::std::fs::read_to_string($path) {
            Ok(s) => match ::serde_json::from_str(&s) {
                Ok(json) => Some(json),
                Err(why) => {
                    ::tracing::error!("Failed to parse json file '{}': {:#}", $path, why);
                    None
                }
            },
            Err(why) => {
                ::tracing::error!("Failed to open file '{}': {:#}", $path, why);
                None
            }
        }
    };
    ($path:expr, $default:expr) => {
        match ::std::fs::read_to_string($path) {
            Ok(s) => match ::serde_json::from_str(&s) {
                Ok(json) => Some(json),
                Err(why) => {
                    ::tracing::error!("Failed to parse json file '{}': {:#}", $path, why);
                    None
                }
            },
            Err(why) => {
                if let ::std::io::ErrorKind::NotFound = why.kind() {
                    Some($default)
                } else {
                    ::tracing::error!("Failed to open file '{}': {:#}", $path, why);
                    None
                }
            }
        }
    };
}
