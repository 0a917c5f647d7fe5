//! Member records as found in the published dataset
use std::fmt;

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A member level, published as a number, as free text, or as anything else JSON allows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Level {
    Number(serde_json::Number),
    Text(String),
    /// Shown in its JSON text form
    Other(Value),
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
            Self::Other(v) => write!(f, "{}", v),
        }
    }
}

/// One member of the guild directory.
///
/// Every field is optional. Text fields accept any JSON value, anything but a string is kept in
/// its JSON text form, so `"uid": 12345` and `"uid": "12345"` read the same. One odd field
/// never makes the record unreadable.
///
/// Some fields are published under more than one name, use the accessor methods
/// ([`nickname`](Self::nickname), [`guild`](Self::guild), [`rank`](Self::rank),
/// [`level`](Self::level)) to read them regardless of the name used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberRecord {
    #[serde(deserialize_with = "text")]
    pub nickname: Option<String>,
    #[serde(deserialize_with = "text")]
    pub nick: Option<String>,
    #[serde(deserialize_with = "text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "text")]
    pub gremio: Option<String>,
    #[serde(deserialize_with = "text")]
    pub guild: Option<String>,
    #[serde(deserialize_with = "text")]
    pub rango: Option<String>,
    #[serde(deserialize_with = "text")]
    pub rank: Option<String>,
    pub nivel: Option<Level>,
    pub level: Option<Level>,
    #[serde(deserialize_with = "text")]
    pub avatar: Option<String>,
    #[serde(deserialize_with = "text")]
    pub uid: Option<String>,
    #[serde(deserialize_with = "text")]
    pub fecha_nacimiento: Option<String>,
    #[serde(deserialize_with = "text")]
    pub whatsapp: Option<String>,
    #[serde(deserialize_with = "text")]
    pub alias_wa: Option<String>,
    #[serde(deserialize_with = "text")]
    pub pais: Option<String>,
    #[serde(deserialize_with = "text")]
    pub discord: Option<String>,
    #[serde(deserialize_with = "text")]
    pub alias_dc: Option<String>,
    /// Profile image, relative to the site root
    #[serde(deserialize_with = "text")]
    pub profile: Option<String>,
    #[serde(deserialize_with = "text")]
    pub id: Option<String>,
}

/// Pick the first present, non empty value
fn first<'a>(fields: &[&'a Option<String>]) -> Option<&'a str> {
    fields.iter().copied().filter_map(Option::as_deref).find(|s| !s.is_empty())
}

impl MemberRecord {
    /// Create a record with only a nickname
    pub fn named(nickname: &str) -> Self {
        Self { nickname: Some(nickname.to_string()), ..Default::default() }
    }

    /// Nickname, read from `nickname`, `nick` or `name`
    pub fn nickname(&self) -> Option<&str> {
        first(&[&self.nickname, &self.nick, &self.name])
    }

    /// Guild name, read from `gremio` or `guild`
    pub fn guild(&self) -> Option<&str> {
        first(&[&self.gremio, &self.guild])
    }

    /// Rank label, read from `rango` or `rank`
    pub fn rank(&self) -> Option<&str> {
        first(&[&self.rango, &self.rank])
    }

    /// Level, read from `nivel` or `level`
    pub fn level(&self) -> Option<&Level> {
        self.nivel.as_ref().or(self.level.as_ref())
    }

    /// Avatar url, if one is published
    pub fn avatar(&self) -> Option<&str> {
        first(&[&self.avatar])
    }

    /// Stable identifier, the published `id` or one derived from the nickname.
    /// ```
    /// use memberdb::model::MemberRecord;
    ///
    /// assert_eq!(MemberRecord::named("Dark  Knight").id().as_deref(), Some("dark-knight"));
    /// let record = MemberRecord { id: Some("dk-01".to_string()), ..MemberRecord::named("Dark Knight") };
    /// assert_eq!(record.id().as_deref(), Some("dk-01"));
    /// assert_eq!(MemberRecord::default().id(), None);
    /// ```
    pub fn id(&self) -> Option<String> {
        match first(&[&self.id]) {
            Some(id) => Some(id.to_string()),
            None => self.nickname().map(util::string::dash_whitespace),
        }
    }
}

fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Ok(Some(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_fields_are_read_as_text() {
        let record: MemberRecord =
            serde_json::from_str(r#"{"nickname":"Foo","uid":123456789,"whatsapp":null,"pais":true}"#).unwrap();
        assert_eq!(record.uid.as_deref(), Some("123456789"));
        assert_eq!(record.whatsapp, None);
        assert_eq!(record.pais.as_deref(), Some("true"));
    }

    #[test]
    fn nested_values_are_kept_as_json_text() {
        let record: MemberRecord =
            serde_json::from_str(r#"{"nickname":"Foo","discord":{"tag":"a#1"},"pais":["AR","UY"]}"#).unwrap();
        assert_eq!(record.discord.as_deref(), Some(r#"{"tag":"a#1"}"#));
        assert_eq!(record.pais.as_deref(), Some(r#"["AR","UY"]"#));
    }

    #[test]
    fn odd_levels_are_kept() {
        let record: MemberRecord = serde_json::from_str(r#"{"nickname":"Foo","nivel":true}"#).unwrap();
        assert_eq!(record.level(), Some(&Level::Other(Value::Bool(true))));
        assert_eq!(record.level().unwrap().to_string(), "true");
    }

    #[test]
    fn aliases_fill_in_missing_fields() {
        let record: MemberRecord =
            serde_json::from_str(r#"{"name":"Foo","guild":"Alpha","rank":"Elder","level":"30"}"#).unwrap();
        assert_eq!(record.nickname(), Some("Foo"));
        assert_eq!(record.guild(), Some("Alpha"));
        assert_eq!(record.rank(), Some("Elder"));
        assert_eq!(record.level().map(|l| l.to_string()).as_deref(), Some("30"));
    }

    #[test]
    fn primary_names_win_over_aliases() {
        let record: MemberRecord = serde_json::from_str(
            r#"{"nickname":"Foo","nick":"F","gremio":"Alfa","guild":"Alpha","nivel":12,"level":99}"#,
        )
        .unwrap();
        assert_eq!(record.nickname(), Some("Foo"));
        assert_eq!(record.guild(), Some("Alfa"));
        assert_eq!(record.level(), Some(&Level::Number(serde_json::Number::from(12u64))));
    }

    #[test]
    fn empty_text_counts_as_absent() {
        let record: MemberRecord = serde_json::from_str(r#"{"nickname":"","nick":"Foo","avatar":""}"#).unwrap();
        assert_eq!(record.nickname(), Some("Foo"));
        assert_eq!(record.avatar(), None);
    }

    #[test]
    fn fractional_level_keeps_json_form() {
        let record: MemberRecord = serde_json::from_str(r#"{"nivel":12.5}"#).unwrap();
        assert_eq!(record.level().unwrap().to_string(), "12.5");
    }
}
