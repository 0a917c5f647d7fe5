//! Member lookups
use crate::model::MemberRecord;

/// Find a member by nickname, ignoring case.
///
/// Nicknames are expected to be unique but this isn't enforced: when several members share a
/// nickname, the first one in dataset order is returned.
/// ```
/// use memberdb::model::MemberRecord;
/// use memberdb::query::find_by_nickname;
///
/// let members = vec![MemberRecord::named("Foo"), MemberRecord::named("Bar")];
/// assert!(find_by_nickname(&members, "foo").is_some());
/// assert!(find_by_nickname(&members, "BAR").is_some());
/// assert!(find_by_nickname(&members, "baz").is_none());
/// ```
pub fn find_by_nickname<'a>(members: &'a [MemberRecord], nickname: &str) -> Option<&'a MemberRecord> {
    let wanted = nickname.to_lowercase();
    members
        .iter()
        .find(|m| m.nickname().map_or(false, |n| n.to_lowercase() == wanted))
}
