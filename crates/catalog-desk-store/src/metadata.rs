use catalog_desk_core::MetadataStamp;
use chrono::{DateTime, FixedOffset, Local};

use crate::access::User;

pub const REVISION_DATE_FORMAT: &str = "%Y-%m-%d %H:%M%z";

pub fn translator_display(user: &User) -> String {
    let first = non_empty_or(&user.first_name, "Anonymous");
    let last = non_empty_or(&user.last_name, "User");
    let email = non_empty_or(&user.email, "anonymous@user.tld");
    format!("{first} {last} <{email}>")
}

pub fn metadata_stamp(
    user: &User,
    tool_name: &str,
    tool_version: &str,
    now: DateTime<FixedOffset>,
) -> MetadataStamp {
    MetadataStamp {
        last_translator: translator_display(user),
        translated_using: format!("{tool_name} {tool_version}"),
        revision_date: now.format(REVISION_DATE_FORMAT).to_string(),
    }
}

pub fn metadata_stamp_now(user: &User, tool_name: &str, tool_version: &str) -> MetadataStamp {
    metadata_stamp(user, tool_name, tool_version, Local::now().fixed_offset())
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() { fallback } else { value }
}
