//! Canonical page paths, so handlers and redirects agree on them.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

pub const INDEX: &str = "/";
pub const POST_CREATE: &str = "/create/";

/// Bytes escaped inside one path segment. Usernames may contain non-ASCII letters.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'@')
    .remove(b'+');

fn segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

pub fn profile(username: &str) -> String {
    format!("/profile/{}/", segment(username))
}

pub fn post_detail(post_id: i64) -> String {
    format!("/posts/{post_id}/")
}

pub fn post_edit(post_id: i64) -> String {
    format!("/posts/{post_id}/edit/")
}

pub fn add_comment(post_id: i64) -> String {
    format!("/posts/{post_id}/comment/")
}

pub fn profile_follow(username: &str) -> String {
    format!("/profile/{}/follow/", segment(username))
}

pub fn profile_unfollow(username: &str) -> String {
    format!("/profile/{}/unfollow/", segment(username))
}
