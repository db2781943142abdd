//! Recognised HTTP method tokens.
//!
//! Tokens are kept lower-case, matching the filenames that bind them
//! (`get.toml`, `post.toml`, ...).

/// Every method token a handler file may be named after.
pub const METHODS: &[&str] = &[
    "acl",
    "bind",
    "checkout",
    "connect",
    "copy",
    "delete",
    "get",
    "head",
    "link",
    "lock",
    "m-search",
    "merge",
    "mkactivity",
    "mkcalendar",
    "mkcol",
    "move",
    "notify",
    "options",
    "patch",
    "post",
    "propfind",
    "proppatch",
    "purge",
    "put",
    "rebind",
    "report",
    "search",
    "source",
    "subscribe",
    "trace",
    "unbind",
    "unlink",
    "unlock",
    "unsubscribe",
];

/// Returns the canonical token for `name`, compared case-insensitively.
pub fn canonical(name: &str) -> Option<&'static str> {
    let lowered = name.to_ascii_lowercase();
    METHODS
        .binary_search(&lowered.as_str())
        .ok()
        .map(|idx| METHODS[idx])
}

/// Returns true if `name` is a recognised method token.
pub fn is_method(name: &str) -> bool {
    canonical(name).is_some()
}
