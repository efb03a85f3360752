//! URL detection.
//!
//! Conservative token-level heuristic used to weed out pairs that carry
//! links rather than prose. A token counts as a URL if it parses as an
//! absolute URL with a host, starts with `www.`, or looks like a bare
//! domain ending in a well-known TLD.
use std::collections::HashSet;

use lazy_static::lazy_static;
use url::Url;

lazy_static! {

    /// TLDs accepted for bare-domain detection.
    /// Kept short on purpose: a longer table starts matching
    /// abbreviations and decimal numbers.
    pub static ref TLD: HashSet<&'static str> = {
        let mut m = HashSet::new();
        m.insert("com");
        m.insert("org");
        m.insert("net");
        m.insert("edu");
        m.insert("gov");
        m.insert("mil");
        m.insert("int");
        m.insert("info");
        m.insert("biz");
        m.insert("io");
        m.insert("co");
        m.insert("ai");
        m.insert("me");
        m.insert("tv");
        m.insert("cc");
        m.insert("app");
        m.insert("dev");
        m.insert("uk");
        m.insert("de");
        m.insert("fr");
        m.insert("es");
        m.insert("it");
        m.insert("nl");
        m.insert("pl");
        m.insert("ru");
        m.insert("ua");
        m.insert("cn");
        m.insert("jp");
        m.insert("kr");
        m.insert("us");
        m.insert("ca");
        m.insert("au");
        m.insert("ch");
        m.insert("at");
        m.insert("se");
        m.insert("no");
        m.insert("fi");
        m.insert("eu");
        m
    };
}

/// Returns `true` if any whitespace-separated token of `text` looks like a URL.
pub fn contains_url(text: &str) -> bool {
    text.split_whitespace().any(token_is_url)
}

fn token_is_url(token: &str) -> bool {
    // shed wrapping punctuation ("(https://a.com)," and the like)
    let token = token.trim_matches(|c: char| {
        matches!(
            c,
            '(' | ')' | '[' | ']' | '{' | '}' | '"' | '\'' | ',' | '.' | ';' | ':' | '!' | '?'
                | '<' | '>'
        )
    });

    if token.is_empty() {
        return false;
    }

    if token.contains("://") {
        return match Url::parse(token) {
            Ok(url) => url.has_host(),
            Err(_) => false,
        };
    }

    if let Some(rest) = token.strip_prefix("www.") {
        return !rest.is_empty();
    }

    is_bare_domain(token)
}

/// `label(.label)+` where the last label is a known TLD and
/// every other label is plain ASCII alphanumeric (dashes allowed).
fn is_bare_domain(token: &str) -> bool {
    let host = match token.split_once('/') {
        Some((host, _)) => host,
        None => token,
    };

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let tld = match labels.last() {
        Some(tld) => tld.to_ascii_lowercase(),
        None => return false,
    };
    if !TLD.contains(tld.as_str()) {
        return false;
    }

    labels[..labels.len() - 1].iter().all(|label| {
        !label.is_empty()
            && label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}
