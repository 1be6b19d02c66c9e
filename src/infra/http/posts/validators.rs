//! Field rules applied to submitted post forms.

use std::net::IpAddr;

use url::{Host, Url};

pub(crate) const REQUIRED_MESSAGE: &str = "This field is required.";
pub(crate) const INVALID_URL_MESSAGE: &str = "Invalid URL.";

/// Characters that could close the CSS `url('...')` the cover image is rendered in.
const URL_FORBIDDEN_CHARS: [char; 5] = ['\'', '"', '(', ')', '\\'];

pub(crate) fn required(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(REQUIRED_MESSAGE.to_string())
    } else {
        Ok(())
    }
}

/// Counts characters, not bytes, to match the column width.
pub(crate) fn max_length(value: &str, max: usize) -> Result<(), String> {
    if value.chars().count() > max {
        Err(format!("Field cannot be longer than {max} characters."))
    } else {
        Ok(())
    }
}

/// Accept absolute URLs of the form `scheme://host[...]` whose host is an IP
/// address or a dotted domain ending in a top-level label. Quotes, parentheses,
/// backslashes and inner whitespace are refused outright.
pub(crate) fn url(value: &str) -> Result<(), String> {
    let invalid = || INVALID_URL_MESSAGE.to_string();
    let value = value.trim();

    if value
        .chars()
        .any(|ch| ch.is_whitespace() || URL_FORBIDDEN_CHARS.contains(&ch))
    {
        return Err(invalid());
    }

    let (scheme, rest) = value.split_once("://").ok_or_else(invalid)?;
    if scheme.is_empty() || !scheme.chars().all(|ch| ch.is_ascii_alphabetic()) || rest.is_empty()
    {
        return Err(invalid());
    }

    let parsed = Url::parse(value).map_err(|_| invalid())?;
    match parsed.host() {
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => Ok(()),
        Some(Host::Domain(domain)) if is_domain_with_tld(domain) => Ok(()),
        _ => Err(invalid()),
    }
}

fn is_domain_with_tld(domain: &str) -> bool {
    if domain.parse::<IpAddr>().is_ok() {
        return true;
    }

    let domain = domain.strip_suffix('.').unwrap_or(domain);
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    });

    let tld = labels[labels.len() - 1];
    let tld_ok = tld.starts_with("xn--")
        || (tld.len() >= 2 && tld.chars().all(|ch| ch.is_ascii_alphabetic()));

    labels_ok && tld_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_blank_values() {
        assert!(required("Hello").is_ok());
        assert_eq!(required(""), Err(REQUIRED_MESSAGE.to_string()));
        assert_eq!(required("   \n\t"), Err(REQUIRED_MESSAGE.to_string()));
    }

    #[test]
    fn max_length_counts_characters() {
        let accented = "é".repeat(250);
        assert!(max_length(&accented, 250).is_ok());
        assert_eq!(
            max_length(&"a".repeat(251), 250),
            Err("Field cannot be longer than 250 characters.".to_string())
        );
    }

    #[test]
    fn accepts_common_image_urls() {
        for candidate in [
            "https://images.unsplash.com/photo-1.jpg",
            "http://example.com",
            "http://example.com:8080/a/b?c=d",
            "ftp://files.example.org/pic.png",
            "http://127.0.0.1/a.png",
            "http://[::1]/a.png",
            "https://xn--bcher-kva.example/",
        ] {
            assert!(url(candidate).is_ok(), "{candidate} should be accepted");
        }
    }

    #[test]
    fn rejects_malformed_urls() {
        for candidate in [
            "",
            "not a url",
            "example.com/photo.jpg",
            "mailto:ada@example.com",
            "http://",
            "http://localhost/a.png",
            "http://example.c0m/",
            "http://exa mple.com/",
            "1http://example.com",
            "https://e.com/a.jpg');background:url('https://evil.example/x.png",
            "https://e.com/a\".jpg",
            "https://e.com/a(1).jpg",
            "https://e.com/a\\b.jpg",
            "https://e.com/a\tb.jpg",
        ] {
            assert_eq!(
                url(candidate),
                Err(INVALID_URL_MESSAGE.to_string()),
                "{candidate} should be rejected"
            );
        }
    }
}
