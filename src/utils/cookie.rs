//! Cookie header parsing and `Set-Cookie` rendering.

use axum::http::header::{COOKIE, InvalidHeaderValue};
use axum::http::{HeaderMap, HeaderValue};

/// Extracts the value of cookie `name` from the request headers.
///
/// Handles multiple `Cookie` headers and multiple cookies per header by
/// splitting on semicolons; other cookies are ignored.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(COOKIE, "theme=dark; session=abc".parse().unwrap());
///
/// assert_eq!(get(&headers, "session").as_deref(), Some("abc"));
/// ```
pub fn get(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|cookie_header| cookie_header.to_str().ok())
        .flat_map(|cookie_str| cookie_str.split(';'))
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(key), Some(value)) if key == name && !value.is_empty() => {
                    Some(value.to_string())
                }
                _ => None,
            }
        })
}

/// A `Set-Cookie` header value for an HttpOnly, SameSite=Lax, path-wide cookie.
#[derive(Debug, Clone)]
pub struct SetCookie<'a> {
    pub name: &'a str,
    pub value: &'a str,
    /// Lifetime in seconds; `0` asks the browser to drop the cookie.
    pub max_age: i64,
    pub secure: bool,
}

impl SetCookie<'_> {
    /// Renders the header value.
    pub fn to_header_value(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        let secure = if self.secure { "; Secure" } else { "" };
        HeaderValue::from_str(&format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax{}",
            self.name, self.value, self.max_age, secure
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(values: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for v in values {
            headers.append(COOKIE, v.parse().unwrap());
        }
        headers
    }

    #[test]
    fn test_get_single_cookie() {
        let h = headers(&["session=abc123"]);
        assert_eq!(get(&h, "session").as_deref(), Some("abc123"));
    }

    #[test]
    fn test_get_among_many() {
        let h = headers(&["theme=dark; session=abc123; lang=en"]);
        assert_eq!(get(&h, "session").as_deref(), Some("abc123"));
        assert_eq!(get(&h, "lang").as_deref(), Some("en"));
    }

    #[test]
    fn test_get_across_headers() {
        let h = headers(&["theme=dark", "csrf_token=xyz"]);
        assert_eq!(get(&h, "csrf_token").as_deref(), Some("xyz"));
    }

    #[test]
    fn test_get_missing_or_empty() {
        assert!(get(&HeaderMap::new(), "session").is_none());
        assert!(get(&headers(&["session="]), "session").is_none());
        assert!(get(&headers(&["sessionid=abc"]), "session").is_none());
    }

    #[test]
    fn test_set_cookie_rendering() {
        let value = SetCookie {
            name: "session",
            value: "abc",
            max_age: 3600,
            secure: true,
        }
        .to_header_value()
        .unwrap();

        assert_eq!(
            value.to_str().unwrap(),
            "session=abc; Path=/; Max-Age=3600; HttpOnly; SameSite=Lax; Secure"
        );
    }

    #[test]
    fn test_set_cookie_without_secure() {
        let value = SetCookie {
            name: "csrf_token",
            value: "t",
            max_age: 0,
            secure: false,
        }
        .to_header_value()
        .unwrap();

        assert!(!value.to_str().unwrap().contains("Secure"));
        assert!(value.to_str().unwrap().contains("Max-Age=0"));
    }
}
