//! One-shot notifications carried across a redirect in a cookie
//!
//! The cookie value is `level:message` with the message percent-encoded.
//! A page that displays a flash also clears the cookie.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

pub const COOKIE_NAME: &str = "flash";

/// `Set-Cookie` value that removes the flash cookie
pub const CLEAR_COOKIE: &str = "flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Error,
    Info,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Error => "error",
            FlashLevel::Info => "info",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(FlashLevel::Success),
            "error" => Some(FlashLevel::Error),
            "info" => Some(FlashLevel::Info),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Success, message)
    }

    /// `Set-Cookie` value queuing this flash for the next page
    pub fn set_cookie(&self) -> String {
        format!(
            "{}={}:{}; Path=/; HttpOnly; SameSite=Lax",
            COOKIE_NAME,
            self.level.as_str(),
            urlencoding::encode(&self.message)
        )
    }

    fn decode(value: &str) -> Option<Self> {
        let (level, message) = value.split_once(':')?;
        let level = FlashLevel::parse(level)?;
        let message = urlencoding::decode(message).ok()?;
        Some(Self::new(level, message.into_owned()))
    }

    /// Read the pending flash from request cookies, if any.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = cookie_value(headers)?;
        if value.is_empty() {
            return None;
        }

        let flash = Self::decode(value);
        if flash.is_none() {
            tracing::warn!("Ignoring malformed flash cookie: {:?}", value);
        }
        flash
    }
}

/// Whether the request carries a flash cookie at all, readable or not.
pub fn is_pending(headers: &HeaderMap) -> bool {
    cookie_value(headers).is_some()
}

fn cookie_value(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == COOKIE_NAME)
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_set_cookie_encodes_message() {
        let cookie = Flash::success("Created successfully!").set_cookie();
        assert!(cookie.starts_with("flash=success:Created%20successfully%21;"));
        assert!(cookie.contains("Path=/"));
    }

    #[test]
    fn test_read_among_other_cookies() {
        let headers = headers_with_cookie("theme=dark; flash=info:Hello%2C%20world; lang=en");
        let flash = Flash::from_headers(&headers).unwrap();
        assert_eq!(flash, Flash::new(FlashLevel::Info, "Hello, world"));
    }

    #[test]
    fn test_cookie_value_read_back() {
        let original = Flash::new(FlashLevel::Error, "Title: must not be empty; retry");
        let set = original.set_cookie();
        let pair = set.split(';').next().unwrap();
        let flash = Flash::from_headers(&headers_with_cookie(pair)).unwrap();
        assert_eq!(flash, original);
    }

    #[test]
    fn test_missing_or_cleared_cookie() {
        assert!(Flash::from_headers(&HeaderMap::new()).is_none());
        assert!(Flash::from_headers(&headers_with_cookie("flash=")).is_none());
        assert!(Flash::from_headers(&headers_with_cookie("other=1")).is_none());
    }

    #[test]
    fn test_malformed_cookie_ignored() {
        assert!(Flash::from_headers(&headers_with_cookie("flash=nocolon")).is_none());
        assert!(Flash::from_headers(&headers_with_cookie("flash=loud:hi")).is_none());
    }

    #[test]
    fn test_pending_even_when_unreadable() {
        assert!(is_pending(&headers_with_cookie("flash=garbage")));
        assert!(is_pending(&headers_with_cookie("a=1; flash=")));
        assert!(!is_pending(&headers_with_cookie("flashy=1")));
        assert!(!is_pending(&HeaderMap::new()));
    }
}
