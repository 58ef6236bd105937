//! The address bar: the one piece of state shared outside the session.

use thiserror::Error;
use url::Url;

use super::query::ADMIN_KEY;

/// Location used when only a query string is supplied.
pub const DEFAULT_BASE_URL: &str = "http://localhost/";

/// Errors resolving an address.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("invalid address \"{input}\": {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },
}

/// Holder of the current location.
///
/// Writes replace the current entry; implementations never push history.
pub trait AddressBar {
    /// The current location.
    fn current(&self) -> &Url;

    /// Replaces the current location in place.
    fn replace(&mut self, url: Url);
}

/// In-process address bar holding a single entry.
#[derive(Debug, Clone)]
pub struct MemoryAddressBar {
    current: Url,
    replacements: usize,
}

impl MemoryAddressBar {
    /// Wraps `url` as the single entry, with no replacements yet.
    ///
    /// # Examples
    ///
    /// ```
    /// use solar_savings::sync::address::{AddressBar, MemoryAddressBar};
    /// use url::Url;
    ///
    /// let bar = MemoryAddressBar::new(Url::parse("http://localhost/?usage=1").unwrap());
    /// assert_eq!(bar.current().query(), Some("usage=1"));
    /// assert_eq!(bar.replacements(), 0);
    /// ```
    pub fn new(url: Url) -> Self {
        Self {
            current: url,
            replacements: 0,
        }
    }

    /// Builds an address bar from user input relative to `base`.
    ///
    /// `input` may be an absolute URL, a query string with or without its
    /// leading `?`, or empty (the base itself).
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidUrl`] if `base` is not a valid URL.
    pub fn resolve(base: &str, input: &str) -> Result<Self, SyncError> {
        let invalid = |input: &str, source| SyncError::InvalidUrl {
            input: input.to_string(),
            source,
        };

        if let Ok(url) = Url::parse(input) {
            return Ok(Self::new(url));
        }

        let mut url = Url::parse(base).map_err(|e| invalid(base, e))?;
        let query = input.strip_prefix('?').unwrap_or(input);
        url.set_query(if query.is_empty() { None } else { Some(query) });
        Ok(Self::new(url))
    }

    /// Number of in-place replacements so far.
    pub fn replacements(&self) -> usize {
        self.replacements
    }

    /// Entries in the history stack, always one.
    pub fn history_len(&self) -> usize {
        1
    }
}

impl AddressBar for MemoryAddressBar {
    fn current(&self) -> &Url {
        &self.current
    }

    fn replace(&mut self, url: Url) {
        self.current = url;
        self.replacements += 1;
    }
}

/// Copy of `url` with a new query string (`None` or empty removes it).
pub fn with_query(url: &Url, query: Option<&str>) -> Url {
    let mut next = url.clone();
    next.set_query(query.filter(|q| !q.is_empty()));
    next
}

/// Copy of `url` safe to hand to someone else: every `admin` pair removed,
/// everything else kept in order.
///
/// # Examples
///
/// ```
/// use solar_savings::sync::address::share_url;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/tool?usage=1&admin=k").unwrap();
/// assert_eq!(share_url(&url).as_str(), "https://example.com/tool?usage=1");
/// ```
pub fn share_url(url: &Url) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != ADMIN_KEY)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut shared = url.clone();
    if kept.is_empty() {
        shared.set_query(None);
    } else {
        shared.query_pairs_mut().clear().extend_pairs(kept);
    }
    shared
}
