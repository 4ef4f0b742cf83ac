use std::fmt;

pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RESET_HEADER: &str = "x-ratelimit-reset";

/// Rate-limit figures carried by a single response.
///
/// Each field is `None` when the header was absent or not an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateHeaders {
    pub limit:     Option<u32>,
    pub remaining: Option<u32>,
    /// Seconds until the server's window resets.
    pub reset:     Option<u64>,
}

impl RateHeaders {
    /// Pick the rate-limit headers out of `(name, value)` pairs.
    ///
    /// Names are matched case-insensitively; the first occurrence wins.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut headers = Self::default();
        for (name, value) in pairs {
            let value = value.trim();
            if name.eq_ignore_ascii_case(LIMIT_HEADER) {
                headers.limit = headers.limit.or_else(|| value.parse().ok());
            } else if name.eq_ignore_ascii_case(REMAINING_HEADER) {
                headers.remaining = headers.remaining.or_else(|| value.parse().ok());
            } else if name.eq_ignore_ascii_case(RESET_HEADER) {
                headers.reset = headers.reset.or_else(|| value.parse().ok());
            }
        }
        headers
    }

    pub fn is_empty(&self) -> bool {
        self.limit.is_none() && self.remaining.is_none() && self.reset.is_none()
    }
}

/// Last-known rate budget, merged field by field from successive responses.
///
/// Stale values are kept until a newer response overwrites them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateSnapshot {
    pub limit:     Option<u32>,
    pub remaining: Option<u32>,
    pub reset:     Option<u64>,
}

impl RateSnapshot {
    pub fn observe(&mut self, headers: &RateHeaders) {
        if let Some(limit) = headers.limit {
            self.limit = Some(limit);
        }
        if let Some(remaining) = headers.remaining {
            self.remaining = Some(remaining);
        }
        if let Some(reset) = headers.reset {
            self.reset = Some(reset);
        }
    }

    pub fn is_known(&self) -> bool { self.limit.is_some() || self.remaining.is_some() }
}

impl fmt::Display for RateSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn field<T: fmt::Display>(v: Option<T>) -> String {
            v.map_or_else(|| "?".to_string(), |v| v.to_string())
        }
        write!(
            f,
            "Limit: {} | Remaining: {} | Reset: {}",
            field(self.limit),
            field(self.remaining),
            field(self.reset)
        )
    }
}
