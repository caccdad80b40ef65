//! Named validation functions for config structs.
//!
//! Constraints are declared on the struct with the `validator` derive. Any
//! function returning `Result<(), ValidationError>` can be named from a
//! constraint attribute, including the ones in this module. The derive passes
//! numeric fields by value and everything else by reference.
//!
//! ```ignore
//! use strata::Validate;
//!
//! #[derive(Validate)]
//! struct ServerConfig {
//!     #[validate(custom(function = "strata::validators::required"))]
//!     port: u16,
//!     #[validate(custom(function = "strata::validators::url_syntax"))]
//!     public_url: String,
//!     #[validate(custom(function = "strata::validators::duration"))]
//!     slow_threshold: String,
//! }
//! ```
//!
//! The `parse_*` functions return the parsed value so callers can reuse the
//! same rules when converting validated strings into typed values.

pub mod report;

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use url::Url;
use validator::ValidationError;

pub use report::check;

/// Go-style duration segment, e.g. `1h`, `30m`, `1.5s`, `250us`.
static DURATION_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<value>\d+(?:\.\d+)?|\.\d+)(?P<unit>ns|us|µs|μs|ms|s|m|h)")
        .expect("valid duration pattern")
});

const NANOS_PER_SEC: u128 = 1_000_000_000;

fn error(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message));
    error
}

/// Values with a zero state that [`required`] rejects.
pub trait ZeroValue {
    /// Whether this is the zero value of its type.
    fn is_zero(&self) -> bool;
}

macro_rules! zero_value_by_default {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ZeroValue for $ty {
                fn is_zero(&self) -> bool {
                    *self == <$ty>::default()
                }
            }
        )*
    };
}

zero_value_by_default!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char,
);

impl ZeroValue for str {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl ZeroValue for String {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T> ZeroValue for [T] {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T> ZeroValue for Vec<T> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V, S> ZeroValue for HashMap<K, V, S> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> ZeroValue for BTreeMap<K, V> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T> ZeroValue for Option<T> {
    fn is_zero(&self) -> bool {
        self.is_none()
    }
}

impl<T: ZeroValue + ?Sized> ZeroValue for &T {
    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }
}

/// Fails when `value` is its type's zero value (empty string, `0`, `false`,
/// empty collection).
pub fn required<T: ZeroValue>(value: T) -> Result<(), ValidationError> {
    if value.is_zero() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Parse `value` as an absolute URL.
pub fn parse_url(value: &str) -> Result<Url, ValidationError> {
    Url::parse(value).map_err(|err| error("url", err.to_string()))
}

/// Fails unless `value` is an absolute URL. Empty strings pass so the check
/// can be combined with [`required`].
pub fn url_syntax(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    parse_url(value).map(|_| ())
}

/// Parse a Go-style duration such as `1ms`, `1.5s` or `1h30m`.
///
/// A bare `0` is accepted; every other value needs a unit.
pub fn parse_duration(value: &str) -> Result<Duration, ValidationError> {
    let invalid = || error("duration", format!("invalid duration {value:?}"));

    let trimmed = value.trim();
    if trimmed == "0" {
        return Ok(Duration::ZERO);
    }
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let mut total_nanos: u128 = 0;
    let mut consumed = 0;
    for caps in DURATION_SEGMENT.captures_iter(trimmed) {
        let whole = caps.get(0).ok_or_else(invalid)?;
        if whole.start() != consumed {
            return Err(invalid());
        }
        consumed = whole.end();

        let unit_nanos: u128 = match &caps["unit"] {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => NANOS_PER_SEC,
            "m" => 60 * NANOS_PER_SEC,
            "h" => 3_600 * NANOS_PER_SEC,
            _ => return Err(invalid()),
        };
        let segment = segment_nanos(&caps["value"], unit_nanos).ok_or_else(invalid)?;
        total_nanos = total_nanos.checked_add(segment).ok_or_else(invalid)?;
    }

    if consumed != trimmed.len() {
        return Err(invalid());
    }
    let secs = u64::try_from(total_nanos / NANOS_PER_SEC).map_err(|_| invalid())?;
    let nanos = u32::try_from(total_nanos % NANOS_PER_SEC).map_err(|_| invalid())?;
    Ok(Duration::new(secs, nanos))
}

/// Nanoseconds in `amount` units, where `amount` may have a fraction.
fn segment_nanos(amount: &str, unit_nanos: u128) -> Option<u128> {
    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut nanos = whole.checked_mul(unit_nanos)?;
    if !fraction.is_empty() {
        let scale = 10_u128.checked_pow(u32::try_from(fraction.len()).ok()?)?;
        let fraction: u128 = fraction.parse().ok()?;
        nanos = nanos.checked_add(fraction.checked_mul(unit_nanos)? / scale)?;
    }
    Some(nanos)
}

/// Fails unless `value` parses with [`parse_duration`]. Empty strings pass.
pub fn duration(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    parse_duration(value).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_zero_values() {
        assert_eq!(required(&String::new()).unwrap_err().code, "required");
        assert!(required(&0_u16).is_err());
        assert!(required(&false).is_err());
        assert!(required(&Vec::<String>::new()).is_err());

        assert!(required(&"db".to_string()).is_ok());
        assert!(required(&5432_u16).is_ok());
        assert!(required(&true).is_ok());
    }

    #[test]
    fn test_required_accepts_owned_numbers() {
        assert!(required(0_i32).is_err());
        assert!(required(0.0_f64).is_err());
        assert!(required(90_i32).is_ok());
        assert!(required("").is_err());
        assert!(required(&Some(0_u8)).is_ok());
    }

    #[derive(validator::Validate)]
    struct Listener {
        #[validate(custom(function = "required"))]
        port: u16,
        #[validate(custom(function = "required"))]
        backlog: Option<i32>,
        #[validate(custom(function = "required"))]
        host: String,
        #[validate(custom(function = "required"))]
        tls: bool,
    }

    #[test]
    fn test_required_on_derived_struct() {
        use validator::Validate;

        let listener = Listener {
            port: 0,
            backlog: Some(0),
            host: String::new(),
            tls: false,
        };
        let errors = listener.validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["port", "backlog", "host", "tls"] {
            assert_eq!(fields[field][0].code, "required", "{field}");
        }

        let listener = Listener {
            port: 8443,
            backlog: Some(128),
            host: "0.0.0.0".to_string(),
            tls: true,
        };
        assert!(listener.validate().is_ok());
    }

    #[test]
    fn test_parse_url() {
        let url = parse_url("https://example.com:8443/api").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(url.port(), Some(8443));

        let err = parse_url("not a url").unwrap_err();
        assert_eq!(err.code, "url");
        assert!(err.message.is_some());
    }

    #[test]
    fn test_url_syntax_allows_empty() {
        assert!(url_syntax("").is_ok());
        assert!(url_syntax("postgres://db.internal/app").is_ok());
        assert!(url_syntax("/relative/path").is_err());
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("1ms").unwrap(), Duration::from_millis(1));
        assert_eq!(parse_duration("250us").unwrap(), Duration::from_micros(250));
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        for value in ["", "ms", "10", "10x", "1h 30m", "-1s", "1s!"] {
            let err = parse_duration(value).unwrap_err();
            assert_eq!(err.code, "duration", "{value:?} should fail");
        }
    }

    #[test]
    fn test_duration_allows_empty() {
        assert!(duration("").is_ok());
        assert!(duration("1ms").is_ok());
        assert!(duration("soon").is_err());
    }
}
