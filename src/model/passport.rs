use std::fmt::{Display, Formatter};
use std::str::FromStr;

use data_encoding::HEXLOWER;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error as ThisError;

use crate::error::{Error, Result};

/// Required length of a canonical passport series, in characters.
pub const SERIES_LENGTH: usize = 10;

/// A voter's passport series, held in canonical form: outer whitespace
/// trimmed, all interior whitespace removed, exactly [`SERIES_LENGTH`]
/// characters. Constructing one validates it; downstream code may rely on the
/// invariant without re-checking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Passport {
    series: String,
}

impl Passport {
    /// Normalise and validate a raw series.
    pub fn new(raw: &str) -> Result<Self> {
        let series = normalize(raw).ok_or(Error::EmptyInput)?;
        if series.chars().count() != SERIES_LENGTH {
            return Err(Error::InvalidFormat(series));
        }
        Ok(Self { series })
    }

    /// The canonical series.
    pub fn series(&self) -> &str {
        &self.series
    }

    /// Digest of the canonical series, used as the roll lookup key.
    /// Total for a constructed passport, since the series is never empty.
    pub fn digest(&self) -> SeriesDigest {
        SeriesDigest::of(&self.series).expect("a validated series is never empty")
    }
}

/// Trim outer whitespace and strip all interior whitespace; `None` if nothing
/// remains.
fn normalize(raw: &str) -> Option<String> {
    let canonical: String = raw.trim().chars().filter(|c| !c.is_whitespace()).collect();
    (!canonical.is_empty()).then_some(canonical)
}

impl FromStr for Passport {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Passport {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Passport> for String {
    fn from(passport: Passport) -> Self {
        passport.series
    }
}

impl Display for Passport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.series)
    }
}

/// SHA-256 digest of a canonical passport series, rendered as lowercase hex.
/// Deliberately deterministic and unsalted: it is the roll lookup key, so the
/// same series must always map to the same digest. The raw series never
/// reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeriesDigest(String);

impl SeriesDigest {
    /// Length of the rendered digest: two hex characters per SHA-256 byte.
    pub const HEX_LENGTH: usize = 64;

    /// Hash the UTF-8 bytes of the input. Fails only on an empty input, which
    /// a constructed [`Passport`] can never supply.
    pub fn of(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Err(Error::EmptyInput);
        }
        let hash = Sha256::digest(input.as_bytes());
        Ok(Self(HEXLOWER.encode(&hash)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A digest string from outside (e.g. a roll dump) that is not
/// [`SeriesDigest::HEX_LENGTH`] lowercase hex characters. Such a digest could
/// never match a hashed series, so it is rejected at the boundary rather than
/// silently never matching.
#[derive(Debug, ThisError)]
#[error("`{0}` is not a {len}-character lowercase hex digest", len = SeriesDigest::HEX_LENGTH)]
pub struct InvalidDigest(String);

impl TryFrom<String> for SeriesDigest {
    type Error = InvalidDigest;

    fn try_from(s: String) -> std::result::Result<Self, InvalidDigest> {
        let well_formed = s.len() == Self::HEX_LENGTH
            && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if well_formed {
            Ok(Self(s))
        } else {
            Err(InvalidDigest(s))
        }
    }
}

impl From<SeriesDigest> for String {
    fn from(digest: SeriesDigest) -> Self {
        digest.0
    }
}

impl Display for SeriesDigest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Passport {
        pub fn example() -> Self {
            "AB12345678".parse().unwrap()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_whitespace() {
        let passport = Passport::new(" 1234 567890 ").unwrap();
        assert_eq!(passport.series(), "1234567890");
    }

    #[test]
    fn letters_are_accepted() {
        // Validation is length-only; series may mix letters and digits.
        let passport = Passport::new("AB12345678").unwrap();
        assert_eq!(passport.series(), "AB12345678");
    }

    #[test]
    fn empty_input_rejected() {
        assert!(matches!(Passport::new(""), Err(Error::EmptyInput)));
        assert!(matches!(Passport::new("   \t "), Err(Error::EmptyInput)));
    }

    #[test]
    fn wrong_length_rejected() {
        for raw in ["123456789", "12345678901", "AB 1234"] {
            match Passport::new(raw) {
                Err(Error::InvalidFormat(_)) => {}
                other => panic!("expected InvalidFormat for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn digest_is_deterministic_lowercase_hex() {
        let first = Passport::example().digest();
        let second = Passport::example().digest();
        assert_eq!(first, second);
        assert_eq!(first.as_str().len(), SeriesDigest::HEX_LENGTH);
        assert!(first
            .as_str()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn digest_matches_known_vector() {
        // SHA-256("1234567890"), byte order, two hex chars per byte.
        let digest = SeriesDigest::of("1234567890").unwrap();
        assert_eq!(
            digest.as_str(),
            "c775e7b757ede630cd0aa1113bd102661ab38829ca52a6422ab782862f268646"
        );
    }

    #[test]
    fn malformed_digests_are_rejected_at_deserialization() {
        let valid = Passport::example().digest();
        let bad = [
            String::new(),
            "abc123".to_string(),                  // Too short.
            format!("{valid}00"),                  // Too long.
            valid.as_str().to_uppercase(),         // Wrong case.
            format!("g{}", &valid.as_str()[1..]),  // Non-hex character.
        ];
        for digest in bad {
            let json = serde_json::to_string(&digest).unwrap();
            assert!(
                serde_json::from_str::<SeriesDigest>(&json).is_err(),
                "accepted malformed digest {digest:?}"
            );
        }

        // A digest the hasher produced round-trips.
        let json = serde_json::to_string(&valid).unwrap();
        assert_eq!(serde_json::from_str::<SeriesDigest>(&json).unwrap(), valid);
    }

    #[test]
    fn digest_of_empty_is_rejected() {
        assert!(matches!(SeriesDigest::of(""), Err(Error::EmptyInput)));
    }
}
