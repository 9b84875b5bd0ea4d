//! The SECOM date-time scalar encoding.
//!
//! SECOM does not use the common ISO-8601 profiles. A DateTime is the
//! combination of a date and a time, character-encoded with no separators
//! inside either part, a literal `T` between them, no fractional seconds
//! and no zone offset:
//!
//! EXAMPLE: `19850412T101530` (1985-04-12 10:15:30)
//!
//! The internal representation is [`NaiveDateTime`]: SECOM timestamps
//! carry no timezone and have second precision. [`decode`] keeps the
//! difference between an absent field and a present-but-malformed one;
//! the serde adapters at the bottom pick a policy per message field.

use chrono::NaiveDateTime;
use thiserror::Error;

/// strftime pattern of the SECOM date-time encoding. Read-only,
/// process-wide; every timestamp field in the protocol goes through it.
pub const SECOM_DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Fixed width of the encoding: 8 date digits, `T`, 6 time digits.
pub const SECOM_DATE_TIME_LEN: usize = 15;

const DELIMITER_OFFSET: usize = 8;

/// Why a present timestamp field failed to decode.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimestampError {
    #[error("expected 15 characters in the form YYYYMMDDTHHMMSS, got {0}")]
    WrongLength(usize),

    #[error("expected 'T' between date and time, found {0:?}")]
    BadDelimiter(char),

    #[error("non-digit at position {0}")]
    NonDigit(usize),

    #[error("invalid calendar value: {0}")]
    OutOfRange(String),
}

/// Outcome of decoding one SECOM timestamp field.
///
/// Absent and malformed inputs are kept apart so the caller decides
/// whether to tolerate partner-system encoding quirks ([`lenient`]) or
/// reject them ([`strict`]); collapsing the two loses the distinction
/// for good.
///
/// [`lenient`]: DecodeResult::lenient
/// [`strict`]: DecodeResult::strict
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeResult {
    /// A well-formed timestamp.
    Value(NaiveDateTime),
    /// The field was missing or the empty string.
    Absent,
    /// The field was present but is not a valid SECOM timestamp.
    Malformed(TimestampError),
}

impl DecodeResult {
    /// The historical wire behaviour: malformed input reads like an
    /// absent field. A corrupt timestamp becomes indistinguishable from
    /// one the sender omitted — callers that must tell the two apart use
    /// [`DecodeResult::strict`] or match on the variants directly.
    pub fn lenient(self) -> Option<NaiveDateTime> {
        match self {
            DecodeResult::Value(value) => Some(value),
            DecodeResult::Absent | DecodeResult::Malformed(_) => None,
        }
    }

    /// Malformed input surfaces as an error; an absent field stays `None`.
    pub fn strict(self) -> Result<Option<NaiveDateTime>, TimestampError> {
        match self {
            DecodeResult::Value(value) => Ok(Some(value)),
            DecodeResult::Absent => Ok(None),
            DecodeResult::Malformed(err) => Err(err),
        }
    }
}

/// Decode an optional SECOM timestamp field.
///
/// `None` and `""` are [`DecodeResult::Absent`], never an error. Anything
/// else must match `YYYYMMDDTHHMMSS` exactly and name a real calendar
/// date-time. Pure function, no side effects.
pub fn decode(text: Option<&str>) -> DecodeResult {
    let Some(text) = text else {
        return DecodeResult::Absent;
    };
    if text.is_empty() {
        return DecodeResult::Absent;
    }
    match parse(text) {
        Ok(value) => DecodeResult::Value(value),
        Err(err) => DecodeResult::Malformed(err),
    }
}

/// Encode a date-time as SECOM timestamp text.
///
/// All components are zero-padded; no fractional seconds, no offset.
/// Exact left inverse of [`decode`] for every value `decode` produces.
/// The encoding has no sign or century extension, so only years
/// 0000–9999 round-trip.
pub fn encode(value: &NaiveDateTime) -> String {
    value.format(SECOM_DATE_TIME_FORMAT).to_string()
}

fn parse(text: &str) -> Result<NaiveDateTime, TimestampError> {
    let bytes = text.as_bytes();
    if bytes.len() != SECOM_DATE_TIME_LEN {
        return Err(TimestampError::WrongLength(bytes.len()));
    }
    // Shape first: chrono's %Y would also take a sign or fewer digits,
    // which the SECOM encoding does not allow.
    for (i, &b) in bytes.iter().enumerate() {
        if i == DELIMITER_OFFSET {
            if b != b'T' {
                return Err(TimestampError::BadDelimiter(b as char));
            }
        } else if !b.is_ascii_digit() {
            return Err(TimestampError::NonDigit(i));
        }
    }
    NaiveDateTime::parse_from_str(text, SECOM_DATE_TIME_FORMAT)
        .map_err(|e| TimestampError::OutOfRange(e.to_string()))
}

/// Serde adapter for required timestamp fields:
/// `#[serde(with = "timestamp::secom_format")]`. Empty or malformed text
/// is a deserialisation error.
pub mod secom_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{decode, encode, DecodeResult};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&encode(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        match decode(Some(&text)) {
            DecodeResult::Value(value) => Ok(value),
            DecodeResult::Absent => Err(serde::de::Error::custom("empty SECOM timestamp")),
            DecodeResult::Malformed(err) => Err(serde::de::Error::custom(err)),
        }
    }
}

/// Serde adapter for optional timestamp fields, strict flavour:
/// `null` and `""` read as `None`, malformed text is a deserialisation
/// error. Combine with `#[serde(default)]` so a missing field is `None`.
pub mod secom_format_option {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{decode, encode};

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_str(&encode(value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = Option::<String>::deserialize(deserializer)?;
        decode(text.as_deref()).strict().map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for optional timestamp fields, lenient flavour: the
/// behaviour observed from deployed SECOM encoders, where `null`, `""`
/// and malformed text all read as `None`. A corrupt timestamp is then
/// indistinguishable from an omitted one; fields that cannot afford that
/// use [`secom_format_option`] instead.
pub mod secom_format_option_lenient {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::decode;

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        super::secom_format_option::serialize(value, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = Option::<String>::deserialize(deserializer)?;
        Ok(decode(text.as_deref()).lenient())
    }
}
