use chrono::{NaiveDateTime, ParseError};

/// Storage format for every timestamp column. Lexical order equals chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// ISO variant accepted on input (`2023-01-15T10:30:00`)
const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored or seed timestamp, accepting either a space or `T` separator
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, ParseError> {
    let trimmed = s.trim();
    NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, ISO_FORMAT))
}

// Custom serde module so JSON carries the same text the database stores
pub(crate) mod serde_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(at: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(at))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_timestamp(&s).map_err(serde::de::Error::custom)
    }
}

pub(crate) mod serde_format_opt {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(at: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match at {
            Some(at) => serializer.serialize_some(&super::format_timestamp(at)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|s| super::parse_timestamp(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_both_separators() {
        let expected = NaiveDate::from_ymd_opt(2023, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();

        assert_eq!(parse_timestamp("2023-01-15 10:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2023-01-15T10:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp(" 2023-01-15 10:30:00 ").unwrap(), expected);
    }

    #[test]
    fn test_format_is_storage_format() {
        let at = parse_timestamp("2023-01-15T10:30:05").unwrap();
        assert_eq!(format_timestamp(&at), "2023-01-15 10:30:05");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("2023-13-01 00:00:00").is_err());
    }
}
