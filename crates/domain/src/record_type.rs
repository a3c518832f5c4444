use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// DNS record type of a query.
///
/// Only the types the rewrite path understands get their own variant; every
/// other type is carried by its numeric code and passes through upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    AAAA,
    CNAME,
    Other(u16),
}

impl RecordType {
    pub fn from_u16(code: u16) -> Self {
        match code {
            1 => RecordType::A,
            28 => RecordType::AAAA,
            5 => RecordType::CNAME,
            other => RecordType::Other(other),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::AAAA => 28,
            RecordType::CNAME => 5,
            RecordType::Other(code) => code,
        }
    }

    /// Record types that may carry a static rewrite.
    pub fn is_rewritable(self) -> bool {
        matches!(self, RecordType::A | RecordType::AAAA | RecordType::CNAME)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::A => f.write_str("A"),
            RecordType::AAAA => f.write_str("AAAA"),
            RecordType::CNAME => f.write_str("CNAME"),
            RecordType::Other(code) => match well_known_name(*code) {
                Some(name) => f.write_str(name),
                None => write!(f, "TYPE{}", code),
            },
        }
    }
}

fn well_known_name(code: u16) -> Option<&'static str> {
    Some(match code {
        2 => "NS",
        6 => "SOA",
        12 => "PTR",
        15 => "MX",
        16 => "TXT",
        33 => "SRV",
        64 => "SVCB",
        65 => "HTTPS",
        255 => "ANY",
        _ => return None,
    })
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        match upper.as_str() {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::AAAA),
            "CNAME" => Ok(RecordType::CNAME),
            other => {
                if let Some(code) = other.strip_prefix("TYPE") {
                    return code
                        .parse::<u16>()
                        .map(RecordType::from_u16)
                        .map_err(|_| format!("unknown record type '{}'", s));
                }
                (0..=u16::MAX)
                    .find(|code| well_known_name(*code) == Some(other))
                    .map(RecordType::Other)
                    .ok_or_else(|| format!("unknown record type '{}'", s))
            }
        }
    }
}

impl Serialize for RecordType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecordType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
