use std::fmt;
use std::str::FromStr;

use crate::error::FormatError;

/// Which way a conversion goes.
///
/// For keys, "standard" is PEM; for signatures it is the raw 256-byte form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `b2o`
    InternalToStandard,
    /// `o2b`
    StandardToInternal,
}

/// Which half of a key pair a conversion handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Public,
    Private,
}

/// A key conversion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionRequest {
    pub direction: Direction,
    pub key_kind: KeyKind,
}

impl ConversionRequest {
    pub fn new(direction: Direction, key_kind: KeyKind) -> Self {
        Self {
            direction,
            key_kind,
        }
    }
}

impl FromStr for Direction {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "b2o" => Ok(Direction::InternalToStandard),
            "o2b" => Ok(Direction::StandardToInternal),
            other => Err(FormatError::UnknownToken(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::InternalToStandard => "b2o",
            Direction::StandardToInternal => "o2b",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for KeyKind {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pub" => Ok(KeyKind::Public),
            "priv" => Ok(KeyKind::Private),
            other => Err(FormatError::UnknownToken(other.to_string())),
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            KeyKind::Public => "pub",
            KeyKind::Private => "priv",
        };
        write!(f, "{}", s)
    }
}
