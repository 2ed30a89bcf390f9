use std::fmt;
use std::str::FromStr;

/// An opaque, comparable caller identity.
///
/// Identities are 32-byte tokens minted and authenticated by the host; the
/// core only ever compares them. The text form is base58.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Identity([u8; 32]);

impl Identity {
    /// The all-zero identity, used as the null sentinel.
    pub const ZERO: Self = Self([0; 32]);

    /// Create an identity from raw bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Return the raw bytes.
    pub const fn to_bytes(self) -> [u8; 32] {
        self.0
    }

    /// Returns whether this is the null sentinel.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl From<[u8; 32]> for Identity {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(&self.0).into_string())
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({self})")
    }
}

/// Error returned when parsing an [`Identity`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parse identity: {0}")]
pub struct ParseIdentityError(&'static str);

impl FromStr for Identity {
    type Err = ParseIdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|_| ParseIdentityError("invalid base58"))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| ParseIdentityError("expected 32 bytes"))?;
        Ok(Self(bytes))
    }
}
