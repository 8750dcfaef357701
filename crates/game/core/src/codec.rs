//! Token codec for [`Identity`] values.
//!
//! Each identity field becomes one printable token. Strings are written as
//! UTF-16LE bytes and floats as 4-byte big-endian IEEE-754, both in the
//! standard base64 alphabet. That alphabet never contains the save blob
//! separator, so names holding `;` survive, and floats round-trip bit for bit
//! without going through decimal formatting.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{ErrorSeverity, LedgerError};
use crate::identity::{Identity, SpawnPosition};

/// Number of tokens [`encode`] produces and [`decode`] expects.
pub const IDENTITY_TOKENS: usize = 4;

/// Identity field a token belongs to, used in error reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum IdentityField {
    Container,
    LocalName,
    SpawnX,
    SpawnY,
}

/// Errors raised while decoding identity tokens.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("expected {expected} identity tokens, found {found}")]
    TokenCount { expected: usize, found: usize },

    #[error("{field} token is not valid base64: {source}")]
    InvalidBase64 {
        field: IdentityField,
        #[source]
        source: base64::DecodeError,
    },

    #[error("{field} token does not hold valid UTF-16 text")]
    InvalidUtf16 { field: IdentityField },

    #[error("{field} token decodes to {len} bytes, expected 4")]
    FloatWidth { field: IdentityField, len: usize },
}

impl LedgerError for FormatError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TokenCount { .. } => "FORMAT_TOKEN_COUNT",
            Self::InvalidBase64 { .. } => "FORMAT_INVALID_BASE64",
            Self::InvalidUtf16 { .. } => "FORMAT_INVALID_UTF16",
            Self::FloatWidth { .. } => "FORMAT_FLOAT_WIDTH",
        }
    }
}

/// Encodes an identity into its [`IDENTITY_TOKENS`] tokens.
pub fn encode(identity: &Identity) -> [String; IDENTITY_TOKENS] {
    [
        encode_str(&identity.container),
        encode_str(&identity.local_name),
        encode_f32(identity.spawn.x),
        encode_f32(identity.spawn.y),
    ]
}

/// Decodes an identity from exactly [`IDENTITY_TOKENS`] tokens.
pub fn decode<S: AsRef<str>>(tokens: &[S]) -> Result<Identity, FormatError> {
    let [container, local_name, x, y] = tokens else {
        return Err(FormatError::TokenCount {
            expected: IDENTITY_TOKENS,
            found: tokens.len(),
        });
    };

    Ok(Identity {
        container: decode_str(container.as_ref(), IdentityField::Container)?,
        local_name: decode_str(local_name.as_ref(), IdentityField::LocalName)?,
        spawn: SpawnPosition::new(
            decode_f32(x.as_ref(), IdentityField::SpawnX)?,
            decode_f32(y.as_ref(), IdentityField::SpawnY)?,
        ),
    })
}

fn encode_str(value: &str) -> String {
    let bytes: Vec<u8> = value.encode_utf16().flat_map(u16::to_le_bytes).collect();
    STANDARD.encode(bytes)
}

fn encode_f32(value: f32) -> String {
    STANDARD.encode(value.to_be_bytes())
}

fn decode_bytes(token: &str, field: IdentityField) -> Result<Vec<u8>, FormatError> {
    STANDARD
        .decode(token)
        .map_err(|source| FormatError::InvalidBase64 { field, source })
}

fn decode_str(token: &str, field: IdentityField) -> Result<String, FormatError> {
    let bytes = decode_bytes(token, field)?;
    if bytes.len() % 2 != 0 {
        return Err(FormatError::InvalidUtf16 { field });
    }

    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|_| FormatError::InvalidUtf16 { field })
}

fn decode_f32(token: &str, field: IdentityField) -> Result<f32, FormatError> {
    let bytes = decode_bytes(token, field)?;
    let raw: [u8; 4] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| FormatError::FloatWidth {
            field,
            len: bytes.len(),
        })?;
    Ok(f32::from_be_bytes(raw))
}
