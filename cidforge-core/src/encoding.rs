//! Multibase text encodings for CID rendering
//!
//! Three encodings are supported: base16 (prefix `f`), base32 lower
//! without padding (prefix `b`), and base58btc (prefix `z`). CIDv0 strings
//! use bare base58 with no multibase prefix and are handled in `cid`.

use crate::error::{CidError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const BASE32_ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";

/// Supported multibase encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Multibase {
    /// Lowercase hexadecimal, prefix `f`
    Base16,

    /// RFC 4648 base32, lowercase, no padding, prefix `b`
    #[default]
    Base32,

    /// Bitcoin-alphabet base58, prefix `z`
    Base58Btc,
}

impl Multibase {
    /// The multibase prefix character
    pub fn prefix(&self) -> char {
        match self {
            Multibase::Base16 => 'f',
            Multibase::Base32 => 'b',
            Multibase::Base58Btc => 'z',
        }
    }

    /// Encode `bytes` with the multibase prefix prepended
    pub fn encode(&self, bytes: &[u8]) -> String {
        let body = match self {
            Multibase::Base16 => hex::encode(bytes),
            Multibase::Base32 => base32_lower(bytes),
            Multibase::Base58Btc => bs58::encode(bytes).into_string(),
        };
        let mut out = String::with_capacity(body.len() + 1);
        out.push(self.prefix());
        out.push_str(&body);
        out
    }

    /// Decode a multibase-prefixed string, returning the detected base
    /// and the decoded bytes.
    pub fn decode(s: &str) -> Result<(Multibase, Vec<u8>)> {
        let prefix = s
            .chars()
            .next()
            .ok_or_else(|| CidError::Parse("empty CID string".to_string()))?;
        let body = &s[prefix.len_utf8()..];
        match prefix {
            'f' => {
                let bytes = hex::decode(body)
                    .map_err(|e| CidError::Parse(format!("invalid base16: {e}")))?;
                Ok((Multibase::Base16, bytes))
            }
            'b' => Ok((Multibase::Base32, base32_decode_lower(body)?)),
            'z' => {
                let bytes = bs58::decode(body)
                    .into_vec()
                    .map_err(|e| CidError::Parse(format!("invalid base58: {e}")))?;
                Ok((Multibase::Base58Btc, bytes))
            }
            other => Err(CidError::Parse(format!(
                "unknown multibase prefix '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Multibase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Multibase::Base16 => "base16",
            Multibase::Base32 => "base32",
            Multibase::Base58Btc => "base58btc",
        })
    }
}

fn base32_lower(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(5) * 8);
    let mut bits: u32 = 0;
    let mut nbits: u32 = 0;
    for &byte in data {
        bits = (bits << 8) | u32::from(byte);
        nbits += 8;
        while nbits >= 5 {
            nbits -= 5;
            out.push(BASE32_ALPHABET[((bits >> nbits) & 0x1f) as usize] as char);
        }
    }
    if nbits > 0 {
        out.push(BASE32_ALPHABET[((bits << (5 - nbits)) & 0x1f) as usize] as char);
    }
    out
}

fn base32_decode_lower(s: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(s.len() * 5 / 8);
    let mut bits: u32 = 0;
    let mut nbits: u32 = 0;
    for c in s.bytes() {
        let value = match c {
            b'a'..=b'z' => c - b'a',
            b'2'..=b'7' => c - b'2' + 26,
            _ => {
                return Err(CidError::Parse(format!(
                    "invalid base32 character '{}'",
                    c as char
                )))
            }
        };
        bits = (bits << 5) | u32::from(value);
        nbits += 5;
        if nbits >= 8 {
            nbits -= 8;
            out.push(((bits >> nbits) & 0xff) as u8);
        }
    }
    // Leftover bits are padding and must be zero in canonical form.
    if nbits > 0 && bits & ((1 << nbits) - 1) != 0 {
        return Err(CidError::Parse("non-canonical base32 padding".to_string()));
    }
    Ok(out)
}
