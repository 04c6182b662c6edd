//! CID assembly, binary layout, and textual rendering
//!
//! A CID combines `{version, codec, multihash}`. Version 0 is the legacy
//! form: dag-pb codec, sha2-256 multihash, bare base58 text starting with
//! `Qm`. Version 1 is self-describing: varint version, varint codec, then
//! the multihash, rendered through any supported multibase. Converting
//! between versions or encodings never changes the multihash.

use crate::encoding::Multibase;
use crate::error::{CidError, Result};
use crate::hash::Multihash;
use crate::varint;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length of a CIDv0 base58 string
const V0_STRING_LEN: usize = 46;

/// Length of a CIDv0 binary form (sha2-256 multihash)
const V0_BINARY_LEN: usize = 34;

/// CID version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum CidVersion {
    V0,
    V1,
}

impl From<CidVersion> for u8 {
    fn from(version: CidVersion) -> u8 {
        match version {
            CidVersion::V0 => 0,
            CidVersion::V1 => 1,
        }
    }
}

impl TryFrom<u8> for CidVersion {
    type Error = CidError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(CidVersion::V0),
            1 => Ok(CidVersion::V1),
            other => Err(CidError::Parse(format!("unsupported CID version {other}"))),
        }
    }
}

/// Content codec identifying how the hashed bytes are structured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Codec {
    /// DAG-PB file nodes (UnixFS-style)
    #[default]
    DagPb,

    /// Raw bytes, hashed as-is
    Raw,
}

impl Codec {
    /// The multicodec code
    pub const fn code(&self) -> u64 {
        match self {
            Codec::DagPb => 0x70,
            Codec::Raw => 0x55,
        }
    }

    /// Look up a codec from its multicodec code
    pub fn from_code(code: u64) -> Result<Self> {
        match code {
            0x70 => Ok(Codec::DagPb),
            0x55 => Ok(Codec::Raw),
            other => Err(CidError::Parse(format!(
                "unsupported codec code 0x{other:x}"
            ))),
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Codec::DagPb => "dag-pb",
            Codec::Raw => "raw",
        })
    }
}

/// Content identifier: `{version, codec, multihash}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cid {
    version: CidVersion,
    codec: Codec,
    multihash: Multihash,
}

/// Check that a version/codec pair is representable before any work is done.
///
/// Version 0 can only express dag-pb content.
pub fn ensure_version_codec(version: CidVersion, codec: Codec) -> Result<()> {
    if version == CidVersion::V0 && codec != Codec::DagPb {
        return Err(CidError::VersionCodec(format!(
            "CIDv0 only supports dag-pb, got {codec}"
        )));
    }
    Ok(())
}

impl Cid {
    /// Build a CID, enforcing the version-0 restrictions immediately
    pub fn new(version: CidVersion, codec: Codec, multihash: Multihash) -> Result<Self> {
        ensure_version_codec(version, codec)?;
        if version == CidVersion::V0 && !multihash.is_sha2_256() {
            return Err(CidError::VersionCodec(
                "CIDv0 requires a sha2-256 multihash".to_string(),
            ));
        }
        Ok(Self {
            version,
            codec,
            multihash,
        })
    }

    /// Build a version-1 CID (always valid)
    pub fn new_v1(codec: Codec, multihash: Multihash) -> Self {
        Self {
            version: CidVersion::V1,
            codec,
            multihash,
        }
    }

    /// The CID version
    pub fn version(&self) -> CidVersion {
        self.version
    }

    /// The content codec
    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// The multihash digest
    pub fn multihash(&self) -> &Multihash {
        &self.multihash
    }

    /// Convert to version 1; the multihash is untouched
    pub fn to_v1(self) -> Cid {
        Cid {
            version: CidVersion::V1,
            ..self
        }
    }

    /// Convert to version 0; fails unless the content is dag-pb with a
    /// sha2-256 multihash. The multihash is untouched.
    pub fn to_v0(self) -> Result<Cid> {
        Cid::new(CidVersion::V0, self.codec, self.multihash)
    }

    /// Binary form: bare multihash for v0, `varint(1) varint(codec)
    /// multihash` for v1
    pub fn to_bytes(&self) -> Vec<u8> {
        match self.version {
            CidVersion::V0 => self.multihash.to_bytes(),
            CidVersion::V1 => {
                let mh = self.multihash.to_bytes();
                let mut out = Vec::with_capacity(mh.len() + 4);
                varint::write(&mut out, 1);
                varint::write(&mut out, self.codec.code());
                out.extend_from_slice(&mh);
                out
            }
        }
    }

    /// Decode the binary form
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        // A bare sha2-256 multihash is the implicit v0 layout.
        if bytes.len() == V0_BINARY_LEN && bytes[0] == 0x12 && bytes[1] == 0x20 {
            let (multihash, _) = Multihash::read_from(bytes)?;
            return Cid::new(CidVersion::V0, Codec::DagPb, multihash);
        }

        let (version, n) = varint::read(bytes)?;
        if version != 1 {
            return Err(CidError::Parse(format!(
                "unsupported CID version {version}"
            )));
        }
        let (code, m) = varint::read(&bytes[n..])?;
        let codec = Codec::from_code(code)?;
        let (multihash, used) = Multihash::read_from(&bytes[n + m..])?;
        if n + m + used != bytes.len() {
            return Err(CidError::Parse(
                "trailing bytes after multihash".to_string(),
            ));
        }
        Ok(Self {
            version: CidVersion::V1,
            codec,
            multihash,
        })
    }

    /// Render as text in the requested base.
    ///
    /// V0 always uses the legacy base58 form with no multibase prefix,
    /// whatever base was requested.
    pub fn to_string_of_base(&self, base: Multibase) -> String {
        match self.version {
            CidVersion::V0 => bs58::encode(self.multihash.to_bytes()).into_string(),
            CidVersion::V1 => base.encode(&self.to_bytes()),
        }
    }

    /// Parse any supported textual form
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() == V0_STRING_LEN && s.starts_with("Qm") {
            let bytes = bs58::decode(s)
                .into_vec()
                .map_err(|e| CidError::Parse(format!("invalid base58: {e}")))?;
            let (multihash, used) = Multihash::read_from(&bytes)?;
            if used != bytes.len() || !multihash.is_sha2_256() {
                return Err(CidError::Parse("malformed CIDv0".to_string()));
            }
            return Cid::new(CidVersion::V0, Codec::DagPb, multihash);
        }
        let (_, bytes) = Multibase::decode(s)?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_of_base(Multibase::Base32))
    }
}

impl FromStr for Cid {
    type Err = CidError;

    fn from_str(s: &str) -> Result<Self> {
        Cid::parse(s)
    }
}

impl Serialize for Cid {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Cid {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Cid::parse(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mh() -> Multihash {
        Multihash::sha2_256(b"sample")
    }

    #[test]
    fn test_v0_requires_dag_pb() {
        let result = Cid::new(CidVersion::V0, Codec::Raw, sample_mh());
        assert!(matches!(result, Err(CidError::VersionCodec(_))));
    }

    #[test]
    fn test_v0_string_form() {
        let cid = Cid::new(CidVersion::V0, Codec::DagPb, sample_mh()).unwrap();
        let s = cid.to_string_of_base(Multibase::Base32);
        assert!(s.starts_with("Qm"));
        assert_eq!(s.len(), 46);
        // encoding choice is ignored for v0
        assert_eq!(s, cid.to_string_of_base(Multibase::Base16));
    }

    #[test]
    fn test_v1_multibase_forms() {
        let cid = Cid::new_v1(Codec::DagPb, sample_mh());
        assert!(cid.to_string_of_base(Multibase::Base32).starts_with('b'));
        assert!(cid.to_string_of_base(Multibase::Base16).starts_with('f'));
        assert!(cid.to_string_of_base(Multibase::Base58Btc).starts_with('z'));
    }

    #[test]
    fn test_parse_roundtrip_all_bases() {
        let cid = Cid::new_v1(Codec::DagPb, sample_mh());
        for base in [Multibase::Base16, Multibase::Base32, Multibase::Base58Btc] {
            let parsed = Cid::parse(&cid.to_string_of_base(base)).unwrap();
            assert_eq!(parsed, cid);
        }
    }

    #[test]
    fn test_v0_parse_roundtrip() {
        let cid = Cid::new(CidVersion::V0, Codec::DagPb, sample_mh()).unwrap();
        let parsed = Cid::parse(&cid.to_string()).unwrap();
        assert_eq!(parsed, cid);
        assert_eq!(parsed.version(), CidVersion::V0);
    }

    #[test]
    fn test_version_conversion_preserves_multihash() {
        let v0 = Cid::new(CidVersion::V0, Codec::DagPb, sample_mh()).unwrap();
        let v1 = v0.clone().to_v1();
        assert_eq!(v1.multihash(), v0.multihash());
        let back = v1.to_v0().unwrap();
        assert_eq!(back, v0);
    }

    #[test]
    fn test_raw_cannot_downgrade() {
        let cid = Cid::new_v1(Codec::Raw, sample_mh());
        assert!(cid.to_v0().is_err());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Cid::parse("").is_err());
        assert!(Cid::parse("not a cid").is_err());
        assert!(Cid::parse("Qmshort").is_err());
        // valid multibase prefix, garbage payload
        assert!(Cid::parse("bmzxw6").is_err());
    }

    #[test]
    fn test_parse_rejects_trailing_bytes() {
        let cid = Cid::new_v1(Codec::DagPb, sample_mh());
        let mut bytes = cid.to_bytes();
        bytes.push(0);
        let s = Multibase::Base32.encode(&bytes);
        assert!(Cid::parse(&s).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_codec() {
        // dag-cbor (0x71) is not supported
        let mut bytes = Vec::new();
        crate::varint::write(&mut bytes, 1);
        crate::varint::write(&mut bytes, 0x71);
        bytes.extend_from_slice(&sample_mh().to_bytes());
        let s = Multibase::Base32.encode(&bytes);
        assert!(matches!(Cid::parse(&s), Err(CidError::Parse(_))));
    }

    #[test]
    fn test_binary_roundtrip() {
        for cid in [
            Cid::new_v1(Codec::DagPb, sample_mh()),
            Cid::new_v1(Codec::Raw, sample_mh()),
            Cid::new(CidVersion::V0, Codec::DagPb, sample_mh()).unwrap(),
        ] {
            assert_eq!(Cid::from_bytes(&cid.to_bytes()).unwrap(), cid);
        }
    }

    #[test]
    fn test_serde_as_string() {
        let cid = Cid::new_v1(Codec::DagPb, sample_mh());
        let json = serde_json::to_string(&cid).unwrap();
        assert_eq!(json, format!("\"{cid}\""));
        let back: Cid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cid);
    }
}
