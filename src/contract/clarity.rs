//! Clarity value wire codec.
//!
//! Read-only contract calls carry arguments and results as hex-encoded
//! consensus-serialized Clarity values. Each value is a one-byte type
//! tag followed by a tag-specific payload; lengths are big-endian.

use super::c32::StacksAddress;
use thiserror::Error;

const TAG_INT: u8 = 0x00;
const TAG_UINT: u8 = 0x01;
const TAG_BUFFER: u8 = 0x02;
const TAG_TRUE: u8 = 0x03;
const TAG_FALSE: u8 = 0x04;
const TAG_PRINCIPAL_STANDARD: u8 = 0x05;
const TAG_PRINCIPAL_CONTRACT: u8 = 0x06;
const TAG_RESPONSE_OK: u8 = 0x07;
const TAG_RESPONSE_ERR: u8 = 0x08;
const TAG_NONE: u8 = 0x09;
const TAG_SOME: u8 = 0x0a;
const TAG_LIST: u8 = 0x0b;
const TAG_TUPLE: u8 = 0x0c;
const TAG_STRING_ASCII: u8 = 0x0d;
const TAG_STRING_UTF8: u8 = 0x0e;

/// Clarity names (tuple keys, contract names) are capped at 128 bytes.
const MAX_NAME_LEN: usize = 128;

#[derive(Debug, Error)]
pub enum ClarityError {
    #[error("invalid Stacks address: {0}")]
    InvalidAddress(String),
    #[error("address checksum mismatch: {0}")]
    BadChecksum(String),
    #[error("truncated Clarity value")]
    Truncated,
    #[error("unknown Clarity type tag 0x{0:02x}")]
    UnknownTag(u8),
    #[error("string content does not match its declared type")]
    BadString,
    #[error("invalid Clarity name: {0:?}")]
    BadName(String),
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("trailing bytes after Clarity value")]
    TrailingBytes,
}

/// A standard or contract principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrincipalData {
    Standard(StacksAddress),
    Contract {
        address: StacksAddress,
        name: String,
    },
}

impl PrincipalData {
    /// Parse `ST...` or `ST....contract-name`.
    pub fn parse(s: &str) -> Result<Self, ClarityError> {
        match s.split_once('.') {
            None => Ok(Self::Standard(StacksAddress::parse(s)?)),
            Some((addr, name)) => {
                validate_name(name)?;
                Ok(Self::Contract {
                    address: StacksAddress::parse(addr)?,
                    name: name.to_string(),
                })
            }
        }
    }
}

impl std::fmt::Display for PrincipalData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard(addr) => write!(f, "{addr}"),
            Self::Contract { address, name } => write!(f, "{address}.{name}"),
        }
    }
}

/// One Clarity runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum ClarityValue {
    Int(i128),
    UInt(u128),
    Buffer(Vec<u8>),
    Bool(bool),
    Principal(PrincipalData),
    ResponseOk(Box<ClarityValue>),
    ResponseErr(Box<ClarityValue>),
    OptionalNone,
    OptionalSome(Box<ClarityValue>),
    List(Vec<ClarityValue>),
    /// Field order is preserved as serialized.
    Tuple(Vec<(String, ClarityValue)>),
    StringAscii(String),
    StringUtf8(String),
}

impl ClarityValue {
    pub fn string_ascii(s: impl Into<String>) -> Result<Self, ClarityError> {
        let s = s.into();
        if !s.is_ascii() {
            return Err(ClarityError::BadString);
        }
        Ok(Self::StringAscii(s))
    }

    pub fn string_utf8(s: impl Into<String>) -> Self {
        Self::StringUtf8(s.into())
    }

    pub fn standard_principal(address: &str) -> Result<Self, ClarityError> {
        Ok(Self::Principal(PrincipalData::Standard(
            StacksAddress::parse(address)?,
        )))
    }

    pub fn some(value: ClarityValue) -> Self {
        Self::OptionalSome(Box::new(value))
    }

    pub fn ok(value: ClarityValue) -> Self {
        Self::ResponseOk(Box::new(value))
    }

    pub fn tuple(fields: Vec<(&str, ClarityValue)>) -> Result<Self, ClarityError> {
        let mut out = Vec::with_capacity(fields.len());
        for (name, value) in fields {
            validate_name(name)?;
            out.push((name.to_string(), value));
        }
        Ok(Self::Tuple(out))
    }

    // -- accessors ------------------------------------------------------

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_u128(&self) -> Option<u128> {
        match self {
            Self::UInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::StringAscii(s) | Self::StringUtf8(s) => Some(s),
            _ => None,
        }
    }

    /// Unwrap `(some v)` / `none` into an `Option`.
    pub fn as_optional(&self) -> Option<Option<&ClarityValue>> {
        match self {
            Self::OptionalSome(inner) => Some(Some(inner)),
            Self::OptionalNone => Some(None),
            _ => None,
        }
    }

    /// Unwrap `(ok v)` / `(err v)` into a `Result`.
    pub fn as_response(&self) -> Option<Result<&ClarityValue, &ClarityValue>> {
        match self {
            Self::ResponseOk(inner) => Some(Ok(inner)),
            Self::ResponseErr(inner) => Some(Err(inner)),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ClarityValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn tuple_get(&self, name: &str) -> Option<&ClarityValue> {
        match self {
            Self::Tuple(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    // -- wire format ----------------------------------------------------

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out);
        out
    }

    /// Hex form with `0x` prefix, as the node's call-read endpoint expects.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.serialize()))
    }

    /// Parse a single value from hex (with or without `0x` prefix),
    /// rejecting trailing bytes.
    pub fn from_hex(s: &str) -> Result<Self, ClarityError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        let mut cursor = Cursor::new(&bytes);
        let value = cursor.read_value()?;
        if !cursor.is_empty() {
            return Err(ClarityError::TrailingBytes);
        }
        Ok(value)
    }

    fn write(&self, out: &mut Vec<u8>) {
        match self {
            Self::Int(v) => {
                out.push(TAG_INT);
                out.extend_from_slice(&v.to_be_bytes());
            }
            Self::UInt(v) => {
                out.push(TAG_UINT);
                out.extend_from_slice(&v.to_be_bytes());
            }
            Self::Buffer(bytes) => {
                out.push(TAG_BUFFER);
                out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
                out.extend_from_slice(bytes);
            }
            Self::Bool(true) => out.push(TAG_TRUE),
            Self::Bool(false) => out.push(TAG_FALSE),
            Self::Principal(PrincipalData::Standard(addr)) => {
                out.push(TAG_PRINCIPAL_STANDARD);
                out.push(addr.version);
                out.extend_from_slice(&addr.hash160);
            }
            Self::Principal(PrincipalData::Contract { address, name }) => {
                out.push(TAG_PRINCIPAL_CONTRACT);
                out.push(address.version);
                out.extend_from_slice(&address.hash160);
                out.push(name.len() as u8);
                out.extend_from_slice(name.as_bytes());
            }
            Self::ResponseOk(inner) => {
                out.push(TAG_RESPONSE_OK);
                inner.write(out);
            }
            Self::ResponseErr(inner) => {
                out.push(TAG_RESPONSE_ERR);
                inner.write(out);
            }
            Self::OptionalNone => out.push(TAG_NONE),
            Self::OptionalSome(inner) => {
                out.push(TAG_SOME);
                inner.write(out);
            }
            Self::List(items) => {
                out.push(TAG_LIST);
                out.extend_from_slice(&(items.len() as u32).to_be_bytes());
                for item in items {
                    item.write(out);
                }
            }
            Self::Tuple(fields) => {
                out.push(TAG_TUPLE);
                out.extend_from_slice(&(fields.len() as u32).to_be_bytes());
                for (name, value) in fields {
                    out.push(name.len() as u8);
                    out.extend_from_slice(name.as_bytes());
                    value.write(out);
                }
            }
            Self::StringAscii(s) => {
                out.push(TAG_STRING_ASCII);
                out.extend_from_slice(&(s.len() as u32).to_be_bytes());
                out.extend_from_slice(s.as_bytes());
            }
            Self::StringUtf8(s) => {
                out.push(TAG_STRING_UTF8);
                out.extend_from_slice(&(s.len() as u32).to_be_bytes());
                out.extend_from_slice(s.as_bytes());
            }
        }
    }
}

fn validate_name(name: &str) -> Result<(), ClarityError> {
    if name.is_empty() || name.len() > MAX_NAME_LEN || !name.is_ascii() {
        return Err(ClarityError::BadName(name.to_string()));
    }
    Ok(())
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ClarityError> {
        let end = self.pos.checked_add(n).ok_or(ClarityError::Truncated)?;
        if end > self.bytes.len() {
            return Err(ClarityError::Truncated);
        }
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, ClarityError> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> Result<u32, ClarityError> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes(bytes.try_into().expect("4 bytes")))
    }

    fn read_address(&mut self) -> Result<StacksAddress, ClarityError> {
        let version = self.read_u8()?;
        let hash = self.take(20)?;
        Ok(StacksAddress {
            version,
            hash160: hash.try_into().expect("20 bytes"),
        })
    }

    fn read_name(&mut self) -> Result<String, ClarityError> {
        let len = self.read_u8()? as usize;
        let bytes = self.take(len)?;
        let name = std::str::from_utf8(bytes)
            .map_err(|_| ClarityError::BadName(format!("{bytes:?}")))?;
        validate_name(name)?;
        Ok(name.to_string())
    }

    fn read_value(&mut self) -> Result<ClarityValue, ClarityError> {
        let tag = self.read_u8()?;
        match tag {
            TAG_INT => {
                let bytes = self.take(16)?;
                Ok(ClarityValue::Int(i128::from_be_bytes(
                    bytes.try_into().expect("16 bytes"),
                )))
            }
            TAG_UINT => {
                let bytes = self.take(16)?;
                Ok(ClarityValue::UInt(u128::from_be_bytes(
                    bytes.try_into().expect("16 bytes"),
                )))
            }
            TAG_BUFFER => {
                let len = self.read_u32()? as usize;
                Ok(ClarityValue::Buffer(self.take(len)?.to_vec()))
            }
            TAG_TRUE => Ok(ClarityValue::Bool(true)),
            TAG_FALSE => Ok(ClarityValue::Bool(false)),
            TAG_PRINCIPAL_STANDARD => Ok(ClarityValue::Principal(PrincipalData::Standard(
                self.read_address()?,
            ))),
            TAG_PRINCIPAL_CONTRACT => {
                let address = self.read_address()?;
                let name = self.read_name()?;
                Ok(ClarityValue::Principal(PrincipalData::Contract {
                    address,
                    name,
                }))
            }
            TAG_RESPONSE_OK => Ok(ClarityValue::ResponseOk(Box::new(self.read_value()?))),
            TAG_RESPONSE_ERR => Ok(ClarityValue::ResponseErr(Box::new(self.read_value()?))),
            TAG_NONE => Ok(ClarityValue::OptionalNone),
            TAG_SOME => Ok(ClarityValue::OptionalSome(Box::new(self.read_value()?))),
            TAG_LIST => {
                let count = self.read_u32()? as usize;
                let mut items = Vec::new();
                for _ in 0..count {
                    items.push(self.read_value()?);
                }
                Ok(ClarityValue::List(items))
            }
            TAG_TUPLE => {
                let count = self.read_u32()? as usize;
                let mut fields = Vec::new();
                for _ in 0..count {
                    let name = self.read_name()?;
                    let value = self.read_value()?;
                    fields.push((name, value));
                }
                Ok(ClarityValue::Tuple(fields))
            }
            TAG_STRING_ASCII => {
                let len = self.read_u32()? as usize;
                let bytes = self.take(len)?;
                if !bytes.is_ascii() {
                    return Err(ClarityError::BadString);
                }
                Ok(ClarityValue::StringAscii(
                    String::from_utf8(bytes.to_vec()).map_err(|_| ClarityError::BadString)?,
                ))
            }
            TAG_STRING_UTF8 => {
                let len = self.read_u32()? as usize;
                let bytes = self.take(len)?;
                Ok(ClarityValue::StringUtf8(
                    String::from_utf8(bytes.to_vec()).map_err(|_| ClarityError::BadString)?,
                ))
            }
            other => Err(ClarityError::UnknownTag(other)),
        }
    }
}
