//! c32check encoding for Stacks addresses.
//!
//! A Stacks address is `'S'` + one c32 character for the version byte +
//! the c32 encoding of `hash160 || checksum`, where the checksum is the
//! first four bytes of `sha256(sha256(version || hash160))`. Mainnet
//! single-sig addresses use version 22 (`SP...`), testnet version 26
//! (`ST...`).

use super::ClarityError;
use sha2::{Digest, Sha256};

const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Version byte for mainnet single-sig addresses.
pub const VERSION_MAINNET_SINGLE_SIG: u8 = 22;
/// Version byte for testnet single-sig addresses.
pub const VERSION_TESTNET_SINGLE_SIG: u8 = 26;

/// A decoded standard principal: version byte plus hash160.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StacksAddress {
    pub version: u8,
    pub hash160: [u8; 20],
}

impl StacksAddress {
    /// Parse a c32check address string like `ST1PQHQKV0RJXZFY...`.
    pub fn parse(s: &str) -> Result<Self, ClarityError> {
        let s = s.trim();
        let mut chars = s.chars();
        if chars.next() != Some('S') || s.len() < 2 {
            return Err(ClarityError::InvalidAddress(s.to_string()));
        }

        let version_char = chars.next().unwrap();
        let version = digit_value(version_char)
            .ok_or_else(|| ClarityError::InvalidAddress(s.to_string()))?;

        let payload = c32_decode(&s[2..])
            .map_err(|_| ClarityError::InvalidAddress(s.to_string()))?;
        if payload.len() != 24 {
            return Err(ClarityError::InvalidAddress(s.to_string()));
        }

        let mut hash160 = [0u8; 20];
        hash160.copy_from_slice(&payload[..20]);
        let checksum = &payload[20..];

        if checksum != compute_checksum(version, &hash160) {
            return Err(ClarityError::BadChecksum(s.to_string()));
        }

        Ok(Self { version, hash160 })
    }

    /// Render back to the canonical c32check string.
    pub fn to_c32(&self) -> String {
        let checksum = compute_checksum(self.version, &self.hash160);
        let mut payload = Vec::with_capacity(24);
        payload.extend_from_slice(&self.hash160);
        payload.extend_from_slice(&checksum);

        let mut out = String::with_capacity(41);
        out.push('S');
        out.push(ALPHABET[self.version as usize & 0x1f] as char);
        out.push_str(&c32_encode(&payload));
        out
    }

    pub fn is_mainnet(&self) -> bool {
        self.version == VERSION_MAINNET_SINGLE_SIG
    }
}

impl std::fmt::Display for StacksAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_c32())
    }
}

fn compute_checksum(version: u8, hash160: &[u8; 20]) -> [u8; 4] {
    let mut preimage = Vec::with_capacity(21);
    preimage.push(version);
    preimage.extend_from_slice(hash160);

    let first = Sha256::digest(&preimage);
    let second = Sha256::digest(first);

    let mut checksum = [0u8; 4];
    checksum.copy_from_slice(&second[..4]);
    checksum
}

/// Encode bytes as c32 digits. Base-32 positional encoding of the byte
/// string as a big-endian integer, with one leading `0` digit per
/// leading zero byte.
fn c32_encode(bytes: &[u8]) -> String {
    let mut num = bytes.to_vec();
    let mut digits = Vec::new();

    while num.iter().any(|&b| b != 0) {
        let mut rem: u32 = 0;
        for b in num.iter_mut() {
            let acc = (rem << 8) | u32::from(*b);
            *b = (acc / 32) as u8;
            rem = acc % 32;
        }
        digits.push(ALPHABET[rem as usize]);
    }

    for &b in bytes {
        if b == 0 {
            digits.push(b'0');
        } else {
            break;
        }
    }

    digits.reverse();
    String::from_utf8(digits).expect("c32 digits are ASCII")
}

/// Decode c32 digits back to bytes. Accepts the homoglyphs the c32
/// alphabet tolerates (O for 0, L and I for 1) and lowercase input.
fn c32_decode(s: &str) -> Result<Vec<u8>, ()> {
    let mut bytes: Vec<u8> = Vec::new();

    for c in s.chars() {
        let value = digit_value(c).ok_or(())?;
        let mut carry = u32::from(value);
        for b in bytes.iter_mut().rev() {
            let acc = u32::from(*b) * 32 + carry;
            *b = (acc & 0xff) as u8;
            carry = acc >> 8;
        }
        while carry > 0 {
            bytes.insert(0, (carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    let leading_zero_digits = s
        .chars()
        .take_while(|&c| matches!(c.to_ascii_uppercase(), '0' | 'O'))
        .count();
    let leading_zero_bytes = bytes.iter().take_while(|&&b| b == 0).count();
    for _ in leading_zero_bytes..leading_zero_digits {
        bytes.insert(0, 0);
    }

    Ok(bytes)
}

fn digit_value(c: char) -> Option<u8> {
    let c = match c.to_ascii_uppercase() {
        'O' => '0',
        'L' | 'I' => '1',
        other => other,
    };
    ALPHABET.iter().position(|&a| a as char == c).map(|i| i as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(StacksAddress::parse("").is_err());
        assert!(StacksAddress::parse("X123").is_err());
        assert!(StacksAddress::parse("ST!!!").is_err());
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let addr = StacksAddress {
            version: VERSION_TESTNET_SINGLE_SIG,
            hash160: [0xab; 20],
        };
        let encoded = addr.to_c32();
        assert!(encoded.starts_with("ST"));

        let decoded = StacksAddress::parse(&encoded).unwrap();
        assert_eq!(decoded, addr);
    }

    #[test]
    fn test_leading_zero_hash_roundtrip() {
        let addr = StacksAddress {
            version: VERSION_MAINNET_SINGLE_SIG,
            hash160: {
                let mut h = [0u8; 20];
                h[18] = 0x01;
                h[19] = 0xff;
                h
            },
        };
        let decoded = StacksAddress::parse(&addr.to_c32()).unwrap();
        assert_eq!(decoded, addr);
    }

    #[test]
    fn test_all_zero_hash_roundtrip() {
        let addr = StacksAddress {
            version: VERSION_TESTNET_SINGLE_SIG,
            hash160: [0u8; 20],
        };
        let decoded = StacksAddress::parse(&addr.to_c32()).unwrap();
        assert_eq!(decoded, addr);
    }

    #[test]
    fn test_corrupted_checksum_rejected() {
        let addr = StacksAddress {
            version: VERSION_TESTNET_SINGLE_SIG,
            hash160: [0x42; 20],
        };
        let mut encoded = addr.to_c32();
        // Flip the last character to another alphabet member
        let last = encoded.pop().unwrap();
        encoded.push(if last == 'Z' { 'Y' } else { 'Z' });

        assert!(matches!(
            StacksAddress::parse(&encoded),
            Err(ClarityError::BadChecksum(_))
        ));
    }

    #[test]
    fn test_homoglyphs_normalized() {
        let addr = StacksAddress {
            version: VERSION_TESTNET_SINGLE_SIG,
            hash160: [0x11; 20],
        };
        let encoded = addr.to_c32();
        let sloppy: String = encoded
            .chars()
            .map(|c| match c {
                '0' => 'O',
                '1' => 'l',
                other => other.to_ascii_lowercase(),
            })
            .collect();
        // 'S' prefix must survive normalization
        let sloppy = format!("S{}", &sloppy[1..]);

        assert_eq!(StacksAddress::parse(&sloppy).unwrap(), addr);
    }

    #[test]
    fn test_version_chars() {
        let mainnet = StacksAddress {
            version: VERSION_MAINNET_SINGLE_SIG,
            hash160: [1; 20],
        };
        assert!(mainnet.to_c32().starts_with("SP"));
        assert!(mainnet.is_mainnet());

        let testnet = StacksAddress {
            version: VERSION_TESTNET_SINGLE_SIG,
            hash160: [1; 20],
        };
        assert!(testnet.to_c32().starts_with("ST"));
        assert!(!testnet.is_mainnet());
    }
}
