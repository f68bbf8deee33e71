//! # Minimal ABI Codec
//!
//! Hand-rolled encoder/decoder for the handful of contract entry points
//! this client speaks. Selectors are precomputed keccak-256 prefixes of
//! the canonical signatures — there is no hashing at runtime.
//!
//! Every decode path validates data length before indexing into it. The
//! ledger's word layout is fixed (32-byte words, dynamic values behind
//! offsets), so a short or misaligned body is a provider bug surfaced
//! as [`AbiError::ShortData`], never a panic.

use metacert_core::Address;

/// keccak256("verifyCert(address,uint256)")[..4]
pub const VERIFY_CERT_SELECTOR: [u8; 4] = [0x75, 0x7c, 0x80, 0xb3];
/// keccak256("tokenURI(uint256)")[..4]
pub const TOKEN_URI_SELECTOR: [u8; 4] = [0xc8, 0x7b, 0x56, 0xdd];
/// keccak256("ownerOf(uint256)")[..4]
pub const OWNER_OF_SELECTOR: [u8; 4] = [0x63, 0x52, 0x21, 0x1e];
/// keccak256("IssuerMapping(uint256)")[..4]
pub const ISSUER_MAPPING_SELECTOR: [u8; 4] = [0xfa, 0xe7, 0xff, 0x50];
/// keccak256("mintCert(uint256,address,string)")[..4]
pub const MINT_CERT_SELECTOR: [u8; 4] = [0x2b, 0x84, 0xe7, 0xaa];
/// keccak256("registerIssuer(string,string,uint256,uint256)")[..4]
pub const REGISTER_ISSUER_SELECTOR: [u8; 4] = [0x16, 0x0c, 0xbc, 0x3c];

/// keccak256("certMinted(uint256)") — topic0 of the mint event.
pub const CERT_MINTED_TOPIC: &str =
    "0xa809625a2a051c62c99b566321a763ec45149af775ced1e21f5101c3cb72913e";

const WORD: usize = 32;

/// Errors from ABI encoding/decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbiError {
    /// A hex payload did not decode.
    #[error("invalid hex payload: {0}")]
    InvalidHex(String),

    /// The body is shorter than the layout requires.
    #[error("ABI data too short: needed {needed} bytes, have {have}")]
    ShortData {
        /// Bytes the layout requires.
        needed: usize,
        /// Bytes actually present.
        have: usize,
    },

    /// A uint word does not fit in 64 bits.
    #[error("uint value exceeds 64 bits")]
    IntegerOverflow,

    /// A decoded string is not valid UTF-8.
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,

    /// A decoded address word failed address validation.
    #[error("decoded word is not a valid address")]
    InvalidAddress,
}

/// A value to encode into calldata.
#[derive(Debug, Clone)]
pub enum Token<'a> {
    /// `uint256`, from a 64-bit value.
    Uint(u64),
    /// `address`.
    Addr(&'a Address),
    /// Dynamic `string`.
    Str(&'a str),
}

fn uint_word(value: u64) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

fn address_word(addr: &Address) -> Result<[u8; WORD], AbiError> {
    let bytes = hex::decode(&addr.as_str()[2..])
        .map_err(|e| AbiError::InvalidHex(e.to_string()))?;
    let mut word = [0u8; WORD];
    word[WORD - 20..].copy_from_slice(&bytes);
    Ok(word)
}

/// Encode a call: selector, then the static heads, then the dynamic
/// tail with string offsets relative to the start of the args area.
/// Returns the 0x-prefixed calldata hex string.
pub fn encode_call(selector: [u8; 4], tokens: &[Token<'_>]) -> Result<String, AbiError> {
    let head_len = WORD * tokens.len();
    let mut head: Vec<u8> = Vec::with_capacity(head_len);
    let mut tail: Vec<u8> = Vec::new();

    for token in tokens {
        match token {
            Token::Uint(v) => head.extend_from_slice(&uint_word(*v)),
            Token::Addr(a) => head.extend_from_slice(&address_word(a)?),
            Token::Str(s) => {
                head.extend_from_slice(&uint_word((head_len + tail.len()) as u64));
                tail.extend_from_slice(&uint_word(s.len() as u64));
                tail.extend_from_slice(s.as_bytes());
                let pad = (WORD - s.len() % WORD) % WORD;
                tail.extend(std::iter::repeat(0u8).take(pad));
            }
        }
    }

    let mut data = Vec::with_capacity(4 + head.len() + tail.len());
    data.extend_from_slice(&selector);
    data.extend_from_slice(&head);
    data.extend_from_slice(&tail);
    Ok(format!("0x{}", hex::encode(data)))
}

/// Decode a 0x-prefixed hex body into raw bytes.
pub fn decode_body(body: &str) -> Result<Vec<u8>, AbiError> {
    hex::decode(body.trim_start_matches("0x")).map_err(|e| AbiError::InvalidHex(e.to_string()))
}

fn word_at(data: &[u8], index: usize) -> Result<&[u8], AbiError> {
    let start = index * WORD;
    let end = start + WORD;
    if data.len() < end {
        return Err(AbiError::ShortData {
            needed: end,
            have: data.len(),
        });
    }
    Ok(&data[start..end])
}

/// Decode word 0 as a boolean (any nonzero word is true).
pub fn decode_bool(data: &[u8]) -> Result<bool, AbiError> {
    let word = word_at(data, 0)?;
    Ok(word.iter().any(|&b| b != 0))
}

/// Decode the word at `index` as a u64, rejecting wider values.
pub fn decode_u64(data: &[u8], index: usize) -> Result<u64, AbiError> {
    let word = word_at(data, index)?;
    if word[..WORD - 8].iter().any(|&b| b != 0) {
        return Err(AbiError::IntegerOverflow);
    }
    let mut be = [0u8; 8];
    be.copy_from_slice(&word[WORD - 8..]);
    Ok(u64::from_be_bytes(be))
}

/// Decode the word at `index` as an address (low 20 bytes).
pub fn decode_address(data: &[u8], index: usize) -> Result<Address, AbiError> {
    let word = word_at(data, index)?;
    let rendered = format!("0x{}", hex::encode(&word[WORD - 20..]));
    Address::new(rendered).map_err(|_| AbiError::InvalidAddress)
}

/// Decode the dynamic string whose offset sits in the word at `index`.
pub fn decode_string(data: &[u8], index: usize) -> Result<String, AbiError> {
    let offset = decode_u64(data, index)? as usize;
    let len_end = offset + WORD;
    if data.len() < len_end {
        return Err(AbiError::ShortData {
            needed: len_end,
            have: data.len(),
        });
    }
    let mut be = [0u8; 8];
    let len_word = &data[offset..len_end];
    if len_word[..WORD - 8].iter().any(|&b| b != 0) {
        return Err(AbiError::IntegerOverflow);
    }
    be.copy_from_slice(&len_word[WORD - 8..]);
    let len = u64::from_be_bytes(be) as usize;

    let end = len_end + len;
    if data.len() < end {
        return Err(AbiError::ShortData {
            needed: end,
            have: data.len(),
        });
    }
    String::from_utf8(data[len_end..end].to_vec()).map_err(|_| AbiError::InvalidUtf8)
}

/// Decode the issuer registry tuple `(address, string, string, uint256)`
/// into `(account_address, name, physical_address, govt_uid)`.
pub fn decode_issuer_tuple(data: &[u8]) -> Result<(Address, String, String, u64), AbiError> {
    let account = decode_address(data, 0)?;
    let name = decode_string(data, 1)?;
    let physical_address = decode_string(data, 2)?;
    let govt_uid = decode_u64(data, 3)?;
    Ok((account, name, physical_address, govt_uid))
}
