//! Textual address form for logs, configuration and the CLI.
//!
//! Format: `dv_` + base32(address, 52 chars) + base32(checksum, 8 chars)
//!
//! Checksum: first 5 bytes of Blake2b-256(address bytes).
//! Base32 alphabet: `13456789abcdefghijkmnopqrstuwxyz` (no 0/O, 2/Z, l/I, v).
//! Total length: 3 (prefix) + 52 + 8 = 63 characters.

use dvault_types::Address;

const BASE32_ALPHABET: &[u8; 32] = b"13456789abcdefghijkmnopqrstuwxyz";

/// ASCII byte → 5-bit value (0xFF = not in the alphabet).
const BASE32_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let alpha = BASE32_ALPHABET;
    let mut i = 0;
    while i < 32 {
        table[alpha[i] as usize] = i as u8;
        i += 1;
    }
    table
};

const PREFIX: &str = "dv_";
/// 256 bits → ceil(256/5) = 52 characters.
const BODY_CHARS: usize = 52;
/// 40 bits → 8 characters.
const CHECKSUM_CHARS: usize = 8;

fn encode_base32(bytes: &[u8]) -> String {
    let num_chars = (bytes.len() * 8).div_ceil(5);
    let mut result = String::with_capacity(num_chars);

    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for &byte in bytes {
        buffer = (buffer << 8) | byte as u64;
        bits_in_buffer += 8;
        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let idx = ((buffer >> bits_in_buffer) & 0x1F) as usize;
            result.push(BASE32_ALPHABET[idx] as char);
        }
    }
    // Trailing bits are zero-padded on the right.
    if bits_in_buffer > 0 {
        let idx = ((buffer << (5 - bits_in_buffer)) & 0x1F) as usize;
        result.push(BASE32_ALPHABET[idx] as char);
    }

    result
}

fn decode_base32_fixed<const N: usize>(s: &str) -> Option<[u8; N]> {
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;
    let mut result = [0u8; N];
    let mut pos = 0;

    for c in s.bytes() {
        if c >= 128 {
            return None;
        }
        let val = BASE32_DECODE[c as usize];
        if val == 0xFF {
            return None;
        }
        buffer = (buffer << 5) | val as u64;
        bits_in_buffer += 5;
        if bits_in_buffer >= 8 {
            bits_in_buffer -= 8;
            if pos < N {
                result[pos] = (buffer >> bits_in_buffer) as u8;
                pos += 1;
            }
        }
    }

    if pos < N {
        return None;
    }
    Some(result)
}

/// Render an address as `dv_…` with a trailing checksum.
pub fn encode_address(address: &Address) -> String {
    let body = encode_base32(address.as_bytes());
    let hash = crate::blake2b_256(address.as_bytes());
    let checksum = encode_base32(&hash[..5]);
    format!("{}{}{}", PREFIX, body, checksum)
}

/// Parse a `dv_…` string back into an address.
///
/// Returns `None` if the prefix, length, alphabet or checksum is wrong.
pub fn decode_address(text: &str) -> Option<Address> {
    let encoded = text.strip_prefix(PREFIX)?;
    if encoded.len() != BODY_CHARS + CHECKSUM_CHARS {
        return None;
    }

    let body: [u8; 32] = decode_base32_fixed(&encoded[..BODY_CHARS])?;
    let checksum: [u8; 5] = decode_base32_fixed(&encoded[BODY_CHARS..])?;

    if checksum != crate::blake2b_256(&body)[..5] {
        return None;
    }
    Some(Address::new(body))
}
