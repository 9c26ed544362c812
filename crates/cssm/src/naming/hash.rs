//! Fast non-cryptographic string hashing.

/// Hash a string with the djb2-xor function.
///
/// Walks the UTF-16 code units from the end, computing
/// `hash = (hash * 33) ^ unit` with 32-bit wrapping arithmetic, starting
/// from 5381. Names produced from this hash are stable across runs and
/// platforms.
pub fn string_hash(input: &str) -> u32 {
    let units: Vec<u16> = input.encode_utf16().collect();
    units
        .iter()
        .rev()
        .fold(5381u32, |hash, &unit| hash.wrapping_mul(33) ^ u32::from(unit))
}

/// Encode a number in lowercase base 36.
pub fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::with_capacity(7);
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
