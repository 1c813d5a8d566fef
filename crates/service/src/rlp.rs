//! Recursive Length Prefix encoding, just enough to serialize legacy
//! transactions.

pub enum Item<'a> {
    Bytes(&'a [u8]),
    Uint(u128),
    List(Vec<Item<'a>>),
}

pub fn encode(item: &Item<'_>) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(item, &mut out);
    out
}

fn encode_into(item: &Item<'_>, out: &mut Vec<u8>) {
    match item {
        Item::Bytes(bytes) => encode_bytes(bytes, out),
        Item::Uint(value) => encode_bytes(&trimmed_be(*value), out),
        Item::List(items) => {
            let mut payload = Vec::new();
            for item in items {
                encode_into(item, &mut payload);
            }
            encode_length(payload.len(), 0xc0, out);
            out.extend_from_slice(&payload);
        }
    }
}

fn encode_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    if bytes.len() == 1 && bytes[0] < 0x80 {
        out.push(bytes[0]);
    } else {
        encode_length(bytes.len(), 0x80, out);
        out.extend_from_slice(bytes);
    }
}

fn encode_length(len: usize, offset: u8, out: &mut Vec<u8>) {
    if len <= 55 {
        out.push(offset + len as u8);
    } else {
        let len_bytes = trimmed_be(len as u128);
        out.push(offset + 55 + len_bytes.len() as u8);
        out.extend_from_slice(&len_bytes);
    }
}

/// Big-endian bytes without leading zeros; zero encodes as empty.
pub fn trimmed_be(value: u128) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    bytes[first..].to_vec()
}

/// Strips leading zeros from a big-endian byte string, e.g. a signature
/// component.
pub fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[first..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_bytes_and_short_strings() {
        assert_eq!(encode(&Item::Bytes(b"")), vec![0x80]);
        assert_eq!(encode(&Item::Bytes(&[0x7f])), vec![0x7f]);
        assert_eq!(encode(&Item::Bytes(&[0x80])), vec![0x81, 0x80]);
        assert_eq!(encode(&Item::Bytes(b"dog")), vec![0x83, b'd', b'o', b'g']);
    }

    #[test]
    fn test_integers() {
        assert_eq!(encode(&Item::Uint(0)), vec![0x80]);
        assert_eq!(encode(&Item::Uint(15)), vec![0x0f]);
        assert_eq!(encode(&Item::Uint(1024)), vec![0x82, 0x04, 0x00]);
    }

    #[test]
    fn test_lists() {
        assert_eq!(encode(&Item::List(vec![])), vec![0xc0]);
        assert_eq!(
            encode(&Item::List(vec![Item::Bytes(b"cat"), Item::Bytes(b"dog")])),
            vec![0xc8, 0x83, b'c', b'a', b't', 0x83, b'd', b'o', b'g']
        );
    }

    #[test]
    fn test_long_string_uses_length_of_length() {
        let long = [b'a'; 56];
        let encoded = encode(&Item::Bytes(&long));
        assert_eq!(&encoded[..2], &[0xb8, 56]);
        assert_eq!(encoded.len(), 58);
    }

    #[test]
    fn test_trim_leading_zeros() {
        assert_eq!(trim_leading_zeros(&[0, 0, 1, 0]), &[1, 0]);
        assert!(trim_leading_zeros(&[0, 0]).is_empty());
    }
}
