use std::fmt::Write;

/// Wraps `s` in single quotes, doubling any embedded single quote.
pub fn quote_sql_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');

    for ch in s.chars() {
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }

    out.push('\'');
    out
}

/// Lowercase hex encoding, two digits per byte.
pub fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 * bytes.len());
    for b in bytes {
        // Writing into a String cannot fail.
        let _ = write!(&mut out, "{b:02x}");
    }
    out
}
