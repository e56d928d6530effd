//! Text formatting for time values, which are nanosecond integers.

const UNITS: [(&str, i64); 6] = [
    ("h", 3_600_000_000_000),
    ("m", 60_000_000_000),
    ("s", 1_000_000_000),
    ("ms", 1_000_000),
    ("us", 1_000),
    ("ns", 1),
];

/// Formats a duration as its non-zero units, largest first: `1s 500ms`.
pub fn format_duration(ns: i64) -> String {
    if ns == 0 {
        return "0s".to_string();
    }

    let mut rest = ns.unsigned_abs();
    let mut parts = Vec::new();
    for (unit, size) in UNITS {
        let size = size.unsigned_abs();
        let count = rest / size;
        if count > 0 {
            parts.push(format!("{count}{unit}"));
            rest %= size;
        }
    }

    let text = parts.join(" ");
    if ns < 0 { format!("-{text}") } else { text }
}

/// Formats a timestamp as `seconds.nanoseconds`.
pub fn format_timestamp(ns: i64) -> String {
    let sign = if ns < 0 { "-" } else { "" };
    let abs = ns.unsigned_abs();
    format!("{sign}{}.{:09}", abs / 1_000_000_000, abs % 1_000_000_000)
}
