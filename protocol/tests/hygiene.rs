//! Hygiene — the protocol crate decodes untrusted network input.
//!
//! Any line a peer can send must come back as a `ProtocolError`, never a
//! panic, and numeric fields must be parsed rather than cast.

use std::fs;

const FILES: &[&str] = &["src/lib.rs", "src/codec.rs"];

const FORBIDDEN: &[(&str, &str)] = &[
    (".unwrap()", "propagate a ProtocolError instead"),
    (".expect(", "propagate a ProtocolError instead"),
    ("panic!(", "malformed input is an error value"),
    ("unreachable!(", "malformed input is an error value"),
    ("[0]", "destructure with a fixed-size pattern"),
    ("split(' ')", "fields are separated by any ASCII whitespace"),
    (" as i32", "parse numbers, do not cast"),
    ("println!(", "library code logs through the caller"),
];

#[test]
fn decoder_sources_have_no_panic_paths() {
    let mut violations = Vec::new();
    for file in FILES {
        let content = fs::read_to_string(file).unwrap_or_else(|e| panic!("read {file}: {e}"));
        for (lineno, line) in content.lines().enumerate() {
            if line.trim_start().starts_with("//") {
                continue;
            }
            for (pattern, hint) in FORBIDDEN {
                if line.contains(pattern) {
                    violations.push(format!("  {file}:{}: `{pattern}` ({hint})", lineno + 1));
                }
            }
        }
    }
    assert!(violations.is_empty(), "forbidden patterns:\n{}", violations.join("\n"));
}
