// src/slice.rs
//! Line-addressed text helpers shared by the analyzers and the bundle builder.
//! - `extract`: inclusive, 1-based line slices that never fail
//! - `normalize`: trailing-space trim + blank-run collapse for final output
//! - `decode_lossy`: UTF-8 decode that drops invalid sequences

/// Inclusive 1-based slice of `lines`, joined by `\n`.
///
/// `start < 1` is treated as 1 and `end < start` as `start`, so an inverted
/// range still yields one line. Ranges past the buffer are truncated and a
/// `start` beyond the last line yields an empty string.
pub fn extract<S: AsRef<str>>(lines: &[S], start: usize, end: usize) -> String {
    let start = start.max(1);
    let end = end.max(start);
    let from = (start - 1).min(lines.len());
    let to = end.min(lines.len());
    lines[from..to]
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Final output pass over a bundle:
/// - trailing whitespace trimmed on every line
/// - runs of blank lines collapsed to a single blank line
/// - leading/trailing blank lines removed
pub fn normalize(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut last_blank = true; // drops leading blanks
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            if !last_blank {
                out.push("");
            }
            last_blank = true;
        } else {
            out.push(line);
            last_blank = false;
        }
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

/// Best-effort UTF-8 decode: invalid byte sequences are discarded rather
/// than replaced, so line numbers and surrounding text stay intact.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut rest = bytes;
    loop {
        match std::str::from_utf8(rest) {
            Ok(s) => {
                out.push_str(s);
                return out;
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                match e.error_len() {
                    Some(n) => rest = &after[n..],
                    None => return out, // truncated sequence at EOF
                }
            }
        }
    }
}

/// Split source text into lines the way every analyzer addresses them.
pub fn split_lines(source: &str) -> Vec<String> {
    source.lines().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines() -> Vec<String> {
        (1..=5).map(|i| format!("line{i}")).collect()
    }

    #[test]
    fn extract_valid_ranges_are_exact() {
        let l = lines();
        for start in 1..=5 {
            for end in start..=5 {
                let want = l[start - 1..end].join("\n");
                assert_eq!(extract(&l, start, end), want, "range {start}..={end}");
            }
        }
    }

    #[test]
    fn extract_clamps_start_below_one() {
        assert_eq!(extract(&lines(), 0, 2), "line1\nline2");
    }

    #[test]
    fn extract_inverted_range_yields_start_line() {
        assert_eq!(extract(&lines(), 4, 2), "line4");
    }

    #[test]
    fn extract_past_end_is_truncated_or_empty() {
        assert_eq!(extract(&lines(), 4, 99), "line4\nline5");
        assert_eq!(extract(&lines(), 9, 12), "");
        let empty: Vec<String> = Vec::new();
        assert_eq!(extract(&empty, 1, 1), "");
    }

    #[test]
    fn normalize_collapses_blank_runs() {
        let text = "\n\n# FILE a\n\n\n\nfn a() {}   \n\t\n\nend\n\n";
        assert_eq!(normalize(text), "# FILE a\n\nfn a() {}\n\nend");
    }

    #[test]
    fn normalize_keeps_indentation() {
        assert_eq!(normalize("    indented\n  x  "), "    indented\n  x");
    }

    #[test]
    fn decode_lossy_drops_invalid_bytes() {
        let bytes = b"def f():\xff\xfe\n    pass\n";
        assert_eq!(decode_lossy(bytes), "def f():\n    pass\n");
        assert_eq!(decode_lossy("héllo".as_bytes()), "héllo");
        assert_eq!(decode_lossy(b"ab\xe2\x82"), "ab");
    }
}
