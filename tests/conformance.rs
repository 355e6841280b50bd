//! Runs embedded break-test-format lines (the `÷`/`×` notation used by
//! `GraphemeBreakTest.txt`/`WordBreakTest.txt`/`LineBreakTest.txt`) through
//! each scanner, grounded in the line format parsed by
//! `examples/original_source/Test/Unicode/main.c::run_test`/`test_line`.
//!
//! The real Unicode break-test files are large generated data files this
//! crate does not vendor; these are small representative excerpts, one rule
//! per line, built against a synthetic property table covering just the
//! codepoints each line uses (the crate ships no precompiled Unicode data of
//! its own — a host supplies real tables via `TableSource`).

use unicode_breaker::classes::{GraphemeClusterBreak, LineBreak, LineBreakCategory, WordBreak};
use unicode_breaker::TableSet;

struct TestLine {
    text: Vec<u8>,
    /// One entry per codepoint boundary, in order (including the
    /// before-the-first and after-the-last boundaries).
    breaks: Vec<bool>,
}

/// Parses one `÷ 0061 × 0308 ÷ ... # comment` line. `÷` marks a boundary
/// where a break is allowed/required, `×` marks one where it is prohibited.
fn parse_line(line: &str) -> TestLine {
    let without_comment = line.split('#').next().unwrap_or("").trim();
    let mut text = Vec::new();
    let mut breaks = Vec::new();

    for token in without_comment.split_whitespace() {
        match token {
            "\u{00F7}" => breaks.push(true),
            "\u{00D7}" => breaks.push(false),
            hex => {
                let cp = u32::from_str_radix(hex, 16).expect("bad codepoint token");
                let ch = char::from_u32(cp).expect("bad codepoint");
                let mut buf = [0u8; 4];
                text.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
        }
    }

    TestLine { text, breaks }
}

fn synthetic_table(class_for: impl Fn(u32) -> u8, block_size: u32) -> (Vec<u8>, Vec<u8>) {
    let num_blocks = (0x110000 / block_size) as usize + 1;
    let mut stage1 = vec![0u8; num_blocks];
    let mut stage2_blocks: Vec<Vec<u8>> = vec![vec![0u8; block_size as usize]];

    for cp_block in 0..num_blocks {
        let start = cp_block as u32 * block_size;
        let mut data = vec![0u8; block_size as usize];
        let mut nonzero = false;
        for o in 0..block_size as usize {
            let cp = start + o as u32;
            if cp < 0x110000 {
                let c = class_for(cp);
                if c != 0 {
                    nonzero = true;
                }
                data[o] = c;
            }
        }
        if nonzero {
            stage1[cp_block] = stage2_blocks.len() as u8;
            stage2_blocks.push(data);
        }
    }

    (stage1, stage2_blocks.into_iter().flatten().collect())
}

fn grapheme_class(cp: u32) -> GraphemeClusterBreak {
    use GraphemeClusterBreak::*;
    match cp {
        0x000D => CR,
        0x000A => LF,
        0x0308 => Extend,
        0x1F1E6..=0x1F1FF => RegionalIndicator,
        _ => Other,
    }
}

fn word_class(cp: u32) -> WordBreak {
    use WordBreak::*;
    match cp {
        0x0020 => Other,
        0x002C => MidNum,
        c if (b'a' as u32..=b'z' as u32).contains(&c) || (b'A' as u32..=b'Z' as u32).contains(&c) => ALetter,
        c if (b'0' as u32..=b'9' as u32).contains(&c) => Numeric,
        _ => Other,
    }
}

fn line_class(cp: u32) -> LineBreak {
    use LineBreak::*;
    match cp {
        0x000A => LF,
        0x0020 => SP,
        0x0028 => OP,
        0x0029 => CP,
        _ => AL,
    }
}

fn grapheme_tables() -> TableSet {
    TableSet::from_parts(
        synthetic_table(|cp| grapheme_class(cp) as u8, 256),
        (vec![0; 1], vec![0; 256]),
        (vec![0; 1], vec![0; 128]),
    )
}

fn word_tables() -> TableSet {
    TableSet::from_parts(
        (vec![0; 1], vec![0; 256]),
        synthetic_table(|cp| word_class(cp) as u8, 256),
        (vec![0; 1], vec![0; 128]),
    )
}

fn line_tables() -> TableSet {
    TableSet::from_parts(
        (vec![0; 1], vec![0; 256]),
        (vec![0; 1], vec![0; 256]),
        synthetic_table(|cp| line_class(cp) as u8, 128),
    )
}

fn check_codepoint_boundaries(text: &[u8], breaks: &[bool], mut test_at: impl FnMut(&[u8], usize) -> bool) {
    let mut index = 0usize;
    for (i, &expected) in breaks.iter().enumerate() {
        let actual = test_at(text, index);
        assert_eq!(
            actual, expected,
            "boundary {i} at byte {index} in {text:?}: expected {expected}, got {actual}"
        );
        let next = unicode_breaker::utf8::next_boundary(text, text.len(), index as i32 + 1);
        index = if next == unicode_breaker::utf8::INVALID_INDEX {
            text.len()
        } else {
            next as usize
        };
    }
}

const GRAPHEME_LINES: &[&str] = &[
    "\u{00F7} 0061 \u{00F7} 0062 \u{00F7} # break on either side of unrelated letters",
    "\u{00F7} 000D \u{00D7} 000A \u{00F7} # never break CR x LF",
    "\u{00F7} 0061 \u{00D7} 0308 \u{00F7} # do not break a base and combining mark",
    "\u{00F7} 1F1E6 \u{00D7} 1F1E7 \u{00F7} 1F1E8 \u{00D7} 1F1E9 \u{00F7} # RI pairs, does not chain across 4",
];

const WORD_LINES: &[&str] = &[
    "\u{00F7} 0061 \u{00F7} 0020 \u{00F7} 0062 \u{00F7} # letters split by a plain space",
    "\u{00F7} 0031 \u{00D7} 002C \u{00D7} 0030 \u{00F7} # thousands separator holds digits together",
];

// The first boundary of a line-break fixture is always `×`: there is no
// character before the start of the text to break away from.
const LINE_LINES: &[&str] = &[
    "\u{00D7} 0061 \u{00D7} 0020 \u{00F7} 0062 \u{00F7} # break is optional after a space",
    "\u{00D7} 0061 \u{00F7} 0028 \u{00D7} 0062 \u{00D7} 0029 \u{00F7} # open punctuation binds to what follows, not what precedes",
];

#[test]
fn grapheme_cluster_break_fixtures() {
    let tables = grapheme_tables();
    let breaker = tables.grapheme_cluster();
    for line in GRAPHEME_LINES {
        let parsed = parse_line(line);
        check_codepoint_boundaries(&parsed.text, &parsed.breaks, |text, i| breaker.test_break(text, i));
    }
}

#[test]
fn word_break_fixtures() {
    let tables = word_tables();
    let breaker = tables.word();
    for line in WORD_LINES {
        let parsed = parse_line(line);
        check_codepoint_boundaries(&parsed.text, &parsed.breaks, |text, i| breaker.test_break(text, i));
    }
}

#[test]
fn line_break_fixtures() {
    let tables = line_tables();
    let breaker = tables.line();
    for line in LINE_LINES {
        let parsed = parse_line(line);
        check_codepoint_boundaries(&parsed.text, &parsed.breaks, |text, i| {
            breaker.test_break(text, i) != LineBreakCategory::Prohibited
        });
    }
}
