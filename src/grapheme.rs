/*
 * Grapheme-cluster scanner (Component E), per Unicode TR #29.
 *
 * `examples/original_source/Source/unicode_break_iterator.c` precomputes a
 * pair table over every ordered pair of grapheme classes for the rules that
 * need no lookback (GB1-GB5, GB6-GB8, GB11 here renumbered as spec.md §4.E's
 * rules 1-5, 7) and falls through to an explicit backward walk only for the
 * emoji-modifier run (rule 6) and the regional-indicator parity count (rule
 * 8). This keeps that same two-tier shape: a flat `[[PairResult; 18]; 18]`
 * array built once per breaker, with `Indeterminate` cells marking exactly
 * the pairs (Emoji_Base|Emoji_Base_GAZ|Extend x Emoji_Modifier,
 * Regional_Indicator x Regional_Indicator) that need the walk — the Extend
 * case covers an Emoji_Base followed by a run of Extend before the
 * Emoji_Modifier, which `emoji_base_precedes` walks backward through.
 */

use crate::classes::GraphemeClusterBreak;
use crate::tables::TableSet;
use crate::utf8;

const ALL_CLASSES: [GraphemeClusterBreak; 18] = {
    use GraphemeClusterBreak::*;
    [
        Other, CR, LF, Control, Extend, ZWJ, RegionalIndicator, Prepend, SpacingMark, HangulL,
        HangulV, HangulT, HangulLV, HangulLVT, EmojiBase, EmojiModifier, GlueAfterZwj,
        EmojiBaseGaz,
    ]
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum PairResult {
    Allowed,
    Disallowed,
    Indeterminate,
}

fn build_pair_table() -> [[PairResult; 18]; 18] {
    use GraphemeClusterBreak::*;

    let mut table = [[PairResult::Allowed; 18]; 18];
    let idx = |c: GraphemeClusterBreak| c as usize;

    // Rule 7: do not break within emoji ZWJ sequences.
    table[idx(ZWJ)][idx(GlueAfterZwj)] = PairResult::Disallowed;
    table[idx(ZWJ)][idx(EmojiBaseGaz)] = PairResult::Disallowed;

    // Rule 5: do not break after Prepend.
    for &right in &ALL_CLASSES {
        table[idx(Prepend)][idx(right)] = PairResult::Disallowed;
    }

    // Rule 4: do not break before Extend, ZWJ, or SpacingMark.
    for &left in &ALL_CLASSES {
        table[idx(left)][idx(Extend)] = PairResult::Disallowed;
        table[idx(left)][idx(ZWJ)] = PairResult::Disallowed;
        table[idx(left)][idx(SpacingMark)] = PairResult::Disallowed;
    }

    // Rule 3: do not break within Hangul syllable sequences.
    table[idx(HangulL)][idx(HangulL)] = PairResult::Disallowed;
    table[idx(HangulL)][idx(HangulV)] = PairResult::Disallowed;
    table[idx(HangulL)][idx(HangulLV)] = PairResult::Disallowed;
    table[idx(HangulL)][idx(HangulLVT)] = PairResult::Disallowed;
    table[idx(HangulV)][idx(HangulV)] = PairResult::Disallowed;
    table[idx(HangulV)][idx(HangulT)] = PairResult::Disallowed;
    table[idx(HangulLV)][idx(HangulV)] = PairResult::Disallowed;
    table[idx(HangulLV)][idx(HangulT)] = PairResult::Disallowed;
    table[idx(HangulT)][idx(HangulT)] = PairResult::Disallowed;
    table[idx(HangulLVT)][idx(HangulT)] = PairResult::Disallowed;

    // Rule 2: do not break CR x LF; otherwise always break around CR, LF,
    // Control. Applied last so it wins over rules 3-5, 7 above, matching
    // spec.md §4.E's stated precedence (rule 2 before rules 3-7).
    for &left in &ALL_CLASSES {
        for &right in &ALL_CLASSES {
            if matches!(left, CR | LF | Control) || matches!(right, CR | LF | Control) {
                table[idx(left)][idx(right)] = PairResult::Allowed;
            }
        }
    }
    table[idx(CR)][idx(LF)] = PairResult::Disallowed;

    // Rules 6 and 8 are not pairwise; mark their cells Indeterminate so
    // `test_break` falls through to the explicit backward walks.
    table[idx(EmojiBase)][idx(EmojiModifier)] = PairResult::Indeterminate;
    table[idx(EmojiBaseGaz)][idx(EmojiModifier)] = PairResult::Indeterminate;
    table[idx(Extend)][idx(EmojiModifier)] = PairResult::Indeterminate;
    table[idx(RegionalIndicator)][idx(RegionalIndicator)] = PairResult::Indeterminate;

    table
}

/// Decides grapheme-cluster boundaries over a borrowed UTF-8 text. A fresh
/// instance is cheap to build (`TableSet::grapheme_cluster`) and holds no
/// state of its own beyond the precomputed pair table and a reference to the
/// property tables; it is not shared across threads (spec.md §5).
pub struct GraphemeClusterBreaker<'a> {
    tables: &'a TableSet,
    pairs: [[PairResult; 18]; 18],
}

impl<'a> GraphemeClusterBreaker<'a> {
    pub(crate) fn new(tables: &'a TableSet) -> Self {
        Self {
            tables,
            pairs: build_pair_table(),
        }
    }

    /// Is a cursor allowed to break between the codepoint ending at `i` and
    /// the one starting at `i`? Start and end of text always break.
    pub fn test_break(&self, text: &[u8], i: usize) -> bool {
        if i == 0 || i >= text.len() {
            return true;
        }

        let (left_cp, left_start) = utf8::decode_prior(text, i as i32);
        if left_start == utf8::INVALID_INDEX {
            return true;
        }
        let (right_cp, _) = utf8::decode(text, i);

        let left = self.tables.grapheme_cluster_break(left_cp);
        let right = self.tables.grapheme_cluster_break(right_cp);

        match self.pairs[left as usize][right as usize] {
            PairResult::Allowed => true,
            PairResult::Disallowed => false,
            PairResult::Indeterminate => self.resolve_indeterminate(text, left, right, left_start),
        }
    }

    fn resolve_indeterminate(
        &self,
        text: &[u8],
        left: GraphemeClusterBreak,
        right: GraphemeClusterBreak,
        left_start: i32,
    ) -> bool {
        use GraphemeClusterBreak::*;

        if right == EmojiModifier && matches!(left, EmojiBase | EmojiBaseGaz | Extend) {
            return !self.emoji_base_precedes(text, left, left_start);
        }
        if left == RegionalIndicator && right == RegionalIndicator {
            return self.count_preceding_regional_indicators(text, left_start) % 2 == 0;
        }
        true
    }

    /// Walks backward over an `Extend*` run starting at `left` to see
    /// whether it is anchored by an `Emoji_Base`/`Emoji_Base_GAZ` (rule 6).
    fn emoji_base_precedes(&self, text: &[u8], mut current: GraphemeClusterBreak, mut pos: i32) -> bool {
        loop {
            match current {
                GraphemeClusterBreak::EmojiBase | GraphemeClusterBreak::EmojiBaseGaz => return true,
                GraphemeClusterBreak::Extend => {
                    let (cp, start) = utf8::decode_prior(text, pos);
                    if start == utf8::INVALID_INDEX {
                        return false;
                    }
                    current = self.tables.grapheme_cluster_break(cp);
                    pos = start;
                }
                _ => return false,
            }
        }
    }

    /// Counts the run of consecutive `Regional_Indicator` codepoints ending
    /// at (and including) the one starting at `left_start` (rule 8).
    fn count_preceding_regional_indicators(&self, text: &[u8], left_start: i32) -> u32 {
        let mut count = 1u32;
        let mut pos = left_start;
        loop {
            let (cp, start) = utf8::decode_prior(text, pos);
            if start == utf8::INVALID_INDEX {
                break;
            }
            if self.tables.grapheme_cluster_break(cp) != GraphemeClusterBreak::RegionalIndicator {
                break;
            }
            count += 1;
            pos = start;
        }
        count
    }

    /// Smallest boundary `>= i`, clamped to `|text|`.
    pub fn find_next_boundary(&self, text: &[u8], i: usize) -> usize {
        let size = text.len();
        let start = utf8::next_boundary(text, size, i as i32);
        if start == utf8::INVALID_INDEX {
            return size;
        }
        let mut j = start as usize;
        loop {
            if self.test_break(text, j) {
                return j;
            }
            let (_, read) = utf8::decode(text, j);
            j += read.max(1);
        }
    }

    /// Largest boundary `<= i`, clamped to `0`.
    pub fn find_prior_boundary(&self, text: &[u8], i: usize) -> usize {
        let start = utf8::prior_boundary(text, i as i32);
        if start == utf8::INVALID_INDEX {
            return 0;
        }
        let mut j = start as usize;
        loop {
            if self.test_break(text, j) {
                return j;
            }
            if j == 0 {
                return 0;
            }
            let prev = utf8::prior_boundary(text, j as i32 - 1);
            if prev == utf8::INVALID_INDEX {
                return 0;
            }
            j = prev as usize;
        }
    }
}
