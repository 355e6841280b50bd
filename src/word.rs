/*
 * Word scanner (Component F), per Unicode TR #29 word-boundary rules.
 *
 * A close transliteration of `allow_word_break`, `resolve_ignore_sequence_before`/
 * `_after`, `find_prior_beginning_of_word`, and `find_next_end_of_word` from
 * `examples/original_source/unicode_word_break.c`. Unlike the grapheme
 * scanner, most of these rules genuinely need lookback/lookahead across
 * "ignorable" runs (Extend/Format/ZWJ), so this keeps the source's
 * rule-by-rule cascade rather than a precomputed pair table — the source's
 * own comment notes a pair table is possible for the simple cases but never
 * implements one, and the ignore-sequence resolution has to run before any
 * pair lookup would apply regardless.
 *
 * One spot deliberately does not carry over 1:1: the C `resolve_ignore_sequence_before`
 * writes its resolved index/break-index through optional out-parameters that
 * are left uninitialized when the input class does not need resolving, and at
 * least one call site reads them unconditionally afterwards. That is a latent
 * read of indeterminate memory in the source, not a behaviour to preserve;
 * here the function always returns the original `(index, break_index)`
 * unchanged when no resolution is needed, which is what every call site
 * actually relies on.
 */

use crate::cache::{BreakCache, DEFAULT_CAPACITY};
use crate::classes::WordBreak;
use crate::tables::TableSet;
use crate::utf8;

fn is_spacing(class: WordBreak) -> bool {
    matches!(class, WordBreak::Other | WordBreak::CR | WordBreak::LF | WordBreak::Newline)
}

fn is_ignorable(class: WordBreak) -> bool {
    matches!(class, WordBreak::Extend | WordBreak::Format | WordBreak::ZWJ)
}

/// Smallest codepoint-boundary `>= at`, or `None` past the end of `text`.
fn next_codepoint_start(text: &[u8], at: i32) -> Option<i32> {
    let j = utf8::next_boundary(text, text.len(), at);
    if j == utf8::INVALID_INDEX {
        None
    } else {
        Some(j)
    }
}

/// Decides word boundaries over a borrowed UTF-8 text. Built fresh per
/// query via [`TableSet::word`]; holds no state beyond the table reference.
pub struct WordBreaker<'a> {
    tables: &'a TableSet,
}

impl<'a> WordBreaker<'a> {
    pub(crate) fn new(tables: &'a TableSet) -> Self {
        Self { tables }
    }

    /// Fetches the class of the codepoint containing byte `at` (or the
    /// nearest one at or before it), mirroring the C source's
    /// `get_break_at(context, at, slot, ...)`.
    fn fetch(
        &self,
        cache: &mut BreakCache<WordBreak>,
        text: &[u8],
        at: i32,
        slot: i32,
    ) -> Option<(WordBreak, i32)> {
        cache.get_break_at(text, at + 1, slot, |cp| self.tables.word_break(cp))
    }

    fn resolve_ignore_before(
        &self,
        cache: &mut BreakCache<WordBreak>,
        text: &[u8],
        word_break: WordBreak,
        text_index: i32,
        break_index: i32,
    ) -> (WordBreak, i32, i32) {
        if !is_ignorable(word_break) {
            return (word_break, text_index, break_index);
        }

        let mut i = text_index - 1;
        let mut j = break_index - 1;
        while i >= 0 {
            let (value, index) = match self.fetch(cache, text, i, j) {
                Some(v) => v,
                None => break,
            };
            if !is_ignorable(value) {
                return (value, index, j);
            }
            i = index - 1;
            j -= 1;
        }
        (word_break, text_index, break_index)
    }

    fn resolve_ignore_after(
        &self,
        cache: &mut BreakCache<WordBreak>,
        text: &[u8],
        word_break: WordBreak,
        text_index: i32,
        break_index: i32,
    ) -> WordBreak {
        if !is_ignorable(word_break) {
            return word_break;
        }

        let mut i = match next_codepoint_start(text, text_index + 1) {
            Some(s) => s,
            None => return word_break,
        };
        let mut j = break_index + 1;
        loop {
            let (value, index) = match self.fetch(cache, text, i, j) {
                Some(v) => v,
                None => break,
            };
            if !is_ignorable(value) {
                return value;
            }
            i = match next_codepoint_start(text, index + 1) {
                Some(s) => s,
                None => break,
            };
            j += 1;
        }
        word_break
    }

    fn allow_word_break(
        &self,
        cache: &mut BreakCache<WordBreak>,
        text: &[u8],
        text_index: i32,
        break_index: i32,
    ) -> bool {
        use WordBreak::*;

        let size = text.len() as i32;
        if text_index == 0 || text_index >= size {
            return true;
        }

        let (a, a_index) = match self.fetch(cache, text, text_index - 1, break_index - 1) {
            Some(v) => v,
            None => return true,
        };
        let (b, b_index) = match self.fetch(cache, text, text_index, break_index) {
            Some(v) => v,
            None => return true,
        };

        if a == CR && b == LF {
            return false;
        }

        if matches!(a, CR | LF | Newline) || matches!(b, CR | LF | Newline) {
            return true;
        }

        if a == ZWJ && matches!(b, GlueAfterZwj | EmojiBaseGaz) {
            return false;
        }

        if matches!(b, Format | Extend | ZWJ) {
            return false;
        }

        let (a, a_index, a_break_index) =
            self.resolve_ignore_before(cache, text, a, a_index, break_index - 1);

        if matches!(a, ALetter | HebrewLetter) && matches!(b, ALetter | HebrewLetter) {
            return false;
        }

        if matches!(a, ALetter | HebrewLetter) && matches!(b, MidLetter | MidNumLet | SingleQuote) {
            if let Some(c_start) = next_codepoint_start(text, b_index + 1) {
                if let Some((c, c_index)) = self.fetch(cache, text, c_start, break_index + 1) {
                    let c = self.resolve_ignore_after(cache, text, c, c_index, break_index + 1);
                    if matches!(c, ALetter | HebrewLetter) {
                        return false;
                    }
                }
            }
        }

        if matches!(a, MidLetter | MidNumLet | SingleQuote) && matches!(b, ALetter | HebrewLetter) {
            if let Some((c, c_index)) = self.fetch(cache, text, a_index - 1, a_break_index - 1) {
                let (c, _, _) = self.resolve_ignore_before(cache, text, c, c_index, a_break_index - 1);
                if matches!(c, ALetter | HebrewLetter) {
                    return false;
                }
            }
        }

        if a == HebrewLetter {
            if b == SingleQuote {
                return false;
            }
            if b == DoubleQuote {
                if let Some(c_start) = next_codepoint_start(text, b_index + 1) {
                    if let Some((c, c_index)) = self.fetch(cache, text, c_start, break_index + 1) {
                        let c = self.resolve_ignore_after(cache, text, c, c_index, break_index + 1);
                        if c == HebrewLetter {
                            return false;
                        }
                    }
                }
            }
        }

        if a == DoubleQuote && b == HebrewLetter {
            if let Some((c, c_index)) = self.fetch(cache, text, a_index - 1, a_break_index - 1) {
                let (c, _, _) = self.resolve_ignore_before(cache, text, c, c_index, a_break_index - 1);
                if c == HebrewLetter {
                    return false;
                }
            }
        }

        if a == Numeric && b == Numeric {
            return false;
        }
        if a == Numeric && matches!(b, ALetter | HebrewLetter) {
            return false;
        }
        if matches!(a, ALetter | HebrewLetter) && b == Numeric {
            return false;
        }

        if matches!(a, MidNum | MidNumLet | SingleQuote) && b == Numeric {
            if let Some((c, c_index)) = self.fetch(cache, text, a_index - 1, a_break_index - 1) {
                let (c, _, _) = self.resolve_ignore_before(cache, text, c, c_index, a_break_index - 1);
                if c == Numeric {
                    return false;
                }
            }
        }

        if a == Numeric && matches!(b, MidNum | MidNumLet | SingleQuote) {
            if let Some(c_start) = next_codepoint_start(text, b_index + 1) {
                if let Some((c, c_index)) = self.fetch(cache, text, c_start, break_index + 1) {
                    let c = self.resolve_ignore_after(cache, text, c, c_index, break_index + 1);
                    if c == Numeric {
                        return false;
                    }
                }
            }
        }

        if a == Katakana && b == Katakana {
            return false;
        }

        if matches!(a, ALetter | HebrewLetter | Numeric | Katakana | ExtendNumLet) && b == ExtendNumLet {
            return false;
        }
        if a == ExtendNumLet && matches!(b, ALetter | HebrewLetter | Numeric | Katakana | ExtendNumLet) {
            return false;
        }

        if matches!(a, EmojiBase | EmojiBaseGaz) && b == EmojiModifier {
            return false;
        }

        if a == RegionalIndicator && b == RegionalIndicator {
            let mut count = 1u32;
            let mut i = a_index - 1;
            let mut j = a_break_index - 1;
            while i >= 0 {
                let (value, index) = match self.fetch(cache, text, i, j) {
                    Some(v) => v,
                    None => break,
                };
                let (value, index, resolved_j) = self.resolve_ignore_before(cache, text, value, index, j);
                if value != RegionalIndicator {
                    break;
                }
                i = index - 1;
                j = resolved_j - 1;
                count += 1;
            }
            if count % 2 == 1 {
                return false;
            }
        }

        true
    }

    pub fn test_break(&self, text: &[u8], i: usize) -> bool {
        let mut cache = BreakCache::with_capacity(DEFAULT_CAPACITY).expect("64 is a power of two");
        self.allow_word_break(&mut cache, text, i as i32, 0)
    }

    /// Nearest break at or before `i` where the codepoint to its left is
    /// "spacing" and the one to its right is not (spec.md §4.F).
    pub fn find_prior_word_start(&self, text: &[u8], i: usize) -> usize {
        let mut cache = BreakCache::with_capacity(DEFAULT_CAPACITY).expect("64 is a power of two");
        let mut idx = utf8::prior_boundary(text, i as i32 - 1);
        let mut j = 0i32;

        while idx != utf8::INVALID_INDEX {
            if self.allow_word_break(&mut cache, text, idx, j) {
                let left = self.fetch(&mut cache, text, idx - 1, j - 1);
                let right = self.fetch(&mut cache, text, idx, j);
                if let (Some((l, _)), Some((r, _))) = (left, right) {
                    if is_spacing(l) && !is_spacing(r) {
                        return idx as usize;
                    }
                }
            }
            idx = utf8::prior_boundary(text, idx - 1);
            j -= 1;
        }
        0
    }

    /// Nearest break at or after `i` where the codepoint to its left is not
    /// "spacing" and the one to its right is (spec.md §4.F).
    pub fn find_next_word_end(&self, text: &[u8], i: usize) -> usize {
        let mut cache = BreakCache::with_capacity(DEFAULT_CAPACITY).expect("64 is a power of two");
        let size = text.len();
        let mut idx = utf8::next_boundary(text, size, i as i32 + 1);
        let mut j = 0i32;

        while idx != utf8::INVALID_INDEX {
            if self.allow_word_break(&mut cache, text, idx, j) {
                let left = self.fetch(&mut cache, text, idx - 1, j - 1);
                let right = self.fetch(&mut cache, text, idx, j);
                if let (Some((l, _)), Some((r, _))) = (left, right) {
                    if !is_spacing(l) && is_spacing(r) {
                        return idx as usize;
                    }
                }
            }
            idx = utf8::next_boundary(text, size, idx + 1);
            j += 1;
        }
        size
    }
}
