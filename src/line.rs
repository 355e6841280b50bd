/*
 * Line scanner (Component G), per Unicode TR #14 line-breaking rules.
 *
 * A close transliteration of `categorise_line_break`, `resolve_combining_mark`,
 * `substitute_line_break`, `find_next_line_break`, and
 * `find_next_mandatory_line_break` from
 * `examples/original_source/unicode_line_break.c`. The rule cascade is kept
 * in the source's own order rather than reshaped into a pair table — the
 * source's top-of-function comment notes the same "@Optimize" opportunity it
 * takes for word breaking, and doesn't take it here either, since several
 * rules need backward scans across runs of spaces or combining marks that a
 * flat pair table can't express on its own.
 */

use crate::cache::{BreakCache, DEFAULT_CAPACITY};
use crate::classes::{LineBreak, LineBreakCategory};
use crate::tables::TableSet;
use crate::utf8;

/// Folds the classes TR #14 says to substitute before applying any pair
/// rule: context-dependent/unassigned/surrogate collapse to ordinary
/// alphabetic, and the conditional Japanese starter collapses to a plain
/// nonstarter.
fn substitute_line_break(line_break: LineBreak) -> LineBreak {
    use LineBreak::*;
    match line_break {
        AI | SG | XX | SA => AL,
        CJ => NS,
        other => other,
    }
}

/// Decides line-break opportunities over a borrowed UTF-8 text. Built fresh
/// per query via [`TableSet::line`]; holds no state beyond the table
/// reference.
pub struct LineBreaker<'a> {
    tables: &'a TableSet,
}

impl<'a> LineBreaker<'a> {
    pub(crate) fn new(tables: &'a TableSet) -> Self {
        Self { tables }
    }

    /// Fetches the (already-substituted) class of the codepoint at or
    /// before byte `at`, mirroring the C source's `get_break_at(context, at,
    /// slot, ...)`.
    fn fetch(
        &self,
        cache: &mut BreakCache<LineBreak>,
        text: &[u8],
        at: i32,
        slot: i32,
    ) -> Option<(LineBreak, i32)> {
        cache
            .get_break_at(text, at + 1, slot, |cp| self.tables.line_break(cp))
            .map(|(class, start)| (substitute_line_break(class), start))
    }

    /// Walks backward across a run of combining marks/ZWJs to find the class
    /// they attach to, falling back to ordinary alphabetic if the run
    /// reaches the start of text or a hard break.
    fn resolve_combining_mark(
        &self,
        cache: &mut BreakCache<LineBreak>,
        text: &[u8],
        line_break: LineBreak,
        index: i32,
        break_index: i32,
    ) -> LineBreak {
        use LineBreak::*;

        if !matches!(line_break, CM | ZWJ) {
            return line_break;
        }

        let mut i = index - 1;
        let mut j = break_index - 1;
        while i >= 0 {
            let (c, c_index) = match self.fetch(cache, text, i, j) {
                Some(v) => v,
                None => return AL,
            };
            i = c_index - 1;
            if !matches!(c, CM | ZWJ) {
                if matches!(c, BK | CR | LF | NL | SP | ZW) {
                    return AL;
                }
                return c;
            }
            j -= 1;
        }
        AL
    }

    fn categorise_line_break(
        &self,
        cache: &mut BreakCache<LineBreak>,
        text: &[u8],
        index: i32,
        break_index: i32,
    ) -> LineBreakCategory {
        use LineBreak::*;
        use LineBreakCategory::*;

        // --- Non-Tailorable Rules ---

        if index == 0 {
            return Prohibited;
        }
        let size = text.len() as i32;
        if index >= size {
            return Mandatory;
        }

        let (mut a, a_index) = match self.fetch(cache, text, index - 1, break_index - 1) {
            Some(v) => v,
            None => return Prohibited,
        };
        let (mut b, b_index) = match self.fetch(cache, text, index, break_index) {
            Some(v) => v,
            None => return Mandatory,
        };

        if a == CR {
            return if b == LF { Prohibited } else { Mandatory };
        }

        if matches!(a, LF | NL | BK) {
            return Mandatory;
        }

        if matches!(b, BK | CR | LF | NL) {
            return Prohibited;
        }

        if matches!(b, SP | ZW) {
            return Prohibited;
        }

        if a == ZW {
            return Optional;
        }
        if a == SP {
            let mut i = a_index - 1;
            let mut j = break_index - 2;
            while i >= 0 {
                let (c, c_index) = match self.fetch(cache, text, i, j) {
                    Some(v) => v,
                    None => break,
                };
                i = c_index - 1;
                if c == ZW {
                    return Optional;
                }
                if c != SP {
                    break;
                }
                j -= 1;
            }
        }

        // Do not break between a zero width joiner and an ideograph, emoji
        // base, or emoji modifier.
        if a == ZWJ && matches!(b, ID | EB | EM) {
            return Prohibited;
        }

        // Do not break a combining character sequence.
        if matches!(a, CM | ZWJ) {
            let a_unresolved = a;
            let mut i = a_index - 1;
            let mut j = break_index - 2;
            while i >= 0 {
                let (c, c_index) = match self.fetch(cache, text, i, j) {
                    Some(v) => v,
                    None => break,
                };
                i = c_index - 1;
                if !matches!(c, CM | ZWJ) {
                    a = if matches!(c, BK | CR | LF | NL | SP | ZW) { AL } else { c };
                    break;
                }
                j -= 1;
            }
            if a == a_unresolved {
                a = AL;
            }
        }
        if matches!(b, CM | ZWJ) {
            if matches!(a, BK | CR | LF | NL | SP | ZW) {
                b = AL;
            } else {
                return Prohibited;
            }
        }

        // Do not break before or after word joiner and related characters.
        if a == WJ || b == WJ {
            return Prohibited;
        }

        // Do not break after non-breaking space and related characters.
        if a == GL {
            return Prohibited;
        }

        // --- Tailorable Rules ---

        // Do not break before non-breaking space and related characters,
        // except after spaces and hyphens.
        if a != SP && a != BA && a != HY && b == GL {
            return Prohibited;
        }

        // Do not break before ']' or '!' or ';' or '/', even after spaces.
        if matches!(b, CL | CP | EX | IS | SY) {
            return Prohibited;
        }

        // Do not break after open punctuation, even after spaces.
        if a == OP {
            return Prohibited;
        } else if a == SP {
            let mut i = a_index - 1;
            let mut j = break_index - 2;
            while i >= 0 {
                let (c, c_index) = match self.fetch(cache, text, i, j) {
                    Some(v) => v,
                    None => break,
                };
                let c = self.resolve_combining_mark(cache, text, c, c_index, j);
                if c == OP {
                    return Prohibited;
                }
                if c != SP {
                    break;
                }
                i = c_index - 1;
                j -= 1;
            }
        }

        // Do not break between a quotation mark and open punctuation, even
        // with intervening spaces.
        if b == OP {
            let mut i = a_index;
            let mut j = break_index - 1;
            while i >= 0 {
                let (c, c_index) = match self.fetch(cache, text, i, j) {
                    Some(v) => v,
                    None => break,
                };
                let c = self.resolve_combining_mark(cache, text, c, c_index, j);
                if c == QU {
                    return Prohibited;
                }
                if c != SP {
                    break;
                }
                i = c_index - 1;
                j -= 1;
            }
        }

        // Do not break between closing punctuation and a nonstarter, even
        // with intervening spaces.
        if b == NS {
            let mut i = a_index;
            let mut j = break_index - 1;
            while i >= 0 {
                let (c, c_index) = match self.fetch(cache, text, i, j) {
                    Some(v) => v,
                    None => break,
                };
                let c = self.resolve_combining_mark(cache, text, c, c_index, j);
                if matches!(c, CL | CP) {
                    return Prohibited;
                }
                if c != SP {
                    break;
                }
                i = c_index - 1;
                j -= 1;
            }
        }

        // Do not break within B2, even with intervening spaces.
        if b == B2 {
            if a == B2 {
                return Prohibited;
            }
            let mut i = a_index - 1;
            let mut j = break_index - 2;
            while i >= 0 {
                let (c, c_index) = match self.fetch(cache, text, i, j) {
                    Some(v) => v,
                    None => break,
                };
                let c = self.resolve_combining_mark(cache, text, c, c_index, j);
                if c == B2 {
                    return Prohibited;
                }
                if c != SP {
                    break;
                }
                i = c_index - 1;
                j -= 1;
            }
        }

        // Break after spaces.
        if a == SP {
            return Optional;
        }

        // Do not break before or after quotation marks.
        if a == QU || b == QU {
            return Prohibited;
        }

        // Break before and after unresolved contingent breaks.
        if a == CB || b == CB {
            return Optional;
        }

        // Do not break before hyphen-minus, other hyphens, fixed-width
        // spaces, small kana, and other non-starters, or after acute
        // accents.
        if a == BB || matches!(b, BA | HY | NS) {
            return Prohibited;
        }

        // Don't break after Hebrew followed by a hyphen.
        if let Some((c, c_index)) = self.fetch(cache, text, a_index - 1, break_index - 2) {
            let c = self.resolve_combining_mark(cache, text, c, c_index, break_index - 2);
            if matches!(a, HY | BA) && c == HL {
                return Prohibited;
            }
        }

        // Don't break between solidus and Hebrew letters.
        if a == SY && b == HL {
            return Prohibited;
        }

        // Do not break between two ellipses, or between letters, numbers or
        // exclamations and ellipsis.
        if matches!(a, AL | EB | EM | EX | HL | ID | IN | NU) && b == IN {
            return Prohibited;
        }

        // Do not break between digits and letters.
        if matches!(a, AL | HL) && b == NU {
            return Prohibited;
        }
        if a == NU && matches!(b, AL | HL) {
            return Prohibited;
        }

        // Do not break between numeric prefixes and ideographs, or between
        // ideographs and numeric postfixes.
        if a == PR && matches!(b, ID | EB | EM) {
            return Prohibited;
        }
        if matches!(a, ID | EB | EM) && b == PO {
            return Prohibited;
        }

        // Do not break between numeric prefix/postfix and letters, or
        // between letters and prefix/postfix.
        if matches!(a, PR | PO) && matches!(b, AL | HL) {
            return Prohibited;
        }
        if matches!(a, AL | HL) && matches!(b, PR | PO) {
            return Prohibited;
        }

        // Do not break between the following pairs of classes relevant to
        // numbers.
        let between_numerics = (a == CL && b == PO)
            || (a == CP && b == PO)
            || (a == CL && b == PR)
            || (a == CP && b == PR)
            || (a == NU && b == PO)
            || (a == NU && b == PR)
            || (a == PO && b == OP)
            || (a == PO && b == NU)
            || (a == PR && b == OP)
            || (a == PR && b == NU)
            || (a == HY && b == NU)
            || (a == IS && b == NU)
            || (a == NU && b == NU)
            || (a == SY && b == NU);
        if between_numerics {
            return Prohibited;
        }

        // Do not break a Korean syllable.
        if a == JL && matches!(b, JL | JV | H2 | H3) {
            return Prohibited;
        }
        if matches!(a, JV | H2) && matches!(b, JV | JT) {
            return Prohibited;
        }
        if matches!(a, JT | H3) && b == JT {
            return Prohibited;
        }

        // Treat a Korean syllable block the same as an ideographic
        // codepoint.
        if matches!(a, JL | JT | JV | H2 | H3) && matches!(b, IN | PO) {
            return Prohibited;
        }
        if a == PR && matches!(b, JL | JT | JV | H2 | H3) {
            return Prohibited;
        }

        // Do not break between alphabetics.
        if matches!(a, AL | HL) && matches!(b, AL | HL) {
            return Prohibited;
        }

        // Do not break between numeric punctuation and alphabetics.
        if a == IS && matches!(b, AL | HL) {
            return Prohibited;
        }

        // Do not break between letters, numbers, or ordinary symbols and
        // opening or closing parentheses.
        if matches!(a, AL | HL | NU) && b == OP {
            return Prohibited;
        }
        if a == CP && matches!(b, AL | HL | NU) {
            return Prohibited;
        }

        // Break between two regional indicator symbols if and only if there
        // are an even number of regional indicators preceding the position
        // of the break.
        if a == RI && b == RI {
            let mut count = 0u32;
            let mut i = a_index;
            let mut j = break_index - 1;
            while i >= 0 {
                let (c, c_index) = match self.fetch(cache, text, i, j) {
                    Some(v) => v,
                    None => break,
                };
                let resolved = self.resolve_combining_mark(cache, text, c, c_index, j);
                if resolved != RI {
                    break;
                }
                if matches!(c, CM | ZWJ) {
                    i = c_index - 1;
                    j -= 1;
                    continue;
                }
                i = c_index - 1;
                count += 1;
                j -= 1;
            }
            if count % 2 == 1 {
                return Prohibited;
            }
        }

        // Do not break between an emoji base and an emoji modifier.
        if a == EB && b == EM {
            return Prohibited;
        }

        Optional
    }

    /// Break category at byte index `i` (spec.md §4.G).
    pub fn test_break(&self, text: &[u8], i: usize) -> LineBreakCategory {
        let mut cache = BreakCache::with_capacity(DEFAULT_CAPACITY).expect("64 is a power of two");
        self.categorise_line_break(&mut cache, text, i as i32, 0)
    }

    /// Nearest break at or after `i`, and whether it is mandatory.
    pub fn find_next_break(&self, text: &[u8], i: usize) -> (usize, bool) {
        let mut cache = BreakCache::with_capacity(DEFAULT_CAPACITY).expect("64 is a power of two");
        let size = text.len();
        let mut idx = utf8::next_boundary(text, size, i as i32 + 1);
        let mut j = 0i32;

        while idx != utf8::INVALID_INDEX {
            let category = self.categorise_line_break(&mut cache, text, idx, j);
            if category != LineBreakCategory::Prohibited {
                return (idx as usize, category == LineBreakCategory::Mandatory);
            }
            idx = utf8::next_boundary(text, size, idx + 1);
            j += 1;
        }
        (size, true)
    }

    /// Nearest mandatory break at or after `i` (spec.md §4.G).
    pub fn find_next_mandatory_break(&self, text: &[u8], i: usize) -> usize {
        let end = text.len();
        let mut idx = i;
        while idx < end {
            let (next, mandatory) = self.find_next_break(text, idx);
            idx = next;
            if mandatory {
                return idx;
            }
        }
        end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::LineBreak as Lb;

    fn tables_from(class_for: impl Fn(u32) -> Lb) -> TableSet {
        let block = 128u32;
        let num_blocks = (0x110000 / block) as usize + 1;
        let mut stage1 = vec![0u8; num_blocks];
        let mut stage2_blocks: Vec<Vec<u8>> = vec![vec![0u8; block as usize]];

        for cp_block in 0..num_blocks {
            let start = cp_block as u32 * block;
            let mut data = vec![0u8; block as usize];
            let mut nonzero = false;
            for o in 0..block as usize {
                let cp = start + o as u32;
                if cp < 0x110000 {
                    let c = class_for(cp) as u8;
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

        let stage2: Vec<u8> = stage2_blocks.into_iter().flatten().collect();
        TableSet::from_parts(
            (vec![0; 1], vec![0; 256]),
            (vec![0; 1], vec![0; 256]),
            (stage1, stage2),
        )
    }

    fn class_of(cp: u32) -> Lb {
        match cp {
            0x0020 => Lb::SP,
            0x00A0 => Lb::GL,
            0x000A => Lb::LF,
            c if (b'a' as u32..=b'z' as u32).contains(&c) || (b'A' as u32..=b'Z' as u32).contains(&c) => Lb::AL,
            _ => Lb::AL,
        }
    }

    #[test]
    fn breaks_optionally_at_a_space() {
        let tables = tables_from(class_of);
        let breaker = LineBreaker::new(&tables);
        let text = "a b".as_bytes();
        assert_eq!(breaker.find_next_break(text, 0), (2, false));
    }

    #[test]
    fn non_breaking_space_allows_no_break_before_end() {
        let tables = tables_from(class_of);
        let breaker = LineBreaker::new(&tables);
        let text = "a\u{00A0}b".as_bytes();
        assert_eq!(breaker.find_next_break(text, 0), (text.len(), true));
    }

    #[test]
    fn newline_forces_a_mandatory_break() {
        let tables = tables_from(class_of);
        let breaker = LineBreaker::new(&tables);
        let text = "a\nb".as_bytes();
        assert_eq!(breaker.find_next_break(text, 0), (2, true));
    }

    #[test]
    fn find_next_mandatory_break_skips_optional_ones() {
        let tables = tables_from(class_of);
        let breaker = LineBreaker::new(&tables);
        let text = "a b\nc".as_bytes();
        assert_eq!(breaker.find_next_mandatory_break(text, 0), 4);
    }
}
