/*
 * Two-stage codepoint property tables (Component B).
 *
 * Mirrors `examples/original_source/Source/unicode_load_tables.c`'s
 * `unicode_load_tables`, which loads six named byte blobs (a stage1/stage2
 * pair each for grapheme cluster, line, and word breaking) and installs them
 * as global tables. Here the six blobs are loaded into one owned `TableSet`
 * instead of six process-global pointers, per the re-architecture note in
 * spec.md §9 ("global mutable tables set by a `set_*_tables` function" →
 * "an explicit engine value threaded through every call").
 */

use crate::classes::{GraphemeClusterBreak, LineBreak, WordBreak};
use crate::error::Error;

/// A compact codepoint -> small-integer map using one indirection through a
/// block-index array: `stage2[stage1[cp / BLOCK] * BLOCK + cp % BLOCK]`.
#[derive(Debug, Clone)]
pub struct TwoStageTable {
    stage1: Box<[u8]>,
    stage2: Box<[u8]>,
    block_size: u32,
}

impl TwoStageTable {
    pub fn new(stage1: Vec<u8>, stage2: Vec<u8>, block_size: u32) -> Self {
        Self {
            stage1: stage1.into_boxed_slice(),
            stage2: stage2.into_boxed_slice(),
            block_size,
        }
    }

    /// Raw table byte for `cp`. Codepoints `>= 0x110000` (including the
    /// surrogate range, which sorts below that bound but is still invalid)
    /// are reported as `0`, which every class enum's variant 0 is
    /// "Other"/"Unknown" for.
    #[inline]
    pub fn lookup_raw(&self, cp: u32) -> u8 {
        if cp >= 0x110000 {
            return 0;
        }
        let block = self.stage1[(cp / self.block_size) as usize] as usize;
        self.stage2[block * self.block_size as usize + (cp % self.block_size) as usize]
    }
}

/// Reads a single named byte blob, e.g. `"grapheme_cluster_break_stage1"`.
/// Implemented by whatever the host uses to locate tables — a directory of
/// files, an embedded asset bundle, bytes over the network. This is the
/// idiomatic substitute for the source's `load_table(asset_name, heap,
/// stack)` (`examples/original_source/Source/unicode_load_tables.c`), which
/// took a bare C string and an allocator; here the "allocator" is just
/// `Vec<u8>` and the "asset path" concern is pushed entirely to the
/// implementor.
pub trait TableSource {
    fn read_blob(&mut self, name: &str) -> Result<Vec<u8>, Error>;
}

/// Grapheme cluster break uses 256-codepoint blocks (spec.md §3).
const GRAPHEME_BLOCK_SIZE: u32 = 256;
/// Word break uses 256-codepoint blocks (spec.md §3).
const WORD_BLOCK_SIZE: u32 = 256;
/// Line break uses 128-codepoint blocks (spec.md §3).
const LINE_BLOCK_SIZE: u32 = 128;

/// Owns the three two-stage tables the scanners need. Constructed once at
/// start-up and then immutable (spec.md §5): share it across threads by
/// shared reference.
#[derive(Debug, Clone)]
pub struct TableSet {
    grapheme: TwoStageTable,
    word: TwoStageTable,
    line: TwoStageTable,
}

impl TableSet {
    /// Loads the six blobs named in spec.md §6's
    /// `load_property_tables(source)`: `grapheme_cluster_break_stage1/2`,
    /// `line_break_stage1/2`, `word_break_stage1/2`.
    pub fn load(source: &mut impl TableSource) -> Result<Self, Error> {
        let grapheme = TwoStageTable::new(
            source.read_blob("grapheme_cluster_break_stage1")?,
            source.read_blob("grapheme_cluster_break_stage2")?,
            GRAPHEME_BLOCK_SIZE,
        );
        let line = TwoStageTable::new(
            source.read_blob("line_break_stage1")?,
            source.read_blob("line_break_stage2")?,
            LINE_BLOCK_SIZE,
        );
        let word = TwoStageTable::new(
            source.read_blob("word_break_stage1")?,
            source.read_blob("word_break_stage2")?,
            WORD_BLOCK_SIZE,
        );

        log::debug!("loaded grapheme/word/line property tables");

        Ok(Self {
            grapheme,
            word,
            line,
        })
    }

    /// Builds a `TableSet` directly from already-decoded stage arrays;
    /// mainly useful for tests and for hosts that embed the tables as
    /// `static` byte arrays rather than loading them through a
    /// [`TableSource`].
    pub fn from_parts(
        grapheme: (Vec<u8>, Vec<u8>),
        word: (Vec<u8>, Vec<u8>),
        line: (Vec<u8>, Vec<u8>),
    ) -> Self {
        Self {
            grapheme: TwoStageTable::new(grapheme.0, grapheme.1, GRAPHEME_BLOCK_SIZE),
            word: TwoStageTable::new(word.0, word.1, WORD_BLOCK_SIZE),
            line: TwoStageTable::new(line.0, line.1, LINE_BLOCK_SIZE),
        }
    }

    #[inline]
    pub fn grapheme_cluster_break(&self, cp: u32) -> GraphemeClusterBreak {
        GraphemeClusterBreak::from_u8(self.grapheme.lookup_raw(cp))
    }

    #[inline]
    pub fn word_break(&self, cp: u32) -> WordBreak {
        WordBreak::from_u8(self.word.lookup_raw(cp))
    }

    #[inline]
    pub fn line_break(&self, cp: u32) -> LineBreak {
        LineBreak::from_u8(self.line.lookup_raw(cp))
    }

    /// Builds a fresh grapheme-cluster scanner borrowing these tables
    /// (spec.md §6). Cheap to construct; not meant to outlive a single
    /// query's worth of work.
    pub fn grapheme_cluster(&self) -> crate::grapheme::GraphemeClusterBreaker<'_> {
        crate::grapheme::GraphemeClusterBreaker::new(self)
    }

    /// Builds a fresh word scanner borrowing these tables (spec.md §6).
    pub fn word(&self) -> crate::word::WordBreaker<'_> {
        crate::word::WordBreaker::new(self)
    }

    /// Builds a fresh line scanner borrowing these tables (spec.md §6).
    pub fn line(&self) -> crate::line::LineBreaker<'_> {
        crate::line::LineBreaker::new(self)
    }
}
