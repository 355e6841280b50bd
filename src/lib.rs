// #![cfg_attr(debug_assertions, deny(warnings))]

pub mod atr;
pub mod cache;
pub mod classes;
pub mod crc32;
pub mod error;
pub mod grapheme;
pub mod line;
pub mod tables;
pub mod trie;
pub mod utf8;
pub mod word;

pub use classes::{GraphemeClusterBreak, LineBreak, LineBreakCategory, WordBreak};
pub use error::Error;
pub use grapheme::GraphemeClusterBreaker;
pub use line::LineBreaker;
pub use tables::{TableSet, TableSource};
pub use trie::{BreakFlags, Trie};
pub use word::WordBreaker;

/// Loads the three property-table pairs a segmentation engine needs from
/// `source` (spec.md §6's `load_property_tables`). This is the crate's
/// top-level entry point for the two-stage-table path; `load_trie` is the
/// entry point for the four-stage-trie path, and a host may use either or
/// both depending on which asset it shipped.
pub fn load_property_tables<R: TableSource>(source: &mut R) -> Result<TableSet, Error> {
    TableSet::load(source)
}

/// Reads a `.atr` chunked trie stream (spec.md §4.C, §6's `load_trie`).
pub fn load_trie<R: std::io::Read>(reader: R) -> Result<Trie, Error> {
    atr::load_trie(reader)
}

/// Writes a trie back out as a `.atr` stream (spec.md §8 invariants 4/5).
pub fn write_trie<W: std::io::Write>(trie: &Trie, writer: W) -> Result<(), Error> {
    atr::write_trie(trie, writer)
}
