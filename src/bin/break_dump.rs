use std::path::PathBuf;

use structopt::StructOpt;
use unicode_breaker::{load_property_tables, Error, TableSource};

/// Reads the six named property-table blobs from a directory, one file per
/// blob named `<blob>.bin` (e.g. `grapheme_cluster_break_stage1.bin`).
struct DirTableSource {
    dir: PathBuf,
}

impl TableSource for DirTableSource {
    fn read_blob(&mut self, name: &str) -> Result<Vec<u8>, Error> {
        let path = self.dir.join(format!("{name}.bin"));
        Ok(std::fs::read(path)?)
    }
}

#[derive(StructOpt)]
struct BreakDumpParams {
    /// Directory holding the six `*_stage1.bin`/`*_stage2.bin` table blobs.
    #[structopt(long = "tables")]
    tables_dir: PathBuf,

    /// Text to scan for break positions.
    text: String,
}

fn main() {
    env_logger::init();

    let params: BreakDumpParams = BreakDumpParams::from_args();
    let mut source = DirTableSource { dir: params.tables_dir };
    let tables = load_property_tables(&mut source).expect("failed to load property tables");
    let text = params.text.as_bytes();

    let grapheme = tables.grapheme_cluster();
    print!("grapheme:");
    for i in 0..=text.len() {
        if grapheme.test_break(text, i) {
            print!(" {i}");
        }
    }
    println!();

    let word = tables.word();
    print!("word:");
    for i in 0..=text.len() {
        if word.test_break(text, i) {
            print!(" {i}");
        }
    }
    println!();

    let line = tables.line();
    print!("line:");
    let mut i = 0;
    loop {
        let (next, mandatory) = line.find_next_break(text, i);
        print!(" {next}{}", if mandatory { "!" } else { "" });
        if next >= text.len() {
            break;
        }
        i = next;
    }
    println!();
}
