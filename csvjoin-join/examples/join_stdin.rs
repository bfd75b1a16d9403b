//! Join a CSV file against rows piped on stdin.
//!
//! stdin cannot be rewound, so it is buffered in memory before the join runs.
//!
//! ```text
//! cargo run -p csvjoin-join --example join_stdin -- people.csv ID left < other.csv
//! ```

use std::env;
use std::error::Error;
use std::io::{self, BufWriter};

use csvjoin_csv::{AlignedWriter, CsvReadOptions, CsvSource, DEFAULT_MIN_WIDTH, RowWriter};
use csvjoin_join::{JoinOptions, join_sources};

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let (Some(path), Some(column)) = (args.next(), args.next()) else {
        eprintln!("Usage: join_stdin <left.csv> <column> [inner|left|right] < right.csv");
        std::process::exit(2);
    };
    let options = JoinOptions {
        join_type: args.next().as_deref().unwrap_or("inner").parse()?,
        ..Default::default()
    };

    let mut left = CsvSource::open(&path, CsvReadOptions::default())?;
    let mut right =
        CsvSource::from_reader("<stdin>", io::stdin().lock(), CsvReadOptions::default())?;

    let stdout = BufWriter::new(io::stdout().lock());
    let mut writer = AlignedWriter::new(stdout, DEFAULT_MIN_WIDTH);
    let stats = join_sources(&mut left, &mut right, &column, &options, |row| {
        writer.write_row(&row)
    })?;
    writer.finish()?;

    eprintln!("{} matched, {} filled", stats.matched_pairs, stats.filled_rows);
    Ok(())
}
