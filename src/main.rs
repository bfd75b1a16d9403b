use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use csvjoin_csv::{CsvReadOptions, DEFAULT_MIN_WIDTH, OutputFormat, WriteOptions, row_writer};
use csvjoin_join::{JoinOptions, JoinSpec, JoinStats};
use csvjoin_result::{Error, Result as CsvJoinResult};

const INSTRUCTIONS: &str = "\
The command should look like:
  csvjoin ./data/Employee.csv ./data/MFG10YearTerminationData.csv Age
OR
  csvjoin ./data/Employee.csv ./data/MFG10YearTerminationData.csv Age inner
The last parameter (type of join) is optional: inner, left or right.";

#[derive(Parser, Debug)]
#[command(
    name = "csvjoin",
    version,
    about = "Join two CSV files on a named column",
    after_help = INSTRUCTIONS
)]
struct Cli {
    /// Left input file.
    #[arg(value_name = "LEFT")]
    left: PathBuf,
    /// Right input file.
    #[arg(value_name = "RIGHT")]
    right: PathBuf,
    /// Column to join on. Must appear, spelled exactly, in both headers.
    #[arg(value_name = "COLUMN")]
    column: String,
    /// One of inner, left, right.
    #[arg(value_name = "JOIN_TYPE", default_value = "inner")]
    join_type: String,
    /// Inner-scan algorithm: nested-loop or hash. Output is identical.
    #[arg(long, env = "CSVJOIN_ALGORITHM", default_value = "nested-loop")]
    algorithm: String,
    /// Minimum width of each aligned output field.
    #[arg(long, value_name = "CHARS", default_value_t = DEFAULT_MIN_WIDTH)]
    width: usize,
    /// Field delimiter of both inputs (and of --csv output).
    #[arg(long, short = 'd', default_value_t = ',')]
    delimiter: char,
    /// Write delimited rows instead of aligned columns.
    #[arg(long)]
    csv: bool,
}

impl Cli {
    fn join_spec(&self) -> CsvJoinResult<JoinSpec> {
        let options = JoinOptions {
            join_type: self.join_type.parse()?,
            algorithm: self.algorithm.parse()?,
        };
        Ok(JoinSpec::new(&self.left, &self.right, &self.column)
            .with_options(options)
            .with_read_options(CsvReadOptions::default().with_delimiter(self.delimiter)))
    }

    fn write_options(&self) -> WriteOptions {
        let format = if self.csv {
            OutputFormat::Delimited(self.delimiter)
        } else {
            OutputFormat::Aligned
        };
        WriteOptions::default()
            .with_min_width(self.width)
            .with_format(format)
    }
}

fn run<W: Write>(cli: &Cli, out: W) -> CsvJoinResult<JoinStats> {
    let spec = cli.join_spec()?;

    let mut writer = row_writer(out, &cli.write_options())?;
    let stats = spec.execute(|row| writer.write_row(&row))?;
    writer.finish()?;

    tracing::debug!(?stats, "csvjoin finished");
    Ok(stats)
}

fn report<W: Write>(err: &Error, out: &mut W) -> io::Result<()> {
    if err.is_usage_error() {
        writeln!(out, "{INSTRUCTIONS}\n")?;
    }
    writeln!(out, "error: {err}")
}

fn main() {
    // Logs go to stderr so stdout carries only joined rows. Respects RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    if let Err(err) = run(&cli, BufWriter::new(stdout.lock())) {
        let _ = report(&err, &mut io::stderr());
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csvjoin_test_utils::{people_left, people_right, write_csv};

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("csvjoin").chain(args.iter().copied()))
            .expect("parse args")
    }

    fn aligned(rows: &[&[&str]]) -> String {
        rows.iter()
            .map(|fields| {
                let line: Vec<String> = fields.iter().map(|f| format!("{f:>13}")).collect();
                line.join(" ") + "\n"
            })
            .collect()
    }

    fn run_to_string(cli: &Cli) -> CsvJoinResult<String> {
        let mut buf = Vec::new();
        run(cli, &mut buf)?;
        Ok(String::from_utf8(buf).expect("utf8 output"))
    }

    #[test]
    fn wrong_argument_count_is_rejected() {
        assert!(Cli::try_parse_from(["csvjoin"]).is_err());
        assert!(Cli::try_parse_from(["csvjoin", "a.csv", "b.csv"]).is_err());
        assert!(Cli::try_parse_from(["csvjoin", "a.csv", "b.csv", "Age", "left", "left"]).is_err());
    }

    #[test]
    fn join_type_defaults_to_inner() {
        let parsed = cli(&["a.csv", "b.csv", "Age"]);
        assert_eq!(parsed.join_type, "inner");
        assert_eq!(parsed.width, 13);
        assert_eq!(parsed.delimiter, ',');
        assert!(!parsed.csv);
    }

    #[test]
    fn inner_join_prints_aligned_rows() {
        let left = people_left();
        let right = people_right();
        let parsed = cli(&[
            left.path().to_str().unwrap(),
            right.path().to_str().unwrap(),
            "ID",
        ]);

        let out = run_to_string(&parsed).unwrap();
        assert_eq!(
            out,
            aligned(&[
                &["Age", "Gender", "ID", "Age", "Gender"],
                &["7", "Male", "1", "7", "Male"],
            ])
        );
    }

    #[test]
    fn right_join_prints_filled_rows() {
        let left = people_left();
        let right = people_right();
        let parsed = cli(&[
            left.path().to_str().unwrap(),
            right.path().to_str().unwrap(),
            "ID",
            "right",
            "--algorithm",
            "hash",
        ]);

        let out = run_to_string(&parsed).unwrap();
        assert_eq!(
            out,
            aligned(&[
                &["Age", "Gender", "Age", "Gender", "ID"],
                &["7", "Male", "7", "Male", "1"],
                &["NULL", "NULL", "8", "Female", "20"],
            ])
        );
    }

    #[test]
    fn csv_output_with_custom_delimiter() {
        let left = write_csv(&["k|a", "1|x", "2|y"]);
        let right = write_csv(&["k|b", "1|z"]);
        let parsed = cli(&[
            left.path().to_str().unwrap(),
            right.path().to_str().unwrap(),
            "k",
            "left",
            "-d",
            "|",
            "--csv",
        ]);

        let out = run_to_string(&parsed).unwrap();
        assert_eq!(out, "k|a|b\n1|x|z\n2|y|NULL\n");
    }

    #[test]
    fn repeated_runs_are_byte_identical() {
        let left = people_left();
        let right = people_right();
        let parsed = cli(&[
            left.path().to_str().unwrap(),
            right.path().to_str().unwrap(),
            "ID",
            "left",
        ]);
        assert_eq!(run_to_string(&parsed).unwrap(), run_to_string(&parsed).unwrap());
    }

    #[test]
    fn unknown_join_type_is_usage_error() {
        let left = people_left();
        let right = people_right();
        let parsed = cli(&[
            left.path().to_str().unwrap(),
            right.path().to_str().unwrap(),
            "ID",
            "outer",
        ]);

        let mut buf = Vec::new();
        let err = run(&parsed, &mut buf).unwrap_err();
        assert!(matches!(err, Error::InvalidArgumentError(_)));
        assert!(buf.is_empty());
    }

    #[test]
    fn missing_file_is_usage_error() {
        let left = people_left();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.csv");
        let parsed = cli(&[
            left.path().to_str().unwrap(),
            missing.to_str().unwrap(),
            "ID",
        ]);

        let mut buf = Vec::new();
        let err = run(&parsed, &mut buf).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
        assert!(buf.is_empty());
    }

    #[test]
    fn missing_column_produces_no_output() {
        let left = people_left();
        let right = people_right();
        let parsed = cli(&[
            left.path().to_str().unwrap(),
            right.path().to_str().unwrap(),
            "Salary",
        ]);

        let mut buf = Vec::new();
        let err = run(&parsed, &mut buf).unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound { .. }));
        assert!(buf.is_empty());
    }

    #[test]
    fn report_prints_instructions_only_for_usage_errors() {
        let mut usage = Vec::new();
        report(&Error::invalid_argument("bad join"), &mut usage).unwrap();
        let usage = String::from_utf8(usage).unwrap();
        assert!(usage.starts_with("The command should look like:"));
        assert!(usage.ends_with("error: Invalid argument: bad join\n"));

        let mut plain = Vec::new();
        report(&Error::column_not_found("Age", "a.csv"), &mut plain).unwrap();
        assert_eq!(
            String::from_utf8(plain).unwrap(),
            "error: The name Age does not exist in a.csv!\n"
        );
    }
}
