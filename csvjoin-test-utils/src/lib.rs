use std::io::Write;
use std::sync::Once;

use tempfile::NamedTempFile;

static INIT: Once = Once::new();

/// Initialize tracing for test binaries. Safe to call multiple times.
pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        use tracing_subscriber::filter::EnvFilter;
        use tracing_subscriber::fmt;
        let env = std::env::var("RUST_LOG").ok();
        let filter = match env {
            Some(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            None => EnvFilter::new("info"),
        };
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_test_writer()
            .init();
    });
}

/// Write `lines` to a fresh temporary file, one per line, and return it.
///
/// The file lives as long as the returned handle.
pub fn write_csv(lines: &[&str]) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().expect("create tmp csv");
    for line in lines {
        writeln!(tmp, "{line}").expect("write csv line");
    }
    tmp.flush().expect("flush tmp csv");
    tmp
}

/// The three-row `Age,Gender,ID` file used across the join tests.
pub fn people_left() -> NamedTempFile {
    write_csv(&["Age,Gender,ID", "7,Male,1", "8,Female,2", "3,Female,3"])
}

/// The two-row `Age,Gender,ID` file that pairs with [`people_left`].
pub fn people_right() -> NamedTempFile {
    write_csv(&["Age,Gender,ID", "7,Male,1", "8,Female,20"])
}
