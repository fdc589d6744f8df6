use env_logger::Builder;
use log::{LevelFilter, SetLoggerError};
use std::io::Write;

/// Installs a logger whose lines start with `c `, so log output interleaved
/// with a `.td` file on stdout still parses as comments. Fails if a logger
/// is already installed.
pub fn build_pace_logger_for_level(level: LevelFilter) -> Result<(), SetLoggerError> {
    let mut builder = Builder::from_default_env();
    builder
        .format(|buf, record| writeln!(buf, "c {} - {}", record.level(), record.args()))
        .filter(None, level)
        .try_init()
}

/// Maps the CLI verbosity flag onto a level filter.
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}
