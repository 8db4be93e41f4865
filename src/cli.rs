use clap::{Arg, ArgAction, Command, value_parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Directory scanned when `-d` is not given.
pub const DEFAULT_DIRECTORY: &str = ".";
/// Output file used when `-o` is not given.
pub const DEFAULT_OUTPUT: &str = "merged_source_files.txt";

pub struct Config {
    pub start_dir: PathBuf,
    pub output_path: PathBuf,
    pub show_help: bool,
    pub verbosity: u8,
}

pub fn command() -> Command {
    Command::new("srcmerge")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Merges every .h and .cpp file under a directory into one file")
        .disable_help_flag(true)
        .arg(
            Arg::new("directory")
                .short('d')
                .long("directory")
                .value_name("DIR")
                .help("Directory to start searching from")
                .default_value(DEFAULT_DIRECTORY)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Sets the merged output file path")
                .default_value(DEFAULT_OUTPUT)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (-v, -vv, -vvv)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
}

/// Parses the process arguments, exiting with clap's message on malformed input.
pub fn parse_args() -> Config {
    parse_args_from(std::env::args_os()).unwrap_or_else(|err| err.exit())
}

pub fn parse_args_from<I, T>(args: I) -> Result<Config, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command().try_get_matches_from(args)?;

    let start_dir = matches
        .get_one::<PathBuf>("directory")
        .cloned()
        .expect("`directory` has a default value");
    let output_path = matches
        .get_one::<PathBuf>("output")
        .cloned()
        .expect("`output` has a default value");

    Ok(Config {
        start_dir,
        output_path,
        show_help: matches.get_flag("help"),
        verbosity: matches.get_count("verbose"),
    })
}

/// Writes the usage message to stderr.
pub fn print_usage() {
    eprint!("{}", command().render_help());
}
