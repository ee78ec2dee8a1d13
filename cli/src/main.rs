mod config;
mod error;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use error::CliError;
use export::{Format, Options};

#[derive(Parser)]
#[command(
    name = "format-changelog",
    version,
    about = "Extract and reformat release notes from a CHANGELOG.md"
)]
struct Cli {
    /// Path to CHANGELOG.md
    input: PathBuf,

    /// File to write into (default: standard output)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,

    /// Extract the changelog of versions whose heading starts with VERSION
    #[arg(long, value_name = "VERSION")]
    pick: Option<String>,

    /// Only emit the first LIMIT versions (zero or less: no limit)
    #[arg(long, allow_negative_numbers = true)]
    limit: Option<i64>,

    /// Keep the picked version's heading in markdown output
    #[arg(long)]
    keep_heading: bool,

    /// Release details URL template, `{version}` is substituted
    #[arg(long, value_name = "TEMPLATE")]
    details_url: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored error output
    #[arg(long)]
    no_color: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Markdown,
    Appstream,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Markdown => Format::Markdown,
            OutputFormat::Appstream => Format::Appstream,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // --verbose enables INFO level, otherwise use RUST_LOG
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let color_choice = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    if let Err(err) = run(&cli) {
        report(&err, color_choice);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let options = build_options(cli)?;

    let source = std::fs::read_to_string(&cli.input).map_err(|e| CliError::ReadInput {
        path: cli.input.clone(),
        source: e,
    })?;
    let document = changelog::Parser::new(source).parse();

    match &cli.output {
        Some(path) => write_file(path, document, &options),
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            export::emit(document, &options, &mut out)?;
            out.flush().map_err(export::EmitError::from)?;
            Ok(())
        }
    }
}

fn build_options(cli: &Cli) -> Result<Options, CliError> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let appstream = config.appstream_options(cli.details_url.clone());
    if !appstream.details_url.contains("{version}") {
        warn!(template = appstream.details_url.as_str(), "details URL has no {{version}} placeholder");
    }

    let mut options = Options::new(cli.format.into())
        .keep_heading(cli.keep_heading)
        .with_appstream(appstream);
    if let Some(version) = &cli.pick {
        options = options.with_pick(version.clone());
    }
    if let Some(count) = cli.limit {
        options = options.with_limit(count);
    }

    Ok(options)
}

/// The file is only created once the input was read, and is closed when
/// this returns, whether or not writing succeeded.
fn write_file(path: &Path, document: changelog::Document, options: &Options) -> Result<(), CliError> {
    let write_error = |e| CliError::WriteOutput {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::create(path).map_err(write_error)?;
    let mut out = BufWriter::new(file);
    export::emit(document, options, &mut out)?;
    out.flush().map_err(write_error)?;

    info!(path = %path.display(), "wrote changelog");
    Ok(())
}

fn report(err: &CliError, color_choice: ColorChoice) {
    match err {
        CliError::Config(config_err) => {
            let mut files = SimpleFiles::new();
            let diagnostic = config_err.to_diagnostic(&mut files);
            let writer = StandardStream::stderr(color_choice);
            let config = term::Config::default();
            let _ = term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
        }
        other => eprintln!("error: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHANGELOG: &str = "\
# Changelog

## v1.1.0 (2024-05-01)

- Newer

## v1.0.0 (2024-01-01)

- First
";

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("format-changelog").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let cli = cli(&["CHANGELOG.md"]);
        let options = build_options(&cli).unwrap();

        assert_eq!(options, Options::new(Format::Markdown));
        assert!(cli.output.is_none());
    }

    #[test]
    fn flags_map_onto_options() {
        let cli = cli(&[
            "CHANGELOG.md",
            "--format",
            "appstream",
            "--pick",
            "v1",
            "--limit",
            "-1",
            "--details-url",
            "https://example.org/{version}",
        ]);
        let options = build_options(&cli).unwrap();

        assert_eq!(options.format, Format::Appstream);
        assert_eq!(options.pick.as_deref(), Some("v1"));
        assert_eq!(options.limit, None);
        assert!(options.keep_matched_heading);
        assert_eq!(options.appstream.details_url, "https://example.org/{version}");
    }

    #[test]
    fn writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("CHANGELOG.md");
        let output = dir.path().join("notes.md");
        std::fs::write(&input, CHANGELOG).unwrap();

        let cli = cli(&[
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--pick",
            "v1.0.0",
        ]);
        run(&cli).unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), "\n- First\n");
    }

    #[test]
    fn writes_appstream_with_config() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("CHANGELOG.md");
        let config = dir.path().join("changelog.toml");
        let output = dir.path().join("releases.xml");
        std::fs::write(&input, CHANGELOG).unwrap();
        std::fs::write(
            &config,
            "[appstream]\ndetails_url = \"https://example.org/{version}\"\nindent_level = 0\n",
        )
        .unwrap();

        let cli = cli(&[
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--format",
            "appstream",
            "--limit",
            "1",
            "--config",
            config.to_str().unwrap(),
        ]);
        run(&cli).unwrap();

        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "<releases>\n    <release version=\"1.1.0\" date=\"2024-05-01\">\n        \
             <url type=\"details\">https://example.org/1.1.0</url>\n    </release>\n</releases>"
        );
    }

    #[test]
    fn missing_input_is_reported_before_output_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.md");
        let missing = dir.path().join("missing.md");

        let cli = cli(&[missing.to_str().unwrap(), "-o", output.to_str().unwrap()]);
        let err = run(&cli).unwrap_err();

        assert!(matches!(err, CliError::ReadInput { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn bad_config_fails_before_reading_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("bad.toml");
        std::fs::write(&config, "[appstream]\nindent_level = \"one\"\n").unwrap();

        let cli = cli(&["does-not-exist.md", "--config", config.to_str().unwrap()]);
        let err = run(&cli).unwrap_err();

        assert!(matches!(err, CliError::Config(_)));
    }
}
