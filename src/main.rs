use std::io::{Read, Write};

use log::{LevelFilter, Log, Metadata, Record};
use pharmacy_labels::{
    font_registry, records_from_json, LabelError, LabelSheetConfig, LabelSheetRenderer,
};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Label(LabelError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Label(err) => write!(f, "{err}"),
        }
    }
}

impl From<LabelError> for CliError {
    fn from(value: LabelError) -> Self {
        Self::Label(value)
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Label(LabelError::from(value))
    }
}

#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    output: Option<String>,
    input: Option<String>,
    verbose: bool,
}

fn usage() -> &'static str {
    "pharmacy-labels\n\
\n\
USAGE:\n\
  pharmacy-labels [--config <file>] [--output <file>] [--verbose] [<path>|-]\n\
\n\
Reads a JSON array of label records from <path> (stdin when omitted or '-')\n\
and writes the label sheet PDF to --output (stdout when omitted).\n\
\n\
RECORD:\n\
  {\"product_name\": str, \"form\": str, \"amount\": num,\n\
   \"unit\": str?, \"price\": num, \"unit_price\": num?}\n"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--verbose" | "-v" => args.verbose = true,
            "--config" | "-c" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--output" | "-o" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.output = Some(path.clone());
            }
            "-" => args.input = Some(a.clone()),
            flag if flag.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

/// Plain stderr sink for the `log` facade
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = match args.config.as_deref() {
        Some(path) => LabelSheetConfig::from_json_file(path)?,
        None => LabelSheetConfig::default(),
    };

    let records = records_from_json(&read_input(args.input.as_deref())?)?;
    let fonts = font_registry::init(&config.fonts);
    let renderer = LabelSheetRenderer::new(config, fonts);

    let Some(document) = renderer.generate_document(&records)? else {
        eprintln!("No labels to print, nothing written");
        return Ok(());
    };

    let destination = match args.output.as_deref() {
        Some(path) => {
            document.write_to(path)?;
            path.to_string()
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(document.bytes())?;
            stdout.flush()?;
            "stdout".to_string()
        }
    };

    if args.verbose {
        eprintln!(
            "{} label(s) on {} page(s), {} bytes -> {}",
            document.label_count(),
            document.page_count(),
            document.bytes().len(),
            destination
        );
    }
    Ok(())
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_logging(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("pharmacy-labels")
            .chain(args.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_parse_all_options() {
        let command_line = argv(&[
            "--config",
            "sheet.json",
            "-o",
            "out.pdf",
            "--verbose",
            "labels.json",
        ]);
        let args = parse_args(&command_line).unwrap();
        assert_eq!(args.config.as_deref(), Some("sheet.json"));
        assert_eq!(args.output.as_deref(), Some("out.pdf"));
        assert_eq!(args.input.as_deref(), Some("labels.json"));
        assert!(args.verbose);
    }

    #[test]
    fn test_defaults_read_stdin() {
        let args = parse_args(&argv(&[])).unwrap();
        assert!(args.input.is_none());
        assert!(args.output.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_usage_errors() {
        assert!(matches!(parse_args(&argv(&["--output"])), Err(CliError::Usage(_))));
        assert!(matches!(parse_args(&argv(&["--bogus"])), Err(CliError::Usage(_))));
        assert!(matches!(parse_args(&argv(&["a.json", "b.json"])), Err(CliError::Usage(_))));
        assert!(matches!(parse_args(&argv(&["-h"])), Err(CliError::Usage(_))));
    }
}
