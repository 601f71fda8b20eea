use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use propertor::{Encoding, Error, Properties, PropertiesLoader};

const HELP: &str = "\
props - inspect Java-style .properties files

Usage:
  props get [OPTIONS] FILE KEY [DEFAULT]
  props list [OPTIONS] FILE...
  props --help
  props --version

Commands:
  get       Print the decoded value of KEY
  list      Print every decoded key=value pair, sorted by key
";

const OPTIONS_HELP: &str = "\
Options:
      --utf8              Read files as UTF-8 instead of ISO-8859-1.
  -i, --ignore-missing    Skip files that do not exist.
  -v, --verbose           Print loader diagnostics to stderr.
  -h, --help              Show this help text.
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Subcommand {
    Get,
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Invocation {
    Help(Subcommand),
    Run(Options),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Options {
    subcommand: Subcommand,
    encoding: Encoding,
    required: bool,
    verbose: bool,
    operands: Vec<String>,
}

impl Options {
    fn new(subcommand: Subcommand) -> Self {
        Self {
            subcommand,
            encoding: Encoding::Latin1,
            required: true,
            verbose: false,
            operands: Vec::new(),
        }
    }
}

fn main() {
    process::exit(run(env::args_os()));
}

fn run(args: impl IntoIterator<Item = OsString>) -> i32 {
    let mut args = args.into_iter();
    let _bin = args.next();

    let Some(subcommand) = args.next() else {
        print!("{HELP}");
        return 0;
    };

    let subcommand = match subcommand.to_string_lossy().as_ref() {
        "-h" | "--help" | "help" => {
            print!("{HELP}");
            return 0;
        }
        "-V" | "--version" | "version" => {
            println!("props {}", env!("CARGO_PKG_VERSION"));
            return 0;
        }
        "get" => Subcommand::Get,
        "list" => Subcommand::List,
        unknown => {
            eprintln!("props: unknown subcommand `{unknown}`");
            eprintln!("Try `props --help`.");
            return 1;
        }
    };

    match parse_options(subcommand, args.collect()) {
        Ok(Invocation::Help(subcommand)) => {
            print_subcommand_help(subcommand);
            0
        }
        Ok(Invocation::Run(options)) => match execute(&options) {
            Ok(code) => code,
            Err(err) => {
                eprintln!("props: {err}");
                1
            }
        },
        Err(err) => {
            eprintln!("props: {err}");
            eprintln!("Try `props {} --help`.", subcommand_name(subcommand));
            1
        }
    }
}

fn parse_options(subcommand: Subcommand, args: Vec<OsString>) -> Result<Invocation, String> {
    let mut options = Options::new(subcommand);
    let mut only_operands = false;

    for arg in args {
        let token = arg.to_string_lossy().into_owned();
        if only_operands {
            options.operands.push(token);
            continue;
        }
        match token.as_str() {
            "--" => only_operands = true,
            "-h" | "--help" => return Ok(Invocation::Help(subcommand)),
            "--utf8" => options.encoding = Encoding::Utf8,
            "-i" | "--ignore-missing" => options.required = false,
            "-v" | "--verbose" => options.verbose = true,
            unknown if unknown.starts_with('-') && unknown.len() > 1 => {
                return Err(format!("unknown option `{unknown}`"));
            }
            _ => options.operands.push(token),
        }
    }

    match subcommand {
        Subcommand::Get if options.operands.len() < 2 => {
            Err("`get` requires FILE and KEY".to_owned())
        }
        Subcommand::Get if options.operands.len() > 3 => {
            Err("`get` takes at most FILE, KEY and DEFAULT".to_owned())
        }
        Subcommand::List if options.operands.is_empty() => {
            Err("`list` requires at least one FILE".to_owned())
        }
        _ => Ok(Invocation::Run(options)),
    }
}

fn execute(options: &Options) -> Result<i32, Error> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match options.subcommand {
        Subcommand::Get => {
            let props = load_files(options, &options.operands[..1])?;
            let key = &options.operands[1];
            match props.get(key).or(options.operands.get(2).map(String::as_str)) {
                Some(value) => {
                    writeln!(out, "{value}")?;
                    Ok(0)
                }
                None => {
                    eprintln!("props: no property named `{key}`");
                    Ok(1)
                }
            }
        }
        Subcommand::List => {
            let props = load_files(options, &options.operands)?;
            for (key, value) in &props {
                writeln!(out, "{key}={value}")?;
            }
            Ok(0)
        }
    }
}

fn load_files(options: &Options, files: &[String]) -> Result<Properties, Error> {
    let loader = PropertiesLoader::new()
        .paths(files.iter().map(PathBuf::from))
        .encoding(options.encoding)
        .required(options.required);
    let (props, report) = loader.load_with_report()?;
    if options.verbose {
        eprintln!(
            "props: read {} file(s), skipped {}, {} declaration(s), {} key(s)",
            report.files_read,
            report.files_skipped,
            report.entries,
            props.len()
        );
    }
    Ok(props)
}

fn subcommand_name(subcommand: Subcommand) -> &'static str {
    match subcommand {
        Subcommand::Get => "get",
        Subcommand::List => "list",
    }
}

fn print_subcommand_help(subcommand: Subcommand) {
    let usage = match subcommand {
        Subcommand::Get => "props get - print one property\n\nUsage:\n  props get [OPTIONS] FILE KEY [DEFAULT]",
        Subcommand::List => "props list - print all properties\n\nUsage:\n  props list [OPTIONS] FILE...",
    };
    println!("{usage}\n");
    print!("{OPTIONS_HELP}");
}

#[cfg(test)]
mod tests {
    use super::{Invocation, Options, Subcommand, parse_options};
    use propertor::Encoding;
    use std::ffi::OsString;

    fn args(values: &[&str]) -> Vec<OsString> {
        values.iter().map(OsString::from).collect()
    }

    #[test]
    fn parse_get_uses_defaults() {
        let parsed = parse_options(Subcommand::Get, args(&["app.properties", "name"]))
            .expect("parse should succeed");
        let Invocation::Run(options) = parsed else {
            panic!("expected run");
        };

        assert_eq!(options.encoding, Encoding::Latin1);
        assert!(options.required);
        assert!(!options.verbose);
        assert_eq!(options.operands, ["app.properties", "name"]);
    }

    #[test]
    fn parse_list_accepts_flags_between_files() {
        let parsed = parse_options(
            Subcommand::List,
            args(&["a.properties", "--utf8", "-i", "b.properties", "-v"]),
        )
        .expect("parse should succeed");
        let Invocation::Run(options) = parsed else {
            panic!("expected run");
        };

        assert_eq!(options.encoding, Encoding::Utf8);
        assert!(!options.required);
        assert!(options.verbose);
        assert_eq!(options.operands, ["a.properties", "b.properties"]);
    }

    #[test]
    fn double_dash_ends_option_parsing() {
        let parsed = parse_options(Subcommand::Get, args(&["--", "-file", "--key"]))
            .expect("parse should succeed");
        let Invocation::Run(options) = parsed else {
            panic!("expected run");
        };
        assert_eq!(options.operands, ["-file", "--key"]);
    }

    #[test]
    fn parse_get_requires_key() {
        let err = parse_options(Subcommand::Get, args(&["app.properties"]))
            .expect_err("parse should fail");
        assert_eq!(err, "`get` requires FILE and KEY");
    }

    #[test]
    fn parse_list_requires_file() {
        let err = parse_options(Subcommand::List, args(&[])).expect_err("parse should fail");
        assert_eq!(err, "`list` requires at least one FILE");
    }

    #[test]
    fn parse_rejects_unknown_options() {
        let err = parse_options(Subcommand::List, args(&["--nope", "a.properties"]))
            .expect_err("parse should fail");
        assert_eq!(err, "unknown option `--nope`");
    }

    #[test]
    fn help_short_circuits() {
        let parsed =
            parse_options(Subcommand::List, args(&["--help"])).expect("parse should succeed");
        assert_eq!(parsed, Invocation::Help(Subcommand::List));
    }

    #[test]
    fn options_default_to_required_latin1() {
        let options = Options::new(Subcommand::List);
        assert!(options.required);
        assert_eq!(options.encoding, Encoding::Latin1);
    }
}
