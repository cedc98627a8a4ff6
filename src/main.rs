//! mfind-exif reference host
//!
//! Evaluates the EXIF tests and actions of this crate against the files given
//! on the command line. Flags are evaluated per file in command-line order as
//! an implicit AND: the first test that does not match stops that file.
//! Actions run as they are reached and their output is printed once the file
//! is done. A file that passes every test without running an action has its
//! path printed.
//!
//! # Usage
//!
//! ```bash
//! # Files taken with a Canon camera
//! mfind-exif *.jpg --imake canon
//!
//! # Print every Image tag and a hash of the metadata buffer
//! mfind-exif a.jpg --print-tag '*Image*' --print-buffer-hash
//!
//! # Dump all tags (paths go first, --print-tags takes an optional pattern)
//! mfind-exif a.jpg b.jpg --print-tags
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use mfind_exif::{
    Args, Arity, Context, ExifConfig, ExifFindError, FlagKind, FlagSpec, MetadataSource, Registry,
};

type Result<T> = std::result::Result<T, ExifFindError>;

/// One flag occurrence, positioned by its command-line index
#[derive(Debug, Clone)]
struct Invocation {
    spec: &'static FlagSpec,
    index: usize,
    args: Args,
}

fn command() -> Command {
    let cmd = Command::new("mfind-exif")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Filter files by their embedded EXIF metadata")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase diagnostic output (repeat for more)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Read tag aliases from FILE instead of the user config"),
        )
        .arg(
            Arg::new("paths")
                .value_name("PATH")
                .num_args(1..)
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Files to evaluate"),
        );
    Registry::augment_command(cmd)
}

/// Collect the registered flags present in `matches`, in command-line order
fn invocations(matches: &ArgMatches) -> Vec<Invocation> {
    let mut found = Vec::new();
    for spec in Registry::flags() {
        if spec.arity == Arity::Zero {
            if matches.get_flag(spec.name) {
                let index = matches.index_of(spec.name).unwrap_or(usize::MAX);
                found.push(Invocation {
                    spec,
                    index,
                    args: Args::None,
                });
            }
            continue;
        }

        let Some(occurrences) = matches.get_occurrences::<String>(spec.name) else {
            continue;
        };
        let mut indices = matches.indices_of(spec.name).into_iter().flatten();
        for occurrence in occurrences {
            let values: Vec<String> = occurrence.cloned().collect();
            let index = indices.next().unwrap_or(usize::MAX);
            indices.by_ref().take(values.len().saturating_sub(1)).for_each(drop);
            found.push(Invocation {
                spec,
                index,
                args: spec.args_from(&values),
            });
        }
    }
    found.sort_by_key(|invocation| invocation.index);
    found
}

/// Evaluate every invocation against one file; `false` once a test fails
fn evaluate(registry: &Registry, invocations: &[Invocation], ctx: &mut Context) -> bool {
    let mut ran_action = false;
    for invocation in invocations {
        if !registry.invoke(invocation.spec, ctx, invocation.args.clone()) {
            return false;
        }
        ran_action |= invocation.spec.kind == FlagKind::Action;
    }
    if !ran_action {
        let path = ctx.path().display().to_string();
        ctx.push_output(path);
    }
    true
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mfind_exif={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(matches: &ArgMatches) -> Result<()> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ExifConfig::load_from(path)?,
        None => ExifConfig::load()?,
    };
    let verbosity = matches.get_count("verbose").max(config.verbosity);
    init_logging(verbosity);

    let registry = Registry::new(Arc::new(MetadataSource::exif(config.alias_table())));
    let invocations = invocations(matches);
    let paths = matches
        .get_many::<PathBuf>("paths")
        .ok_or_else(|| ExifFindError::InvalidInput("no paths given".to_string()))?;

    for path in paths {
        let mut ctx = Context::new(path.clone()).with_verbosity(verbosity);
        if evaluate(&registry, &invocations, &mut ctx) {
            for entry in ctx.take_buffer() {
                println!("{entry}");
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let matches = command().get_matches();
    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red(), e);
            ExitCode::FAILURE
        }
    }
}
