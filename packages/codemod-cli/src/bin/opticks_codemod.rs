/**
 * Opticks Codemod CLI
 *
 * Resolves opticks feature toggles across a source tree
 */
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::Path;
use std::process;

use opticks_codemod::version::{version_string, VERSION};
use opticks_codemod::{Codemod, LivenessStrategy};
use opticks_codemod_cli::config::{load_options, OptionOverrides};
use opticks_codemod_cli::driver::{self, OutputMode};
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = Command::new("opticks-codemod")
        .version(VERSION)
        .about("Resolve opticks feature toggles into their winning variant")
        .arg(
            Arg::new("paths")
                .value_name("PATH")
                .num_args(1..)
                .required(true)
                .help("Files, directories or glob patterns to rewrite"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("JSON options file"),
        )
        .arg(
            Arg::new("toggle")
                .short('t')
                .long("toggle")
                .value_name("NAME")
                .help("Toggle to resolve"),
        )
        .arg(
            Arg::new("winner")
                .short('w')
                .long("winner")
                .value_name("LETTER")
                .help("Winning variant: a, b, c, ..."),
        )
        .arg(
            Arg::new("package-name")
                .long("package-name")
                .value_name("NAME")
                .help("Package the toggle function is imported from (default: opticks)"),
        )
        .arg(
            Arg::new("function-name")
                .long("function-name")
                .value_name("NAME")
                .help("Name of the toggle function (default: toggle)"),
        )
        .arg(
            Arg::new("liveness")
                .long("liveness")
                .value_name("STRATEGY")
                .value_parser(["global-name", "lexical-scope"])
                .help("How unused declarations are detected"),
        )
        .arg(
            Arg::new("no-format")
                .long("no-format")
                .action(ArgAction::SetTrue)
                .help("Keep the original layout instead of re-printing"),
        )
        .arg(
            Arg::new("double-quote")
                .long("double-quote")
                .action(ArgAction::SetTrue)
                .help("Print strings with double quotes"),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .action(ArgAction::SetTrue)
                .conflicts_with("stdout")
                .help("Report files that would change without writing them"),
        )
        .arg(
            Arg::new("stdout")
                .long("stdout")
                .action(ArgAction::SetTrue)
                .help("Print results instead of writing files"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v, -vv)"),
        )
        .get_matches();

    init_tracing(matches.get_count("verbose"));

    match run(&matches) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(2);
        }
    }
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn overrides(matches: &ArgMatches) -> anyhow::Result<OptionOverrides> {
    let liveness = matches
        .get_one::<String>("liveness")
        .map(|s| s.parse::<LivenessStrategy>())
        .transpose()
        .map_err(anyhow::Error::msg)?;

    Ok(OptionOverrides {
        toggle: matches.get_one::<String>("toggle").cloned(),
        winner: matches.get_one::<String>("winner").cloned(),
        package_name: matches.get_one::<String>("package-name").cloned(),
        function_name: matches.get_one::<String>("function-name").cloned(),
        liveness,
        no_format: matches.get_flag("no-format"),
        double_quote: matches.get_flag("double-quote"),
    })
}

fn run(matches: &ArgMatches) -> anyhow::Result<i32> {
    tracing::debug!("{}", version_string());
    let config = matches.get_one::<String>("config").map(Path::new);
    let options = load_options(config, overrides(matches)?)?;
    if options.selection()?.is_none() {
        eprintln!("Warning: no toggle or winner configured, files are left untouched");
    }

    let mode = if matches.get_flag("check") {
        OutputMode::Check
    } else if matches.get_flag("stdout") {
        OutputMode::Stdout
    } else {
        OutputMode::Write
    };

    let inputs: Vec<String> = matches
        .get_many::<String>("paths")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let files = driver::collect_files(&inputs)?;

    let codemod = Codemod::new(options);
    let summary = driver::run(&codemod, &files, mode);

    for report in &summary.reports {
        match &report.outcome {
            Ok(outcome) => {
                if let Some(output) = &outcome.output {
                    print!("{}", output);
                } else if outcome.changed {
                    let verb = if mode == OutputMode::Check { "would change" } else { "rewrote" };
                    println!("{}: {}", verb, report.path.display());
                }
            }
            Err(e) => eprintln!("Error: {:#}", e),
        }
    }

    let changed = summary.changed().count();
    let failed = summary.failed().count();
    eprintln!(
        "{} file(s) processed, {} changed, {} failed",
        summary.reports.len(),
        changed,
        failed
    );

    Ok(summary.exit_code(mode))
}
