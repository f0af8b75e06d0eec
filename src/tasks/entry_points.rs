use crate::cmd;
use crate::errors::{Error, Result};
use crate::ui::logging::GlobalLogger;

use ::clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use ::densela_tasks_config::{Settings, YamlRead};
use ::log::Level;
use ::std::error::Error as StdError;
use ::std::fs::File;

fn wrap_result_main<F>(main: F)
where F: FnOnce() -> Result<()>,
{
    main().unwrap_or_else(|e| {
        // errors from before the logger is up still need to be seen
        let report = |msg: String| match log_enabled!(Level::Error) {
            true => error!("{}", msg),
            false => eprintln!("error: {}", msg),
        };

        report(e.to_string());
        let mut source = e.source();
        while let Some(cause) = source {
            report(format!("  caused by: {}", cause));
            source = cause.source();
        }
        ::std::process::exit(1);
    });
}

fn app<'a, 'b>() -> App<'a, 'b> {
    let dim = |name: &'static str, help: &'static str| {
        Arg::with_name(name).required(true).value_name(name).help(help)
    };

    App::new("densela")
        .version(crate_version!())
        .about("Exercises the densela kernels on random matrices.")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .args(&[
            Arg::with_name("config").long("config").short("c")
                .takes_value(true).value_name("FILE")
                .help("settings yaml (threading, workers, precision, seed)"),
            Arg::with_name("workers").long("workers").short("j")
                .takes_value(true).value_name("N")
                .help("worker threads for matrix products; overrides the config"),
            Arg::with_name("log").long("log")
                .takes_value(true).value_name("FILE")
                .help("also write the log to this file"),
            Arg::with_name("verbose").short("v").multiple(true)
                .help("more logging; repeat for per-column trace"),
        ])
        .subcommand(SubCommand::with_name("multiply")
            .about("multiply random matrices serially and on a worker pool")
            .args(&[
                dim("ROWS", "rows of the left operand"),
                dim("INNER", "columns of the left operand and rows of the right"),
                dim("COLS", "columns of the right operand"),
            ]))
        .subcommand(SubCommand::with_name("qr")
            .about("QR-decompose a random matrix and check the factors")
            .args(&[
                dim("ROWS", "rows"),
                dim("COLS", "columns"),
            ]))
        .subcommand(SubCommand::with_name("det")
            .about("determinant of a random square matrix, checked by cofactor expansion for small sizes")
            .args(&[
                dim("N", "size"),
            ]))
}

fn parse_usize(m: &ArgMatches, arg: &'static str) -> Result<usize> {
    let value = m.value_of(arg).unwrap_or_default();
    value.parse().map_err(|source| Error::BadArgument { arg, value: value.to_string(), source })
}

fn init_logger(m: &ArgMatches) -> Result<()> {
    let mut logger = GlobalLogger::default();
    logger.verbosity(m.occurrences_of("verbose"));
    if let Some(path) = m.value_of_os("log") {
        logger.path(path);
    }
    logger.apply()
}

fn resolve_settings(m: &ArgMatches) -> Result<Settings> {
    let mut settings = match m.value_of("config") {
        None => Settings::default(),
        Some(path) => {
            let file = File::open(path).map_err(|source| Error::ReadConfig { path: path.to_string(), source })?;
            Settings::from_reader(file)?
        },
    };
    if m.is_present("workers") {
        settings.workers = Some(parse_usize(m, "workers")?);
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

fn dispatch(m: &ArgMatches) -> Result<()> {
    let settings = resolve_settings(m)?;
    match m.subcommand() {
        ("multiply", Some(sub)) => {
            let dims = (parse_usize(sub, "ROWS")?, parse_usize(sub, "INNER")?, parse_usize(sub, "COLS")?);
            cmd::run_multiply(&settings, dims)?;
        },
        ("qr", Some(sub)) => {
            let dims = (parse_usize(sub, "ROWS")?, parse_usize(sub, "COLS")?);
            cmd::run_qr(&settings, dims)?;
        },
        ("det", Some(sub)) => {
            cmd::run_det(&settings, parse_usize(sub, "N")?)?;
        },
        (name, _) => unreachable!("unknown subcommand {:?}", name),
    }
    Ok(())
}

// -------------------------------------------------------------------------------------

pub fn densela() {
    wrap_result_main(|| {
        let matches = app().get_matches();
        init_logger(&matches)?;
        dispatch(&matches)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::std::io::Write;

    fn run(args: &[&str]) -> Result<()> {
        let matches = app().get_matches_from_safe(args).expect("bad test args");
        dispatch(&matches)
    }

    #[test]
    fn subcommands_run() {
        run(&["densela", "--workers", "2", "multiply", "3", "4", "5"]).unwrap();
        run(&["densela", "qr", "4", "3"]).unwrap();
        run(&["densela", "det", "4"]).unwrap();
    }

    #[test]
    fn bad_number() {
        match run(&["densela", "det", "four"]) {
            Err(Error::BadArgument { arg: "N", .. }) => {},
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn missing_subcommand_is_rejected() {
        assert!(app().get_matches_from_safe(&["densela"]).is_err());
    }

    #[test]
    fn config_file() {
        let path = ::std::env::temp_dir().join(format!("densela-test-config-{}.yaml", ::std::process::id()));
        {
            let mut file = File::create(&path).unwrap();
            writeln!(file, "threading: serial\nworkers: 5\nseed: 7").unwrap();
        }
        let matches = app()
            .get_matches_from_safe(&["densela", "--config", path.to_str().unwrap(), "--workers", "2", "det", "3"])
            .unwrap();
        let settings = resolve_settings(&matches).unwrap();
        ::std::fs::remove_file(&path).unwrap();

        assert_eq!(settings.threading, ::densela_tasks_config::Threading::Serial);
        assert_eq!(settings.seed, Some(7));
        // command line wins
        assert_eq!(settings.workers, Some(2));
    }

    #[test]
    fn missing_config_file() {
        let matches = app()
            .get_matches_from_safe(&["densela", "--config", "/nonexistent/densela.yaml", "det", "3"])
            .unwrap();
        match resolve_settings(&matches) {
            Err(Error::ReadConfig { .. }) => {},
            other => panic!("unexpected: {:?}", other),
        }
    }
}
