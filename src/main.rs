use admissions_dashboard::models::{OutputFormat, SelectionConfig};
use admissions_dashboard::report;
use admissions_dashboard::session::Session;
use admissions_dashboard::{Config, Dashboard, SelectionRequest};
use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use std::io;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Command-line values win over the `[selection]` table of the config file.
fn merge_selection(
    configured: Option<&SelectionConfig>,
    matches: &clap::ArgMatches,
) -> (SelectionRequest, String) {
    let configured = configured.cloned().unwrap_or_default();
    let pick = |id: &str, fallback: Option<String>| matches.get_one::<String>(id).cloned().or(fallback);

    let request = SelectionRequest {
        university: pick("university", configured.university),
        track: pick("track", configured.track),
        program: pick("program", configured.program),
    };
    let grade = pick("grade", configured.grade).unwrap_or_default();
    (request, grade)
}

fn main() -> Result<()> {
    init_tracing();

    let matches = Command::new("admissions-dashboard")
        .version("0.1")
        .about("Shows historical and predicted admission results for a university program")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(Arg::new("university").short('u').long("university").value_name("NAME").help("University name"))
        .arg(Arg::new("track").short('t').long("track").value_name("NAME").help("Admission track"))
        .arg(Arg::new("program").short('p').long("program").value_name("NAME").help("Program name"))
        .arg(
            Arg::new("grade")
                .short('g')
                .long("grade")
                .value_name("GRADE")
                .allow_negative_numbers(true)
                .help("Your average school grade, 0.0 up to (not including) 10.0"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .value_parser(["text", "json"])
                .help("Output format (overrides the config file)"),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .action(ArgAction::SetTrue)
                .help("Read widget changes from stdin and re-render after each one"),
        )
        .get_matches();

    let config_file = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("config.toml");

    // Load or create configuration
    let config = if Path::new(config_file).exists() {
        tracing::info!(path = config_file, "loading configuration");
        Config::load_from_file(config_file)?
    } else {
        println!("📝 Creating default configuration file: {}", config_file);
        Config::default().save_to_file(config_file)?;
        println!(
            "⚠️  Please edit {} and point it at the historical and prediction tables, then run the program again.",
            config_file
        );
        return Ok(());
    };

    let format = match matches.get_one::<String>("format") {
        Some(value) => value.parse::<OutputFormat>()?,
        None => config.output_format,
    };

    let dashboard = Dashboard::load(&config)?;
    if dashboard.historical().is_empty() {
        println!("❌ The historical table {} has no usable rows", config.historical_path().display());
        return Ok(());
    }

    let (request, grade_text) = merge_selection(config.selection.as_ref(), &matches);

    if matches.get_flag("interactive") {
        let mut session = Session::new(&dashboard, request, grade_text, format);
        let stdin = io::stdin();
        session.run(stdin.lock(), io::stdout().lock())?;
        return Ok(());
    }

    let view = dashboard.render(&request, &grade_text);
    println!("{}", report::render(&view, format)?);
    Ok(())
}
