use anyhow::Result;
use clap::{Arg, ArgAction, Command};

use sysmon::commands;

fn interval_arg() -> Arg {
    Arg::new("interval")
        .short('i')
        .long("interval")
        .value_name("MS")
        .help("Refresh interval in milliseconds")
        .value_parser(clap::value_parser!(u64).range(1..))
}

fn json_arg(help: &'static str) -> Arg {
    Arg::new("json")
        .long("json")
        .help(help)
        .action(ArgAction::SetTrue)
}

fn build_cli() -> Command {
    Command::new("sysmon")
        .about("Sample host resource metrics: live view or bounded logging")
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('v')
                .short_alias('V')
                .long("version")
                .help("Print version information")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("monitor")
                .about("Live view of CPU, memory, disk, network, temperature and processes")
                .arg(interval_arg())
                .arg(json_arg("Print one JSON snapshot per line instead of the terminal view"))
                .arg(
                    Arg::new("log")
                        .long("log")
                        .help("Also start a bounded logging session to the configured file")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("snapshot")
                .about("Take a single sample and print it")
                .arg(json_arg("Print the snapshot as JSON")),
        )
        .subcommand(
            Command::new("log")
                .about("Log CPU, memory, disk and network usage to a file for a fixed duration")
                .arg(
                    Arg::new("file")
                        .short('f')
                        .long("file")
                        .value_name("PATH")
                        .help("Log file (truncated at start)"),
                )
                .arg(
                    Arg::new("duration")
                        .short('d')
                        .long("duration")
                        .value_name("SECS")
                        .help("Total logging duration in seconds")
                        .value_parser(clap::value_parser!(u64).range(1..)),
                )
                .arg(
                    Arg::new("log-interval")
                        .short('i')
                        .long("interval")
                        .value_name("MS")
                        .help("Time between records in milliseconds")
                        .value_parser(clap::value_parser!(u64).range(1..)),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change stored settings")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("show").about("Print all settings"))
                .subcommand(Command::new("path").about("Print the config file location"))
                .subcommand(Command::new("reset").about("Restore default settings"))
                .subcommand(
                    Command::new("set")
                        .about("Change one setting")
                        .arg(Arg::new("key").required(true).index(1))
                        .arg(Arg::new("value").required(true).index(2)),
                ),
        )
        .subcommand(Command::new("version").about("Shows version information"))
}

fn main() -> Result<()> {
    sysmon::init_logging();

    let matches = build_cli().get_matches();

    if matches.get_flag("version") {
        return commands::version();
    }

    match matches.subcommand() {
        Some(("monitor", sub_matches)) => commands::monitor::execute(sub_matches),
        Some(("snapshot", sub_matches)) => commands::snapshot::execute(sub_matches),
        Some(("log", sub_matches)) => commands::log::execute(sub_matches),
        Some(("config", sub_matches)) => commands::config::execute(sub_matches),
        Some(("version", _)) => commands::version(),
        _ => {
            println!("Welcome to sysmon!");
            println!("Use 'sysmon --help' for more information.");
            Ok(())
        }
    }
}
