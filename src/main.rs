//! `tailcfg` - check and inspect utility-CSS configuration files

use clap::Parser;

use tailcfg::cli::args::Cli;
use tailcfg::cli::commands;
use tailcfg::error::ExitCode;
use tailcfg::observability::init_logging;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are reported through the error path too
            let code = if e.use_stderr() {
                ExitCode::USAGE_ERROR
            } else {
                ExitCode::SUCCESS
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_logging(cli.log_settings());

    match commands::dispatch(cli) {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("{}", commands::render_error(&e));
            std::process::exit(e.exit_code());
        }
    }
}
