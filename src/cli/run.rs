//! Command dispatch.

use anyhow::Result;

use super::args::{Arguments, Command};
use super::exit_status::ExitStatus;
use super::report;
use crate::core::context::{CheckOptions, check_bindings};

pub fn run(Arguments { command }: Arguments) -> Result<ExitStatus> {
    match command {
        Some(Command::Check(cmd)) => {
            let options = CheckOptions {
                dir: cmd.args.dir.clone(),
                verbose: cmd.args.verbose,
            };
            let result = check_bindings(&options)?;

            if cmd.args.json {
                report::print_json(&result)?;
            } else {
                report::print(&result);
            }

            Ok(if result.summary.errors > 0 {
                ExitStatus::Failure
            } else {
                ExitStatus::Success
            })
        }
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
