//! gtd - Read and update GTD items in Org or JSONL files

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = gtd_records::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
