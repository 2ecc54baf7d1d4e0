use std::process::ExitCode;

fn main() -> ExitCode {
    clerky_cli::run()
}
