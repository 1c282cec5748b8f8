use std::process::ExitCode;

fn main() -> ExitCode {
    sellery_cli::run()
}
