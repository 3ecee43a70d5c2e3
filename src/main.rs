use std::process::ExitCode;

use revsize::ui::output;

fn main() -> ExitCode {
    match revsize::cli::run() {
        Ok(status) => status.exit_code(),
        Err(e) => {
            output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
