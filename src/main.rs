use std::process::ExitCode;

use yolo_verify::VerifyError;

fn main() -> ExitCode {
    match yolo_verify::run() {
        Ok(()) => ExitCode::SUCCESS,
        // The report has already been printed.
        Err(VerifyError::VerificationFailed { .. }) => ExitCode::from(2),
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(1)
        }
    }
}
