use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match wizpack_lib::main().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
