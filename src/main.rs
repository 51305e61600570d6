//! localcert entry point

use std::process::ExitCode;

use localcert::cli::{self, Args};
use localcert::CertError;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Diagnostics go to stderr; operator output stays on stdout
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse_lenient();

    match cli::run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            println!("Error: {:#}", err);
            let code = err
                .downcast_ref::<CertError>()
                .map(CertError::exit_code)
                .unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
