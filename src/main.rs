//! jet-bundler - native executables and installers with Excelsior JET.
//!
//! Compiles a Java application with the JET toolchain and packages the result, with
//! proper error reporting and exit codes.

use std::process;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let exit_code = match jet_bundler::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            for hint in e.recovery_suggestions() {
                eprintln!("  hint: {hint}");
            }
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
