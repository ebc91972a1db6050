//! aab2apk - Android App Bundle to APK converter.
//!
//! This binary converts .aab bundles into signed, installable universal APKs
//! by driving the external bundletool jar, with proper error handling and
//! artifact verification.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match aab2apk::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
