//! Command line interface for the AAB to APK converter.
//!
//! The CLI is a thin calling layer: it submits a request to the conversion
//! pipeline and renders the terminal result. All contract checks live in
//! the pipeline itself.

mod args;

pub use args::{Args, Command, ConfigCommand, ConvertArgs};

use crate::convert::{ConversionRequest, ConversionResult, Converter, default_output_dir};
use crate::error::{CliError, Result};
use crate::prefs::{KEY_BUNDLE_TOOL, KEY_JAVA_EXECUTABLE, PreferenceStore};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();

    match args.command {
        Command::Convert(convert_args) => convert(convert_args).await,
        Command::Config(config) => configure(config),
        Command::OpenOutput => open_output(),
    }
}

async fn convert(args: ConvertArgs) -> Result<i32> {
    let prefs = PreferenceStore::open_default()?;
    let output_dir = default_output_dir()
        .ok_or_else(|| anyhow::anyhow!("no per-user documents directory on this platform"))?;

    let request = ConversionRequest {
        bundle_path: args.bundle.to_string_lossy().into_owned(),
        keystore_path: args.ks.to_string_lossy().into_owned(),
        keystore_password: args.ks_pass,
        key_password: args.key_pass,
        key_alias: args.ks_key_alias,
    };

    let converter = Converter::new(prefs, &output_dir);
    match converter.convert(request).await {
        ConversionResult::Success { artifact_name } => {
            println!("✓ Created {} in {}", artifact_name, output_dir.display());
            println!("  (run `aab2apk open-output` to open the folder)");
            Ok(0)
        }
        ConversionResult::Failure { message } => {
            eprintln!("Conversion failed: {}", message.trim_end());
            Ok(1)
        }
    }
}

fn configure(command: ConfigCommand) -> Result<i32> {
    let mut prefs = PreferenceStore::open_default()?;

    match command {
        ConfigCommand::SetJava { path } => {
            prefs.put(KEY_JAVA_EXECUTABLE, &path.to_string_lossy())?;
            println!("✓ Java executable set to {}", path.display());
        }
        ConfigCommand::SetBundletool { path } => {
            prefs.put(KEY_BUNDLE_TOOL, &path.to_string_lossy())?;
            println!("✓ bundletool jar set to {}", path.display());
        }
        ConfigCommand::Show => {
            let show = |value: Option<String>| value.unwrap_or_else(|| "(unset)".to_string());
            println!("java executable: {}", show(prefs.get(KEY_JAVA_EXECUTABLE)));
            println!("bundletool jar:  {}", show(prefs.get(KEY_BUNDLE_TOOL)));
            println!("preferences:     {}", prefs.path().display());
        }
    }

    Ok(0)
}

/// Opens the output directory in the platform file manager.
fn open_output() -> Result<i32> {
    let output_dir = default_output_dir()
        .ok_or_else(|| anyhow::anyhow!("no per-user documents directory on this platform"))?;
    std::fs::create_dir_all(&output_dir)?;

    #[cfg(target_os = "macos")]
    const OPENER: &str = "open";
    #[cfg(target_os = "windows")]
    const OPENER: &str = "explorer";
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    const OPENER: &str = "xdg-open";

    std::process::Command::new(OPENER)
        .arg(&output_dir)
        .spawn()
        .map_err(|e| CliError::ExecutionFailed {
            command: format!("{} {}", OPENER, output_dir.display()),
            reason: e.to_string(),
        })?;

    Ok(0)
}
