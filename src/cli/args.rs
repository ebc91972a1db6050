//! Command line argument parsing and validation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Android App Bundle to APK converter
#[derive(Parser, Debug)]
#[command(
    name = "aab2apk",
    version,
    about = "Convert Android App Bundles into signed universal APKs",
    long_about = "Converts .aab bundles into installable universal APKs by driving the \
external bundletool jar through a configured Java executable.

Configure the tools once, then convert:
  aab2apk config set-java /usr/bin/java
  aab2apk config set-bundletool ~/tools/bundletool-all.jar
  aab2apk convert --bundle app-release.aab --ks release.jks \\
      --ks-pass s3cret --key-pass k3y --ks-key-alias upload

Exit code 0 = the APK exists in the output directory."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert an .aab bundle into a signed universal APK
    Convert(ConvertArgs),

    /// Manage the persisted tool locations
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Open the output directory in the platform file manager
    OpenOutput,
}

/// Arguments for one conversion
#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// Path to the input .aab bundle
    #[arg(long, value_name = "AAB")]
    pub bundle: PathBuf,

    /// Path to the signing keystore
    #[arg(long, value_name = "KEYSTORE")]
    pub ks: PathBuf,

    /// Keystore password
    #[arg(long, value_name = "PASSWORD")]
    pub ks_pass: String,

    /// Key password
    #[arg(long, value_name = "PASSWORD")]
    pub key_pass: String,

    /// Alias of the signing key inside the keystore
    #[arg(long, value_name = "ALIAS")]
    pub ks_key_alias: String,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Persist the Java executable used to launch bundletool
    SetJava {
        /// Path to the java executable
        path: PathBuf,
    },

    /// Persist the bundletool jar location
    SetBundletool {
        /// Path to bundletool-all.jar
        path: PathBuf,
    },

    /// Print the persisted tool locations
    Show,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
