//! Main conversion orchestration.
//!
//! This module provides the [`Converter`] that coordinates preference
//! lookup, command construction, subprocess execution, archive extraction
//! and artifact finalization for one conversion at a time.

use std::io;
use std::path::{Path, PathBuf};

use tokio::sync::{Mutex, watch};

use crate::convert::checksum::file_sha256;
use crate::convert::error::{ConvertError, Result};
use crate::convert::extract::extract_archive;
use crate::convert::invoker::ProcessInvoker;
use crate::convert::layout::OutputLayout;
use crate::convert::request::{ConversionRequest, ToolConfiguration};
use crate::convert::state::{
    ConversionEvent, ConversionResult, ConversionState, transition,
};
use crate::prefs::PreferenceStore;

/// Main conversion orchestrator.
///
/// Submits one [`ConversionRequest`] at a time to the external bundletool
/// jar and turns the run into a terminal [`ConversionResult`]. Conversions
/// are serialized internally: the working files inside the output directory
/// have fixed names, so a second request queues behind the one in flight
/// instead of corrupting its intermediates.
///
/// State transitions are published through a watch channel; the pipeline
/// assumes no particular observer exists.
///
/// # Examples
///
/// ```no_run
/// use aab2apk::convert::{ConversionRequest, Converter};
/// use aab2apk::prefs::PreferenceStore;
///
/// # async fn example() -> aab2apk::Result<()> {
/// let prefs = PreferenceStore::open_default()?;
/// let converter = Converter::new(prefs, "/home/me/Documents");
///
/// let result = converter
///     .convert(ConversionRequest {
///         bundle_path: "app-release.aab".into(),
///         keystore_path: "release.jks".into(),
///         keystore_password: "s3cret".into(),
///         key_password: "k3y".into(),
///         key_alias: "upload".into(),
///     })
///     .await;
/// println!("{:?}", result);
/// # Ok(())
/// # }
/// ```
pub struct Converter {
    prefs: PreferenceStore,
    output_dir: PathBuf,
    invoker: ProcessInvoker,
    state: watch::Sender<ConversionState>,
    gate: Mutex<()>,
}

impl Converter {
    /// Creates a converter reading tool paths from `prefs` and writing all
    /// artifacts into `output_dir`.
    pub fn new(prefs: PreferenceStore, output_dir: impl Into<PathBuf>) -> Self {
        let (state, _) = watch::channel(ConversionState::default());
        Self {
            prefs,
            output_dir: output_dir.into(),
            invoker: ProcessInvoker::new(),
            state,
            gate: Mutex::new(()),
        }
    }

    /// Replaces the subprocess invoker (e.g. to shorten the timeout).
    pub fn with_invoker(mut self, invoker: ProcessInvoker) -> Self {
        self.invoker = invoker;
        self
    }

    /// Subscribes to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<ConversionState> {
        self.state.subscribe()
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> ConversionState {
        self.state.borrow().clone()
    }

    /// Dismisses the displayed outcome, returning the display state to its
    /// resting value. Does not cancel an in-flight subprocess.
    pub fn dismiss(&self) {
        self.apply(ConversionEvent::Dismissed);
    }

    /// Runs one conversion to its terminal result.
    ///
    /// Every failure path is caught at this boundary and converted into
    /// `Failure` with one human-readable message; nothing panics across it.
    pub async fn convert(&self, request: ConversionRequest) -> ConversionResult {
        // Serialize conversions: fixed intermediate names are not safe to
        // share between in-flight runs.
        let _serialized = self.gate.lock().await;

        self.apply(ConversionEvent::Dispatched);
        let result = match self.run_pipeline(&request).await {
            Ok(artifact_name) => ConversionResult::Success { artifact_name },
            Err(e) => ConversionResult::Failure {
                message: e.to_string(),
            },
        };
        self.apply(ConversionEvent::Completed(result.clone()));
        result
    }

    fn apply(&self, event: ConversionEvent) {
        self.state.send_modify(|current| *current = transition(current, event));
    }

    async fn run_pipeline(&self, request: &ConversionRequest) -> Result<String> {
        request.validate()?;

        // Tool paths are read fresh on every conversion
        let tools = ToolConfiguration::load(&self.prefs)?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| {
                ConvertError::Unexpected(format!(
                    "failed to create output directory {}: {}",
                    self.output_dir.display(),
                    e
                ))
            })?;
        let layout = OutputLayout::new(&self.output_dir, &request.bundle_path);

        let argv = build_command(&tools, request, &layout);
        log::info!("Running bundletool build-apks for {}", request.bundle_path);
        log::debug!("Command: {}", redact_passwords(&argv).join(" "));

        let outcome = self.invoker.run(&argv).await?;
        if outcome.exit_code != 0 {
            // Intermediates stay on disk for diagnosis
            log::debug!("bundletool exited with code {}", outcome.exit_code);
            return Err(ConvertError::Process(outcome.stderr));
        }
        if !outcome.stdout.is_empty() {
            log::debug!("bundletool output:\n{}", outcome.stdout);
        }

        extract_archive(&layout.apks_path, &self.output_dir).await?;
        self.finalize(&layout).await?;
        self.cleanup(&layout).await;
        self.report_artifact(&layout).await;

        Ok(layout.artifact_name)
    }

    /// Moves the unpacked universal APK into place under the final name.
    ///
    /// Last writer wins: a pre-existing artifact is deleted first. The
    /// delete and the rename are two separate steps, not one transaction.
    async fn finalize(&self, layout: &OutputLayout) -> Result<()> {
        if tokio::fs::try_exists(&layout.final_apk).await.unwrap_or(false) {
            tokio::fs::remove_file(&layout.final_apk).await.map_err(|e| {
                ConvertError::Finalization(format!(
                    "failed to remove existing {}: {}",
                    layout.final_apk.display(),
                    e
                ))
            })?;
        }
        tokio::fs::rename(&layout.universal_apk, &layout.final_apk)
            .await
            .map_err(|e| {
                ConvertError::Finalization(format!(
                    "failed to move {} into place: {}",
                    layout.universal_apk.display(),
                    e
                ))
            })?;
        Ok(())
    }

    /// Removes the intermediate archive and table-of-contents blob.
    ///
    /// Only runs on the success path; a failed removal downgrades to a
    /// warning since the artifact is already in place.
    async fn cleanup(&self, layout: &OutputLayout) {
        for path in [&layout.apks_path, &layout.toc_path] {
            if let Err(e) = tokio::fs::remove_file(path).await {
                if e.kind() != io::ErrorKind::NotFound {
                    log::warn!("Failed to remove intermediate {}: {}", path.display(), e);
                }
            }
        }
    }

    async fn report_artifact(&self, layout: &OutputLayout) {
        let size = match tokio::fs::metadata(&layout.final_apk).await {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                log::warn!("Failed to stat {}: {}", layout.final_apk.display(), e);
                return;
            }
        };
        match file_sha256(&layout.final_apk).await {
            Ok(digest) => log::info!(
                "✓ Created {} ({} bytes, sha256 {})",
                layout.artifact_name,
                size,
                digest
            ),
            Err(e) => log::warn!("Failed to hash {}: {}", layout.final_apk.display(), e),
        }
    }

    /// Returns the output directory artifacts are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// Builds the bundletool invocation for one request.
///
/// The `pass:` prefix on both password flags is part of the bundletool
/// contract and must be preserved byte-for-byte.
fn build_command(
    tools: &ToolConfiguration,
    request: &ConversionRequest,
    layout: &OutputLayout,
) -> Vec<String> {
    vec![
        tools.java_executable.to_string_lossy().into_owned(),
        "-jar".to_string(),
        tools.bundletool_jar.to_string_lossy().into_owned(),
        "build-apks".to_string(),
        format!("--bundle={}", request.bundle_path),
        format!("--ks={}", request.keystore_path),
        format!("--ks-pass=pass:{}", request.keystore_password),
        format!("--ks-key-alias={}", request.key_alias),
        format!("--key-pass=pass:{}", request.key_password),
        format!("--output={}", layout.apks_path.display()),
        "--mode=universal".to_string(),
    ]
}

/// Masks password values so the command line is safe to log.
fn redact_passwords(argv: &[String]) -> Vec<String> {
    argv.iter()
        .map(|arg| match arg.split_once("=pass:") {
            Some((flag, _)) => format!("{}=pass:***", flag),
            None => arg.clone(),
        })
        .collect()
}
