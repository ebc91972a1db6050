//! AAB to APK conversion pipeline.
//!
//! This module converts an Android App Bundle into an installable universal
//! APK by orchestrating the external bundletool jar.
//!
//! # Overview
//!
//! The pipeline:
//! 1. Validates a [`ConversionRequest`] and reads the [`ToolConfiguration`]
//!    fresh from the preference store
//! 2. Builds the `java -jar bundletool.jar build-apks ...` command
//! 3. Runs it via [`ProcessInvoker`], draining stdout/stderr concurrently
//! 4. Unpacks the resulting `.apks` archive with zip-slip protection
//! 5. Moves the universal APK into place and deletes the intermediates
//! 6. Publishes [`ConversionState`] transitions and returns a terminal
//!    [`ConversionResult`]
//!
//! # Module Organization
//!
//! - [`error`] - Conversion error taxonomy
//! - [`request`] - Request and tool configuration types
//! - [`invoker`] - Subprocess execution with concurrent stream draining
//! - [`extract`] - Archive extraction
//! - [`layout`] - Working paths inside the output directory
//! - [`pipeline`] - The [`Converter`] orchestrator
//! - [`state`] - State machine exposed to the calling layer

pub mod error;
mod checksum;
mod extract;
mod invoker;
mod layout;
mod pipeline;
mod request;
mod state;

pub use error::{ConvertError, Result};
pub use extract::extract_archive;
pub use invoker::{ProcessInvoker, ProcessOutcome, TOOL_RUN_TIMEOUT};
pub use layout::{OutputLayout, default_output_dir};
pub use pipeline::Converter;
pub use request::{ConversionRequest, ToolConfiguration};
pub use state::{
    ConversionEvent, ConversionPhase, ConversionResult, ConversionState, transition,
};
