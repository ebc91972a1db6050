//! Conversion state machine exposed to the calling layer.
//!
//! All state changes flow through one transition function, so independent
//! partial mutations from multiple call sites cannot race.

/// Terminal outcome of one conversion - exactly one of the two variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionResult {
    /// The conversion produced an installable APK.
    Success {
        /// File name of the final artifact in the output directory.
        artifact_name: String,
    },
    /// The conversion failed.
    Failure {
        /// One human-readable diagnostic message.
        message: String,
    },
}

/// Display phase of the conversion state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionPhase {
    /// Resting state, nothing dispatched yet (or dismissed).
    #[default]
    Init,
    /// A conversion is in flight.
    Loading,
    /// The last conversion succeeded.
    Success,
    /// The last conversion failed.
    Fail,
}

/// Observable state: the current phase plus the last terminal result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConversionState {
    /// Current display phase.
    pub phase: ConversionPhase,
    /// Result of the most recent completed conversion, if any.
    pub last_result: Option<ConversionResult>,
}

/// Events driving the state machine.
#[derive(Debug, Clone)]
pub enum ConversionEvent {
    /// A request was dispatched to the pipeline.
    Dispatched,
    /// The pipeline produced a terminal result.
    Completed(ConversionResult),
    /// The caller dismissed the displayed outcome.
    ///
    /// Dismissal only changes displayed state - it does not cancel an
    /// in-flight subprocess and does not re-run the conversion.
    Dismissed,
}

/// The authoritative transition function.
pub fn transition(state: &ConversionState, event: ConversionEvent) -> ConversionState {
    match event {
        ConversionEvent::Dispatched => ConversionState {
            phase: ConversionPhase::Loading,
            last_result: state.last_result.clone(),
        },
        ConversionEvent::Completed(result) => ConversionState {
            phase: match result {
                ConversionResult::Success { .. } => ConversionPhase::Success,
                ConversionResult::Failure { .. } => ConversionPhase::Fail,
            },
            last_result: Some(result),
        },
        ConversionEvent::Dismissed => ConversionState {
            phase: ConversionPhase::Init,
            last_result: state.last_result.clone(),
        },
    }
}
