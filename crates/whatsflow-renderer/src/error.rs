//! Error types for the renderer crate.

use thiserror::Error;
use whatsflow_flow::FlowError;
use whatsflow_types::ScreenId;

/// Result type alias using the renderer error type.
pub type Result<T> = std::result::Result<T, RendererError>;

/// Error type for preview session operations.
#[derive(Debug, Error)]
pub enum RendererError {
    /// A navigate action targeted a screen that is not in the document.
    #[error("screen '{0}' does not exist in the flow")]
    UnknownScreen(ScreenId),

    /// A navigate action carried no target screen.
    #[error("navigate action has no target screen")]
    MissingNavigateTarget,

    /// A jump targeted a screen index past the end of the document.
    #[error("screen index {index} out of range ({count} screens)")]
    ScreenIndex { index: usize, count: usize },

    /// A form operation named a field the current screen does not have.
    #[error("screen '{screen}' has no field named '{field}'")]
    UnknownField { screen: ScreenId, field: String },

    /// A form operation does not match the field's component kind.
    #[error("field '{field}' on screen '{screen}' does not take {expected}")]
    WrongFieldKind {
        screen: ScreenId,
        field: String,
        expected: &'static str,
    },

    /// A chip selection would exceed the component's selection limit.
    #[error("'{field}' allows at most {max} selections")]
    SelectionLimit { field: String, max: u32 },

    /// The flow already completed; only reset is allowed.
    #[error("the flow already completed; reset the session to start over")]
    FlowCompleted,

    #[error(transparent)]
    Flow(#[from] FlowError),
}
