//! Lifecycle-specific error types

use thiserror::Error;

/// Errors that can occur during lifecycle sequencing
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Module initialization failed
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// Module teardown failed
    #[error("Shutdown failed: {0}")]
    ShutdownFailed(String),

    /// Hook execution failed
    #[error("Hook execution failed for {module}: {message}")]
    HookFailed {
        /// Name of the module whose hook failed
        module: String,
        /// Error message
        message: String,
    },
}

impl LifecycleError {
    /// Create an initialization failure error
    pub fn init_failed(msg: impl Into<String>) -> Self {
        Self::InitializationFailed(msg.into())
    }

    /// Create a shutdown failure error
    pub fn shutdown_failed(msg: impl Into<String>) -> Self {
        Self::ShutdownFailed(msg.into())
    }

    /// Create a hook failure error
    pub fn hook_failed(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self::HookFailed {
            module: module.into(),
            message: message.into(),
        }
    }
}

/// A specialized Result type for lifecycle operations
pub type Result<T> = std::result::Result<T, LifecycleError>;
