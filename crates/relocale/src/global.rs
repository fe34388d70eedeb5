//! Process-wide culture context.
//!
//! Applications that want one ambient context call [`initialize`] once at
//! startup and reach it anywhere through [`context`]. Code that prefers
//! explicit wiring can ignore this module and pass an
//! `Arc<CultureContext>` around instead.

use std::sync::{Arc, OnceLock};

use tracing::warn;

use crate::config::CultureConfig;
use crate::context::CultureContext;
use crate::error::LocaleError;

static GLOBAL_CONTEXT: OnceLock<Arc<CultureContext>> = OnceLock::new();

/// Install the global context built from `config`.
///
/// # Errors
///
/// - [`LocaleError::AlreadyInitialized`] if a global context exists.
/// - [`LocaleError::Config`] if `config` fails validation.
pub fn initialize(config: CultureConfig) -> Result<Arc<CultureContext>, LocaleError> {
    if GLOBAL_CONTEXT.get().is_some() {
        return Err(LocaleError::AlreadyInitialized);
    }
    let context = CultureContext::new(config)?;
    GLOBAL_CONTEXT
        .set(Arc::clone(&context))
        .map_err(|_| LocaleError::AlreadyInitialized)?;
    Ok(context)
}

/// Install the global context from `RELOCALE_*` environment variables.
///
/// Invalid variables are logged and fall back to their defaults.
///
/// # Errors
///
/// Same as [`initialize`].
pub fn initialize_from_env() -> Result<Arc<CultureContext>, LocaleError> {
    let parsed = CultureConfig::from_env_with_diagnostics();
    for error in &parsed.errors {
        warn!(%error, "ignoring invalid culture configuration variable");
    }
    initialize(parsed.config)
}

/// The global context.
///
/// # Errors
///
/// [`LocaleError::NotInitialized`] before [`initialize`] succeeds.
pub fn context() -> Result<Arc<CultureContext>, LocaleError> {
    GLOBAL_CONTEXT
        .get()
        .cloned()
        .ok_or(LocaleError::NotInitialized)
}

#[must_use]
pub fn is_initialized() -> bool {
    GLOBAL_CONTEXT.get().is_some()
}
