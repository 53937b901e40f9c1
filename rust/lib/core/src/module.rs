use axum::Router;

/// A service module that contributes HTTP routes.
///
/// The binary entry point collects every module and merges its routes
/// into a single Router. Modules own their paths; nothing is prefixed.
pub trait Module: Send + Sync {
    /// Module name, used for logging.
    fn name(&self) -> &str;

    /// Return the module's routes, with state already applied.
    fn routes(&self) -> Router;
}
