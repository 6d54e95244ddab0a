/// The host environment the application runs on.
///
/// The host registers exactly one platform per container, resolvable as `dyn Platform`.
pub trait Platform: Send + Sync + 'static {
    /// Human-readable platform name
    fn name(&self) -> &str;
}
