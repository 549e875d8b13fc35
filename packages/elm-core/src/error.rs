//! Typed errors for the renderer-agnostic half of the crate. `elm-web`
//! defines its own `PatchError` alongside, following the same convention.

/// Failures from C2's renderer. Both variants are defensive: the type
/// system already prevents `Empty`/`Concat` from reaching a realized tree
/// in well-formed code, so seeing this means an internal invariant broke,
/// not that the caller passed bad input.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("internal invariant violated: {0}")]
    InvariantViolated(&'static str),
}
