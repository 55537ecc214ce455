// Library crate: exposes testable modules for integration tests.
// GUI-specific modules (app, ui, GL viewport rendering) remain in the
// binary crate.

pub mod asset;
pub mod error;
pub mod export;
pub mod state;
pub mod upload;
pub mod validation;

/// Subset of viewport types needed by asset/export (mesh data, bounds,
/// surface lifecycle). The full viewport (camera, GL renderer) stays in the
/// binary crate.
pub mod viewport {
    pub mod host;
    pub mod mesh;
}
