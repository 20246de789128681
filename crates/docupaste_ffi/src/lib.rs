//! Flutter-facing bindings over `docupaste_core`.

pub mod api;
