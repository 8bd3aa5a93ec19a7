//! Linear elastic finite element analysis of a gravity dam
//!
//! The dam (Ternay profile by default) is loaded by its self-weight and by the
//! hydrostatic pressure on the upstream face, and clamped on the foundation.
//! After solving, the stresses are projected onto a continuous linear space and
//! the reactions and the mechanical energy are computed by independent routes.
//!
//! Units: lengths in m, forces in MN, stresses in MPa.

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

pub mod base;
pub mod fem;
pub mod prelude;
mod simulation;
pub use crate::simulation::*;
