//! Makes available common structures needed to run a dam simulation
//!
//! You may write `use damsim::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{CellRegions, Config, DamGeometry, DamInput, FacetRegions, ParamDam, TaggedFacet};
pub use crate::base::{DEFAULT_OUT_DIR, DEFAULT_TEST_DIR, TAG_BASE, TAG_CREST, TAG_DOWNSTREAM, TAG_UPSTREAM};
pub use crate::fem::{locate_point, BoundaryFacets, EdgeOwners, Elements, EnergyBalance};
pub use crate::fem::{Dof, Equations, Essential, FileIo, LinearSystem, Reactions, StressField};
pub use crate::{DamReport, DamSimulation, StrError};
