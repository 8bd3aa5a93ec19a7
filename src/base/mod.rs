//! Implements the problem data: parameters, configuration, geometry and regions

mod config;
mod constants;
mod geometry;
mod mesh_io;
mod parameters;
mod regions;
pub use crate::base::config::*;
pub use crate::base::constants::*;
pub use crate::base::geometry::*;
pub use crate::base::mesh_io::*;
pub use crate::base::parameters::*;
pub use crate::base::regions::*;
