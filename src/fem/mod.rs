//! Implements the finite element method for the plane-strain dam problem

mod boundary_facet;
mod element_solid;
mod equations;
mod essential;
mod file_io;
mod linear_system;
mod locator;
mod post_processing;
mod stress_field;
pub use crate::fem::boundary_facet::*;
pub use crate::fem::element_solid::*;
pub use crate::fem::equations::*;
pub use crate::fem::essential::*;
pub use crate::fem::file_io::*;
pub use crate::fem::linear_system::*;
pub use crate::fem::locator::*;
pub use crate::fem::post_processing::*;
pub use crate::fem::stress_field::*;
