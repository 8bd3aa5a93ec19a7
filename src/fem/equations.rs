use crate::StrError;
use gemlab::mesh::{Cell, Mesh, PointId};
use serde::{Deserialize, Serialize};

/// Defines the degrees of freedom of the displacement field
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Dof {
    /// Displacement along x
    Ux,

    /// Displacement along y
    Uy,
}

impl Dof {
    /// Returns the index of the component (0 or 1)
    pub fn index(&self) -> usize {
        match self {
            Dof::Ux => 0,
            Dof::Uy => 1,
        }
    }
}

/// Holds the equation numbers of the vector displacement space
///
/// Only points connected to cells have equations. The equations of a point are
/// numbered consecutively as (Ux, Uy), following the order of the point ids.
#[derive(Clone, Debug)]
pub struct Equations {
    /// Holds the equation numbers [Ux, Uy] of each point (None if the point is not used)
    pub all: Vec<Option<[usize; 2]>>,

    /// Total number of equations
    pub n_equation: usize,
}

impl Equations {
    /// Allocates a new instance
    pub fn new(mesh: &Mesh) -> Result<Self, StrError> {
        if mesh.ndim != 2 {
            return Err("the mesh must be 2D");
        }
        let npoint = mesh.points.len();
        let mut used = vec![false; npoint];
        for cell in &mesh.cells {
            for p in &cell.points {
                if *p >= npoint {
                    return Err("cell refers to a non-existent point");
                }
                used[*p] = true;
            }
        }
        let mut all = vec![None; npoint];
        let mut n_equation = 0;
        for p in 0..npoint {
            if used[p] {
                all[p] = Some([n_equation, n_equation + 1]);
                n_equation += 2;
            }
        }
        if n_equation == 0 {
            return Err("there are no equations because the mesh has no cells");
        }
        Ok(Equations { all, n_equation })
    }

    /// Returns the equation number corresponding to a (PointId, Dof) pair
    pub fn eq(&self, point_id: PointId, dof: Dof) -> Result<usize, StrError> {
        match self.all.get(point_id) {
            Some(Some(eqs)) => Ok(eqs[dof.index()]),
            _ => Err("cannot find equation number corresponding to (PointId,DOF)"),
        }
    }

    /// Returns the local-to-global map of a cell or facet: [Ux₀, Uy₀, Ux₁, Uy₁, ...]
    pub fn local_to_global(&self, points: &[PointId]) -> Result<Vec<usize>, StrError> {
        let mut l2g = Vec::with_capacity(2 * points.len());
        for p in points {
            l2g.push(self.eq(*p, Dof::Ux)?);
            l2g.push(self.eq(*p, Dof::Uy)?);
        }
        Ok(l2g)
    }
}

/// Holds the numbering of the cell corners for the continuous P1 space
///
/// The corner (vertex) points are the first three points of each triangle.
#[derive(Clone, Debug)]
pub struct VertexSpace {
    /// Maps PointId to the vertex index (None if the point is not a corner)
    pub index: Vec<Option<usize>>,

    /// Maps the vertex index to PointId
    pub points: Vec<PointId>,
}

impl VertexSpace {
    /// Allocates a new instance
    pub fn new(mesh: &Mesh) -> Result<Self, StrError> {
        let npoint = mesh.points.len();
        let mut is_corner = vec![false; npoint];
        for cell in &mesh.cells {
            if cell.points.len() < 3 {
                return Err("cells must be triangles");
            }
            for p in &cell.points[0..3] {
                if *p >= npoint {
                    return Err("cell refers to a non-existent point");
                }
                is_corner[*p] = true;
            }
        }
        let mut index = vec![None; npoint];
        let mut points = Vec::new();
        for p in 0..npoint {
            if is_corner[p] {
                index[p] = Some(points.len());
                points.push(p);
            }
        }
        Ok(VertexSpace { index, points })
    }

    /// Returns the number of vertices
    pub fn n_vertex(&self) -> usize {
        self.points.len()
    }

    /// Returns the vertex index of a point
    pub fn vertex(&self, point_id: PointId) -> Result<usize, StrError> {
        match self.index.get(point_id) {
            Some(Some(v)) => Ok(*v),
            _ => Err("the point is not a vertex of the mesh"),
        }
    }

    /// Returns the vertex indices of the three corners of a cell
    pub fn cell_vertices(&self, cell: &Cell) -> Result<[usize; 3], StrError> {
        Ok([
            self.vertex(cell.points[0])?,
            self.vertex(cell.points[1])?,
            self.vertex(cell.points[2])?,
        ])
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
