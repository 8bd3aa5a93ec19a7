use super::{BoundaryFacet, Elements, VertexSpace};
use crate::StrError;
use gemlab::integ;
use gemlab::mesh::{Mesh, PointId};
use gemlab::shapes::{GeoKind, Scratchpad};
use russell_lab::{Matrix, Vector};
use russell_sparse::{CooMatrix, Genie, LinSolver, Sym};

/// Holds the stress tensor projected onto the continuous piecewise-linear (P1) space
///
/// The projection solves `M s = b` for each component, where
///
/// ```text
/// Mᵢⱼ = ∫ φᵢ φⱼ dΩ        bᵢ = ∫ φᵢ σ(u) dΩ
/// ```
///
/// and `φ` are the Tri3 shape functions of the cell corners. The integrals use the
/// integration points of the elements and the (straight-sided) corner geometry.
/// The four components are ordered as `[σxx, σxy, σyx, σyy]`.
pub struct StressField {
    /// Numbering of the cell corners
    pub vertices: VertexSpace,

    /// Nodal values (n_vertex, 4)
    pub values: Matrix,
}

/// Returns the barycentric shape functions of a triangle
fn barycentric(ksi: &[f64]) -> [f64; 3] {
    [1.0 - ksi[0] - ksi[1], ksi[0], ksi[1]]
}

impl StressField {
    /// Computes the L2 projection of the stress field
    ///
    /// # Input
    ///
    /// * `uu` -- the global displacement vector
    /// * `genie` -- the linear solver used to solve the mass matrix system
    pub fn new(mesh: &Mesh, elements: &mut Elements, uu: &Vector, genie: Genie, verbose: bool) -> Result<Self, StrError> {
        let vertices = VertexSpace::new(mesh)?;
        let n_vertex = vertices.n_vertex();
        let nnz_sup = 9 * elements.all.len();
        let mut mm = CooMatrix::new(n_vertex, n_vertex, nnz_sup, Sym::No)?;
        let mut bb = vec![Vector::new(n_vertex); 4];
        let mut pad = Scratchpad::new(2, GeoKind::Tri3)?;
        let mut m_local = Matrix::new(3, 3);
        let mut b_local = Vector::new(3);
        for e in &mut elements.all {
            let cell = mesh.cells.get(e.cell_id).ok_or("cannot find cell in the mesh")?;
            let v = vertices.cell_vertices(cell)?;
            let ips = e.ips;
            let sig_ips = ips
                .iter()
                .map(|ip| e.stress_at(ip, uu))
                .collect::<Result<Vec<_>, _>>()?;
            mesh.set_pad(&mut pad, &cell.points[0..3]);
            let mut args = integ::CommonArgs::new(&mut pad, ips);
            integ::mat_01_nsn(&mut m_local, &mut args, |_, _, _| Ok(1.0))?;
            for a in 0..3 {
                for b in 0..3 {
                    mm.put(v[a], v[b], m_local.get(a, b))?;
                }
            }
            for k in 0..4 {
                integ::vec_01_ns(&mut b_local, &mut args, |p, _| Ok(sig_ips[p][k]))?;
                for a in 0..3 {
                    bb[k][v[a]] += b_local[a];
                }
            }
        }

        // solve the four systems with a single factorization
        let mut solver = LinSolver::new(genie)?;
        solver.actual.factorize(&mm, None)?;
        let mut values = Matrix::new(n_vertex, 4);
        let mut x = Vector::new(n_vertex);
        for k in 0..4 {
            solver.actual.solve(&mut x, &bb[k], verbose)?;
            for i in 0..n_vertex {
                values.set(i, k, x[i]);
            }
        }
        Ok(StressField { vertices, values })
    }

    /// Returns the stress components at a corner point
    pub fn at_vertex(&self, point_id: PointId) -> Result<[f64; 4], StrError> {
        let v = self.vertices.vertex(point_id)?;
        Ok([
            self.values.get(v, 0),
            self.values.get(v, 1),
            self.values.get(v, 2),
            self.values.get(v, 3),
        ])
    }

    /// Evaluates the stress components within a cell at the reference coordinates ξ
    pub fn eval(&self, mesh: &Mesh, cell_id: usize, ksi: &[f64]) -> Result<[f64; 4], StrError> {
        let cell = mesh.cells.get(cell_id).ok_or("cannot find cell in the mesh")?;
        let v = self.vertices.cell_vertices(cell)?;
        let phi = barycentric(ksi);
        let mut sig = [0.0; 4];
        for a in 0..3 {
            for k in 0..4 {
                sig[k] += phi[a] * self.values.get(v[a], k);
            }
        }
        Ok(sig)
    }

    /// Integrates a function of the projected stress along a boundary facet
    ///
    /// The stress varies linearly between the two corners of the facet. The function
    /// receives the coordinates x, the outward unit normal n, and the stress components.
    pub fn integrate_on_facet<F>(&self, facet: &mut BoundaryFacet, f: F) -> Result<f64, StrError>
    where
        F: Fn(&[f64; 2], &[f64; 2], &[f64; 4]) -> f64,
    {
        let sig_a = self.at_vertex(facet.points[0])?;
        let sig_b = self.at_vertex(facet.points[1])?;
        facet.integrate(|r, x, n| {
            let (na, nb) = ((1.0 - r) / 2.0, (1.0 + r) / 2.0);
            let mut sig = [0.0; 4];
            for k in 0..4 {
                sig[k] = na * sig_a[k] + nb * sig_b[k];
            }
            f(x, n, &sig)
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
