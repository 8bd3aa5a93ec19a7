use super::Equations;
use crate::StrError;
use gemlab::integ::{self, IntegPointData};
use gemlab::mesh::{Cell, CellId, Mesh};
use gemlab::shapes::{GeoKind, Scratchpad};
use russell_lab::{mat_vec_mul, Matrix, Vector};
use russell_tensor::{LinElasticity, Tensor2};

/// Implements a plane-strain linear elastic element (Tri3 or Tri6)
///
/// The local stiffness and body force are computed once on allocation:
///
/// ```text
/// Kₑ = ∫ Bᵀ D B dΩ        fₑ = ∫ Nᵀ b dΩ
/// ```
pub struct ElementSolid {
    /// Cell identification number
    pub cell_id: CellId,

    /// Local-to-global map of equations (Ux₀, Uy₀, Ux₁, Uy₁, ...)
    pub local_to_global: Vec<usize>,

    /// Scratchpad holding the shape functions and coordinates
    pub pad: Scratchpad,

    /// Integration points
    pub ips: IntegPointData,

    /// Plane-strain linear elastic model
    pub model: LinElasticity,

    /// Local stiffness matrix (n_local, n_local)
    pub stiffness: Matrix,

    /// Local body force vector (n_local)
    pub body_force: Vector,
}

impl ElementSolid {
    /// Allocates a new instance and computes the local stiffness and body force
    ///
    /// # Input
    ///
    /// * `elasticity` -- Young's modulus and Poisson's coefficient
    /// * `body` -- the body force vector (force per volume)
    pub fn new(
        mesh: &Mesh,
        equations: &Equations,
        cell: &Cell,
        elasticity: (f64, f64),
        body: [f64; 2],
    ) -> Result<Self, StrError> {
        if cell.kind != GeoKind::Tri3 && cell.kind != GeoKind::Tri6 {
            return Err("ElementSolid requires Tri3 or Tri6 cells");
        }
        if cell.points.len() != cell.kind.nnode() {
            return Err("the number of points is incompatible with the geometry kind");
        }
        let local_to_global = equations.local_to_global(&cell.points)?;
        let mut pad = Scratchpad::new(2, cell.kind)?;
        mesh.set_pad(&mut pad, &cell.points);
        let ips = integ::default_points(cell.kind);
        for ip in ips {
            if pad.calc_jacobian(ip)? <= 0.0 {
                return Err("the determinant of the Jacobian must be positive");
            }
        }
        let n_local = local_to_global.len();
        let mut element = ElementSolid {
            cell_id: cell.id,
            local_to_global,
            pad,
            ips,
            model: LinElasticity::new(elasticity.0, elasticity.1, true, false),
            stiffness: Matrix::new(n_local, n_local),
            body_force: Vector::new(n_local),
        };
        element.calc_stiffness()?;
        element.calc_body_force(body)?;
        Ok(element)
    }

    /// Calculates the local stiffness matrix
    fn calc_stiffness(&mut self) -> Result<(), StrError> {
        let model = &self.model;
        let mut args = integ::CommonArgs::new(&mut self.pad, self.ips);
        integ::mat_10_bdb(&mut self.stiffness, &mut args, |dd, _, _, _| {
            dd.set_tensor(1.0, model.get_modulus());
            Ok(())
        })
    }

    /// Calculates the local body force vector
    fn calc_body_force(&mut self, body: [f64; 2]) -> Result<(), StrError> {
        let mut args = integ::CommonArgs::new(&mut self.pad, self.ips);
        integ::vec_02_nv(&mut self.body_force, &mut args, |b, _, _| {
            b[0] = body[0];
            b[1] = body[1];
            Ok(())
        })
    }

    /// Returns the area of the cell
    pub fn area(&mut self) -> Result<f64, StrError> {
        let mut area = 0.0;
        for ip in self.ips {
            area += self.pad.calc_jacobian(ip)? * ip[3];
        }
        Ok(area)
    }

    /// Returns the real coordinates of a reference point ξ
    pub fn coords_at(&mut self, ksi: &[f64]) -> Result<[f64; 2], StrError> {
        let mut x = Vector::new(2);
        self.pad.calc_coords(&mut x, ksi)?;
        Ok([x[0], x[1]])
    }

    /// Calculates the stress tensor at a reference point ξ
    ///
    /// # Input
    ///
    /// * `uu` -- the global displacement vector
    ///
    /// # Output
    ///
    /// Returns `[σxx, σxy, σyx, σyy]`
    pub fn stress_at(&mut self, ksi: &[f64], uu: &Vector) -> Result<[f64; 4], StrError> {
        self.pad.calc_gradient(ksi)?;
        let g = &self.pad.gradient;
        let (mut exx, mut eyy, mut gxy) = (0.0, 0.0, 0.0);
        for m in 0..self.pad.kind.nnode() {
            let ux = uu[self.local_to_global[2 * m]];
            let uy = uu[self.local_to_global[2 * m + 1]];
            exx += g.get(m, 0) * ux;
            eyy += g.get(m, 1) * uy;
            gxy += g.get(m, 1) * ux + g.get(m, 0) * uy;
        }
        let mut strain = Tensor2::new_sym(true);
        strain.sym_set(0, 0, exx);
        strain.sym_set(1, 1, eyy);
        strain.sym_set(0, 1, gxy / 2.0);
        let mut sigma = Tensor2::new_sym(true);
        self.model.calc_stress(&mut sigma, &strain);
        Ok([sigma.get(0, 0), sigma.get(0, 1), sigma.get(1, 0), sigma.get(1, 1)])
    }

    /// Calculates the displacement at a reference point ξ
    pub fn displacement_at(&mut self, ksi: &[f64], uu: &Vector) -> [f64; 2] {
        (self.pad.fn_interp)(&mut self.pad.interp, ksi);
        let mut u = [0.0, 0.0];
        for m in 0..self.pad.kind.nnode() {
            u[0] += self.pad.interp[m] * uu[self.local_to_global[2 * m]];
            u[1] += self.pad.interp[m] * uu[self.local_to_global[2 * m + 1]];
        }
        u
    }

    /// Adds the internal force Kₑ uₑ to a global vector
    pub fn add_internal_force(&self, ff_int: &mut Vector, uu: &Vector) -> Result<(), StrError> {
        let n_local = self.local_to_global.len();
        let mut u_local = Vector::new(n_local);
        for l in 0..n_local {
            u_local[l] = uu[self.local_to_global[l]];
        }
        let mut f_local = Vector::new(n_local);
        mat_vec_mul(&mut f_local, 1.0, &self.stiffness, &u_local)?;
        for l in 0..n_local {
            ff_int[self.local_to_global[l]] += f_local[l];
        }
        Ok(())
    }
}

/// Holds all solid elements of the mesh
pub struct Elements {
    pub all: Vec<ElementSolid>,
}

impl Elements {
    /// Allocates all elements (one per cell)
    pub fn new(
        mesh: &Mesh,
        equations: &Equations,
        elasticity: (f64, f64),
        body: [f64; 2],
    ) -> Result<Self, StrError> {
        let all = mesh
            .cells
            .iter()
            .map(|cell| ElementSolid::new(mesh, equations, cell, elasticity, body))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Elements { all })
    }

    /// Returns the total area of the mesh
    pub fn area(&mut self) -> Result<f64, StrError> {
        let mut area = 0.0;
        for e in &mut self.all {
            area += e.area()?;
        }
        Ok(area)
    }

    /// Adds the body forces of all elements to a global vector
    pub fn add_body_forces(&self, ff_ext: &mut Vector) {
        for e in &self.all {
            for l in 0..e.local_to_global.len() {
                ff_ext[e.local_to_global[l]] += e.body_force[l];
            }
        }
    }

    /// Returns the global internal force vector K U (unconstrained)
    pub fn internal_force(&self, uu: &Vector) -> Result<Vector, StrError> {
        let mut ff_int = Vector::new(uu.dim());
        for e in &self.all {
            e.add_internal_force(&mut ff_int, uu)?;
        }
        Ok(ff_int)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
