use super::{Elements, Equations, Essential};
use crate::base::Config;
use crate::StrError;
use russell_lab::{vec_norm, Norm, Vector};
use russell_sparse::{CooMatrix, LinSolver, Sym};

/// Holds variables to solve the global linear system K U = F with prescribed displacements
///
/// The essential boundary conditions are applied symmetrically: the rows and columns of the
/// prescribed equations are replaced by the identity and the known values are lifted to the
/// right-hand side. Thus, for a free equation `i` and a prescribed equation `j`:
///
/// ```text
/// F̄ᵢ = Fᵢ - Σⱼ Kᵢⱼ ūⱼ        F̄ⱼ = ūⱼ
/// ```
pub struct LinearSystem<'a> {
    /// Total number of global equations (total number of DOFs)
    pub n_equation: usize,

    /// Holds the supremum of the number of nonzero values (nnz) in the global matrix
    ///
    /// `nnz_sup = n_prescribed + Σ (n_local × n_local)` because ones are put on the
    /// diagonal of the prescribed equations.
    pub nnz_sup: usize,

    /// Indicates which equations are prescribed (n_equation)
    pub prescribed: Vec<bool>,

    /// Holds the prescribed values (zero at free equations)
    pub values: Vector,

    /// Holds the external force vector before applying the boundary conditions
    pub ff_ext: Vector,

    /// Holds the right-hand side with the boundary conditions applied
    pub ff: Vector,

    /// Holds the global stiffness matrix with the boundary conditions applied
    pub kk: CooMatrix,

    /// Holds the linear solver
    pub solver: LinSolver<'a>,

    /// Holds the solution (displacements)
    pub uu: Vector,
}

impl<'a> LinearSystem<'a> {
    /// Allocates a new instance and assembles the system
    ///
    /// # Input
    ///
    /// * `ff_ext` -- the external forces (body forces plus boundary loads); unconstrained
    pub fn new(
        config: &Config,
        equations: &Equations,
        elements: &Elements,
        essential: &Essential,
        ff_ext: Vector,
    ) -> Result<Self, StrError> {
        let n_equation = equations.n_equation;
        if ff_ext.dim() != n_equation {
            return Err("the dimension of the external force vector must equal the number of equations");
        }
        let (prescribed, values) = essential.prescribed(equations)?;
        let n_prescribed = prescribed.iter().filter(|p| **p).count();
        let nnz_sup = n_prescribed
            + elements.all.iter().fold(0, |acc, e| {
                acc + e.local_to_global.len() * e.local_to_global.len()
            });
        let mut kk = CooMatrix::new(n_equation, n_equation, nnz_sup, Sym::No)?;
        let mut ff = ff_ext.clone();

        // assemble the free-free block and lift the prescribed values
        for e in &elements.all {
            let l2g = &e.local_to_global;
            for l in 0..l2g.len() {
                let i = l2g[l];
                if prescribed[i] {
                    continue;
                }
                for ll in 0..l2g.len() {
                    let j = l2g[ll];
                    let kij = e.stiffness.get(l, ll);
                    if prescribed[j] {
                        ff[i] -= kij * values[j];
                    } else {
                        kk.put(i, j, kij)?;
                    }
                }
            }
        }

        // identity rows for the prescribed equations
        for i in 0..n_equation {
            if prescribed[i] {
                kk.put(i, i, 1.0)?;
                ff[i] = values[i];
            }
        }

        Ok(LinearSystem {
            n_equation,
            nnz_sup,
            prescribed,
            values,
            ff_ext,
            ff,
            kk,
            solver: LinSolver::new(config.lin_sol_genie)?,
            uu: Vector::new(n_equation),
        })
    }

    /// Factorizes the matrix and solves the linear system
    pub fn solve(&mut self, verbose: bool) -> Result<(), StrError> {
        self.solver.actual.factorize(&self.kk, None)?;
        self.solver.actual.solve(&mut self.uu, &self.ff, verbose)?;
        Ok(())
    }

    /// Returns the Euclidean norm of the residual of the constrained system ‖K̄ U - F̄‖₂
    pub fn residual_norm(&self) -> Result<f64, StrError> {
        let mut rr = Vector::new(self.n_equation);
        self.kk.mat_vec_mul(&mut rr, 1.0, &self.uu)?;
        for i in 0..self.n_equation {
            rr[i] -= self.ff[i];
        }
        Ok(vec_norm(&rr, Norm::Euc))
    }

    /// Returns the unconstrained residual K U - F_ext
    ///
    /// The entries of the free equations vanish at the solution; the entries of the
    /// prescribed equations hold the support reactions.
    pub fn internal_minus_external(&self, elements: &Elements) -> Result<Vector, StrError> {
        let mut rr = elements.internal_force(&self.uu)?;
        for i in 0..self.n_equation {
            rr[i] -= self.ff_ext[i];
        }
        Ok(rr)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
