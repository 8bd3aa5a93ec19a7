use super::{BoundaryFacets, Dof, Elements, Equations, Essential, LinearSystem, StressField};
use crate::StrError;
use gemlab::mesh::{Mesh, PointId};
use russell_lab::{vec_inner, Vector};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Holds the resultant of the support reactions
///
/// `mz` is the moment about the origin due to the vertical component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Reactions {
    /// Horizontal resultant
    pub rx: f64,

    /// Vertical resultant
    pub ry: f64,

    /// Moment about the origin (z-axis)
    pub mz: f64,
}

impl Reactions {
    /// Computes the reactions by integrating the traction t = σ n of the projected stress
    ///
    /// ```text
    /// Rx = ∫ tₓ ds      Ry = ∫ tᵧ ds      Mz = ∫ x tᵧ ds
    /// ```
    ///
    /// On the base (n = (0, -1)) this gives Rx = -∫ σxy ds and Ry = -∫ σyy ds.
    pub fn via_stress(stress: &StressField, supports: &mut BoundaryFacets) -> Result<Self, StrError> {
        let mut reactions = Reactions::default();
        for facet in &mut supports.all {
            reactions.rx += stress.integrate_on_facet(facet, |_, n, sig| sig[0] * n[0] + sig[1] * n[1])?;
            reactions.ry += stress.integrate_on_facet(facet, |_, n, sig| sig[2] * n[0] + sig[3] * n[1])?;
            reactions.mz += stress.integrate_on_facet(facet, |x, n, sig| x[0] * (sig[2] * n[0] + sig[3] * n[1]))?;
        }
        Ok(reactions)
    }

    /// Computes the reactions by the virtual work of the residual R = K U - F_ext
    ///
    /// The virtual displacement fields are (1, 0), (0, 1), and (0, x) on the support
    /// points and zero elsewhere; hence `Rx = v₁ · R`, `Ry = v₂ · R`, and `Mz = v₃ · R`.
    pub fn via_work(
        mesh: &Mesh,
        equations: &Equations,
        elements: &Elements,
        lin_sys: &LinearSystem,
        supports: &[PointId],
    ) -> Result<Self, StrError> {
        let rr = lin_sys.internal_minus_external(elements)?;
        let virtual_work = |essential: &Essential| -> Result<f64, StrError> {
            let mut vv = Vector::new(equations.n_equation);
            essential.apply(&mut vv, equations)?;
            Ok(vec_inner(&vv, &rr))
        };
        let mut v_x = Essential::new();
        let mut v_y = Essential::new();
        let mut v_m = Essential::new();
        v_x.at(supports, Dof::Ux, 1.0);
        v_y.at(supports, Dof::Uy, 1.0);
        v_m.on(mesh, supports, Dof::Uy, |x| x[0])?;
        Ok(Reactions {
            rx: virtual_work(&v_x)?,
            ry: virtual_work(&v_y)?,
            mz: virtual_work(&v_m)?,
        })
    }
}

impl fmt::Display for Reactions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rx = {:?}, Ry = {:?}, Mz = {:?}", self.rx, self.ry, self.mz)
    }
}

/// Holds the mechanical energy ½ Fᵀ U computed in different ways
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyBalance {
    /// ½ F̄ · U with the constrained right-hand side (inner product of F̄ with U)
    pub inner_fu: f64,

    /// ½ U · F̄ (inner product of U with F̄)
    pub inner_uf: f64,

    /// ½ Σ F̄ᵢ Uᵢ computed with a plain loop over the entries
    pub dot: f64,

    /// ½ F_ext · U with the external forces before applying the boundary conditions
    pub external_work: f64,
}

impl EnergyBalance {
    /// Computes the energies from the solved linear system
    pub fn new(lin_sys: &LinearSystem) -> Self {
        let (ff, uu) = (&lin_sys.ff, &lin_sys.uu);
        EnergyBalance {
            inner_fu: 0.5 * vec_inner(ff, uu),
            inner_uf: 0.5 * vec_inner(uu, ff),
            dot: 0.5 * plain_dot(ff, uu),
            external_work: 0.5 * vec_inner(&lin_sys.ff_ext, uu),
        }
    }

    /// Returns the largest difference between the energies
    pub fn max_discrepancy(&self) -> f64 {
        let all = [self.inner_fu, self.inner_uf, self.dot, self.external_work];
        let max = all.iter().fold(f64::MIN, |acc, e| f64::max(acc, *e));
        let min = all.iter().fold(f64::MAX, |acc, e| f64::min(acc, *e));
        max - min
    }
}

fn plain_dot(a: &Vector, b: &Vector) -> f64 {
    a.as_data().iter().zip(b.as_data()).map(|(x, y)| x * y).sum()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
