use super::{Dof, Equations};
use crate::StrError;
use gemlab::mesh::{Mesh, PointId};
use russell_lab::Vector;
use std::collections::HashMap;
use std::fmt;

/// Holds essential (Dirichlet) boundary conditions on the displacement components
pub struct Essential {
    /// Maps (PointId, Dof) to the prescribed value
    pub all: HashMap<(PointId, Dof), f64>,
}

impl Essential {
    /// Allocates a new instance
    pub fn new() -> Self {
        Essential { all: HashMap::new() }
    }

    /// Sets a constant prescribed value at points
    pub fn at(&mut self, points: &[PointId], dof: Dof, value: f64) -> &mut Self {
        for point_id in points {
            self.all.insert((*point_id, dof), value);
        }
        self
    }

    /// Sets a prescribed value computed from the coordinates of the points
    pub fn on<F>(&mut self, mesh: &Mesh, points: &[PointId], dof: Dof, f: F) -> Result<&mut Self, StrError>
    where
        F: Fn(&[f64]) -> f64,
    {
        for point_id in points {
            let point = mesh.points.get(*point_id).ok_or("cannot find point in the mesh")?;
            self.all.insert((*point_id, dof), f(&point.coords));
        }
        Ok(self)
    }

    /// Clamps the points (Ux = Uy = 0)
    pub fn clamp(&mut self, points: &[PointId]) -> &mut Self {
        self.at(points, Dof::Ux, 0.0).at(points, Dof::Uy, 0.0)
    }

    /// Sets the prescribed entries of a vector; the other entries are unchanged
    pub fn apply(&self, vv: &mut Vector, equations: &Equations) -> Result<(), StrError> {
        if vv.dim() != equations.n_equation {
            return Err("the vector dimension must equal the number of equations");
        }
        for ((point_id, dof), value) in &self.all {
            vv[equations.eq(*point_id, *dof)?] = *value;
        }
        Ok(())
    }

    /// Returns the prescribed flags and the vector of prescribed values (zero elsewhere)
    pub fn prescribed(&self, equations: &Equations) -> Result<(Vec<bool>, Vector), StrError> {
        let mut flags = vec![false; equations.n_equation];
        let mut values = Vector::new(equations.n_equation);
        for ((point_id, dof), value) in &self.all {
            let eq = equations.eq(*point_id, *dof)?;
            flags[eq] = true;
            values[eq] = *value;
        }
        Ok((flags, values))
    }
}

impl fmt::Display for Essential {
    /// Prints a formatted summary of the essential boundary conditions
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Essential boundary conditions\n")?;
        write!(f, "=============================\n")?;
        let mut entries: Vec<_> = self.all.iter().collect();
        entries.sort_by_key(|(key, _)| **key);
        for ((point_id, dof), value) in entries {
            write!(f, "{:?} : {:?} = {:?}\n", point_id, dof, value)?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Essential;
    use crate::base::{DamGeometry, TAG_BASE};
    use crate::fem::{Dof, Equations};
    use gemlab::shapes::GeoKind;
    use russell_lab::Vector;

    #[test]
    fn essential_works() {
        let (mesh, _, facets) = DamGeometry::ternay().generate(1, 1, GeoKind::Tri3).unwrap();
        let mut essential = Essential::new();
        essential.clamp(&facets.points_with_tag(TAG_BASE));
        essential.on(&mesh, &[2, 3], Dof::Uy, |x| x[0]).unwrap();
        assert_eq!(
            format!("{}", essential),
            "Essential boundary conditions\n\
             =============================\n\
             0 : Ux = 0.0\n\
             0 : Uy = 0.0\n\
             1 : Ux = 0.0\n\
             1 : Uy = 0.0\n\
             2 : Uy = 0.0\n\
             3 : Uy = -4.0\n"
        );
        let equations = Equations::new(&mesh).unwrap();
        let (flags, values) = essential.prescribed(&equations).unwrap();
        assert_eq!(flags, &[true, true, true, true, false, true, false, true]);
        assert_eq!(values.as_data(), &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -4.0]);

        // apply keeps the free entries
        let mut vv = Vector::from(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        essential.apply(&mut vv, &equations).unwrap();
        assert_eq!(vv.as_data(), &[0.0, 0.0, 0.0, 0.0, 5.0, 0.0, 7.0, -4.0]);
        let mut wrong = Vector::new(3);
        assert_eq!(
            essential.apply(&mut wrong, &equations).err(),
            Some("the vector dimension must equal the number of equations")
        );
    }

    #[test]
    fn prescribed_captures_errors() {
        let (mesh, _, _) = DamGeometry::ternay().generate(1, 1, GeoKind::Tri3).unwrap();
        let equations = Equations::new(&mesh).unwrap();
        let mut essential = Essential::new();
        essential.at(&[100], Dof::Ux, 0.0);
        assert_eq!(
            essential.prescribed(&equations).err(),
            Some("cannot find equation number corresponding to (PointId,DOF)")
        );
        assert_eq!(
            essential.on(&mesh, &[100], Dof::Ux, |_| 0.0).err(),
            Some("cannot find point in the mesh")
        );
    }
}
