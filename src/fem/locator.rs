use super::Elements;
use crate::StrError;
use russell_lab::{Matrix, Vector};

/// Tolerance to accept reference coordinates slightly outside the reference triangle
const INSIDE_TOLERANCE: f64 = 1e-8;

/// Maximum number of iterations to compute the reference coordinates
const NIT_MAX: usize = 10;

/// Tolerance on the real coordinates when computing the reference coordinates
const TOL_X: f64 = 1e-10;

/// Finds the element containing a point
///
/// Returns the index of the element in `elements.all` and the reference coordinates ξ
/// of the point. The first element found is returned when the point lies on a shared edge.
pub fn locate_point(elements: &mut Elements, x: &[f64]) -> Result<(usize, [f64; 2]), StrError> {
    if x.len() != 2 {
        return Err("the point must have two coordinates");
    }
    let xx = Vector::from(&x);
    let mut ksi = [0.0; 2];
    for (index, e) in elements.all.iter_mut().enumerate() {
        if !in_bounding_box(&e.pad.xxt, x) {
            continue;
        }
        if e.pad.approximate_ksi(&mut ksi, &xx, NIT_MAX, TOL_X).is_ok() {
            let t = 1.0 - ksi[0] - ksi[1];
            if ksi[0] >= -INSIDE_TOLERANCE && ksi[1] >= -INSIDE_TOLERANCE && t >= -INSIDE_TOLERANCE {
                return Ok((index, ksi));
            }
        }
    }
    Err("cannot find a cell containing the point")
}

/// Checks whether a point is within the bounding box of the nodes (with tolerance)
fn in_bounding_box(xxt: &Matrix, x: &[f64]) -> bool {
    let (_, nnode) = xxt.dims();
    for i in 0..2 {
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for m in 0..nnode {
            min = f64::min(min, xxt.get(i, m));
            max = f64::max(max, xxt.get(i, m));
        }
        let tol = INSIDE_TOLERANCE * f64::max(1.0, max - min);
        if x[i] < min - tol || x[i] > max + tol {
            return false;
        }
    }
    true
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::locate_point;
    use crate::base::DamGeometry;
    use crate::fem::{Elements, Equations};
    use gemlab::shapes::GeoKind;
    use russell_lab::approx_eq;

    #[test]
    fn locate_point_works() {
        for kind in [GeoKind::Tri3, GeoKind::Tri6] {
            let (mesh, _, _) = DamGeometry::ternay().generate(3, 4, kind).unwrap();
            let equations = Equations::new(&mesh).unwrap();
            let mut elements = Elements::new(&mesh, &equations, (1.0, 0.25), [0.0, 0.0]).unwrap();
            for x in [[0.0, 40.0], [-4.0, 0.0], [-4.0, 40.0], [-10.0, 12.3]] {
                let (index, ksi) = locate_point(&mut elements, &x).unwrap();
                let xx = elements.all[index].coords_at(&ksi).unwrap();
                approx_eq(xx[0], x[0], 1e-12);
                approx_eq(xx[1], x[1], 1e-12);
            }
        }
    }

    #[test]
    fn locate_point_captures_errors() {
        let (mesh, _, _) = DamGeometry::ternay().generate(1, 1, GeoKind::Tri3).unwrap();
        let equations = Equations::new(&mesh).unwrap();
        let mut elements = Elements::new(&mesh, &equations, (1.0, 0.25), [0.0, 0.0]).unwrap();
        assert_eq!(
            locate_point(&mut elements, &[1.0, 1.0]).err(),
            Some("cannot find a cell containing the point")
        );
        assert_eq!(
            locate_point(&mut elements, &[1.0]).err(),
            Some("the point must have two coordinates")
        );
        // outside the sloping face but inside the bounding box
        assert_eq!(
            locate_point(&mut elements, &[-29.0, 39.0]).err(),
            Some("cannot find a cell containing the point")
        );
    }
}
