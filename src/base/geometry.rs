use super::{CellRegions, FacetRegions, TaggedFacet};
use super::{TAG_BASE, TAG_CONCRETE, TAG_CREST, TAG_DOWNSTREAM, TAG_UPSTREAM};
use crate::StrError;
use gemlab::mesh::{Cell, Mesh, Point, PointId};
use gemlab::shapes::GeoKind;
use std::collections::HashMap;

/// Describes the trapezoidal profile of a gravity dam
///
/// ```text
///   (-crest,height)  (0,height)
///           +--------+
///          /         |
///         /          |  upstream face (x = 0)
///        /           |  wetted by the reservoir
///       /            |
///      +-------------+
/// (-base,0)        (0,0)
///        foundation
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamGeometry {
    /// Height of the dam
    pub height: f64,

    /// Width of the base (foundation)
    pub base: f64,

    /// Width of the crest
    pub crest: f64,
}

impl DamGeometry {
    /// Returns the profile of the Ternay dam
    pub fn ternay() -> Self {
        DamGeometry {
            height: 40.0,
            base: 30.0,
            crest: 4.0,
        }
    }

    /// Returns the area of the profile
    pub fn area(&self) -> f64 {
        self.height * (self.base + self.crest) / 2.0
    }

    /// Returns the first moment of area with respect to the y-axis (∫ x dA)
    pub fn first_moment_x(&self) -> f64 {
        let (b, c) = (self.base, self.crest);
        -self.height * (b * b + b * c + c * c) / 6.0
    }

    /// Returns the width of the profile at height y
    fn width(&self, y: f64) -> f64 {
        self.base + (self.crest - self.base) * y / self.height
    }

    /// Generates a structured mesh of the profile
    ///
    /// The profile is divided into `nx × ny` quadrilaterals (`nx` along the width and `ny`
    /// along the height), each one split into two triangles.
    ///
    /// # Input
    ///
    /// * `kind` -- Tri3 or Tri6
    ///
    /// # Output
    ///
    /// Returns `(mesh, cells, facets)` where all cells have the tag `TAG_CONCRETE` and the
    /// facets are tagged with `TAG_UPSTREAM`, `TAG_BASE`, `TAG_DOWNSTREAM`, and `TAG_CREST`.
    pub fn generate(&self, nx: usize, ny: usize, kind: GeoKind) -> Result<(Mesh, CellRegions, FacetRegions), StrError> {
        if nx < 1 || ny < 1 {
            return Err("nx and ny must be ≥ 1");
        }
        if self.height <= 0.0 || self.base <= 0.0 || self.crest < 0.0 {
            return Err("height and base must be > 0 and crest must be ≥ 0");
        }
        let quadratic = match kind {
            GeoKind::Tri3 => false,
            GeoKind::Tri6 => true,
            _ => return Err("kind must be Tri3 or Tri6"),
        };

        // corner points
        let mut points = Vec::new();
        for j in 0..(ny + 1) {
            let y = self.height * (j as f64) / (ny as f64);
            let w = self.width(y);
            for i in 0..(nx + 1) {
                let x = 0.0 - w * (i as f64) / (nx as f64);
                points.push(Point {
                    id: points.len(),
                    marker: 0,
                    coords: vec![x, y],
                });
            }
        }
        let corner = |i: usize, j: usize| -> PointId { j * (nx + 1) + i };

        // middle points are shared between neighbouring triangles
        let mut middle: HashMap<(PointId, PointId), PointId> = HashMap::new();
        let mut middle_of = |a: PointId, b: PointId, points: &mut Vec<Point>| -> PointId {
            let key = if a < b { (a, b) } else { (b, a) };
            *middle.entry(key).or_insert_with(|| {
                let id = points.len();
                let coords = vec![
                    (points[a].coords[0] + points[b].coords[0]) / 2.0,
                    (points[a].coords[1] + points[b].coords[1]) / 2.0,
                ];
                points.push(Point { id, marker: 0, coords });
                id
            })
        };

        // cells
        let mut cells = Vec::new();
        for j in 0..ny {
            for i in 0..nx {
                let (p0, p1, p2, p3) = (corner(i, j), corner(i + 1, j), corner(i + 1, j + 1), corner(i, j + 1));
                for tri in [[p0, p1, p2], [p0, p2, p3]] {
                    let [a, b, c] = counterclockwise(&points, tri);
                    let mut cell_points = vec![a, b, c];
                    if quadratic {
                        let m_ab = middle_of(a, b, &mut points);
                        let m_bc = middle_of(b, c, &mut points);
                        let m_ca = middle_of(c, a, &mut points);
                        cell_points.extend_from_slice(&[m_ab, m_bc, m_ca]);
                    }
                    cells.push(Cell {
                        id: cells.len(),
                        attribute: TAG_CONCRETE,
                        kind,
                        points: cell_points,
                    });
                }
            }
        }

        // boundary facets
        let facet_kind = if quadratic { GeoKind::Lin3 } else { GeoKind::Lin2 };
        let mut facets = Vec::new();
        let mut add_facet = |tag: usize, a: PointId, b: PointId, points: &mut Vec<Point>| {
            let mut facet_points = vec![a, b];
            if quadratic {
                facet_points.push(middle_of(a, b, points));
            }
            facets.push(TaggedFacet {
                tag,
                kind: facet_kind,
                points: facet_points,
            });
        };
        for j in 0..ny {
            add_facet(TAG_UPSTREAM, corner(0, j), corner(0, j + 1), &mut points);
            add_facet(TAG_DOWNSTREAM, corner(nx, j), corner(nx, j + 1), &mut points);
        }
        for i in 0..nx {
            add_facet(TAG_BASE, corner(i, 0), corner(i + 1, 0), &mut points);
            add_facet(TAG_CREST, corner(i, ny), corner(i + 1, ny), &mut points);
        }

        let mesh = Mesh { ndim: 2, points, cells };
        let cells = CellRegions::uniform(&mesh, TAG_CONCRETE);
        Ok((mesh, cells, FacetRegions { facets }))
    }
}

/// Reorders the corners of a triangle such that the area is positive
fn counterclockwise(points: &[Point], tri: [PointId; 3]) -> [PointId; 3] {
    let (a, b, c) = (&points[tri[0]].coords, &points[tri[1]].coords, &points[tri[2]].coords);
    let cross = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
    if cross < 0.0 {
        [tri[0], tri[2], tri[1]]
    } else {
        tri
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::DamGeometry;
    use crate::base::{TAG_BASE, TAG_CREST, TAG_DOWNSTREAM, TAG_UPSTREAM};
    use gemlab::shapes::GeoKind;
    use russell_lab::approx_eq;

    fn signed_area(coords: &[&Vec<f64>]) -> f64 {
        let (a, b, c) = (coords[0], coords[1], coords[2]);
        ((b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])) / 2.0
    }

    #[test]
    fn generate_captures_errors() {
        let geo = DamGeometry::ternay();
        assert_eq!(geo.generate(0, 1, GeoKind::Tri3).err(), Some("nx and ny must be ≥ 1"));
        assert_eq!(geo.generate(1, 1, GeoKind::Qua4).err(), Some("kind must be Tri3 or Tri6"));
        let bad = DamGeometry {
            height: 0.0,
            base: 1.0,
            crest: 1.0,
        };
        assert_eq!(
            bad.generate(1, 1, GeoKind::Tri3).err(),
            Some("height and base must be > 0 and crest must be ≥ 0")
        );
    }

    #[test]
    fn generate_tri3_works() {
        let geo = DamGeometry::ternay();
        let (mesh, cells, facets) = geo.generate(2, 3, GeoKind::Tri3).unwrap();
        assert_eq!(mesh.points.len(), 3 * 4);
        assert_eq!(mesh.cells.len(), 2 * 2 * 3);
        assert_eq!(cells.tags.len(), mesh.cells.len());
        assert_eq!(facets.facets_with_tag(TAG_UPSTREAM).len(), 3);
        assert_eq!(facets.facets_with_tag(TAG_DOWNSTREAM).len(), 3);
        assert_eq!(facets.facets_with_tag(TAG_BASE).len(), 2);
        assert_eq!(facets.facets_with_tag(TAG_CREST).len(), 2);
        assert_eq!(facets.validate(&mesh), None);

        // the areas are positive and sum up to the area of the profile
        let mut total = 0.0;
        for cell in &mesh.cells {
            let coords: Vec<_> = cell.points.iter().map(|p| &mesh.points[*p].coords).collect();
            let area = signed_area(&coords);
            assert!(area > 0.0);
            total += area;
        }
        approx_eq(total, geo.area(), 1e-10);

        // the upstream face is at x = 0 and the base at y = 0
        for p in facets.points_with_tag(TAG_UPSTREAM) {
            assert_eq!(mesh.points[p].coords[0], 0.0);
        }
        for p in facets.points_with_tag(TAG_BASE) {
            assert_eq!(mesh.points[p].coords[1], 0.0);
        }
        approx_eq(mesh.points[11].coords[0], -4.0, 1e-15);
        approx_eq(mesh.points[11].coords[1], 40.0, 1e-15);
    }

    #[test]
    fn generate_tri6_works() {
        let geo = DamGeometry::ternay();
        let (mesh, _, facets) = geo.generate(2, 3, GeoKind::Tri6).unwrap();
        // corners + horizontal edges + vertical edges + diagonals
        let n_corner = 3 * 4;
        let n_middle = 2 * 4 + 3 * 3 + 2 * 3;
        assert_eq!(mesh.points.len(), n_corner + n_middle);
        assert_eq!(mesh.cells.len(), 12);
        assert_eq!(facets.validate(&mesh), None);
        assert_eq!(facets.points_with_tag(TAG_BASE).len(), 5);
        for cell in &mesh.cells {
            assert_eq!(cell.points.len(), 6);
            for m in 0..3 {
                let a = &mesh.points[cell.points[m]].coords;
                let b = &mesh.points[cell.points[(m + 1) % 3]].coords;
                let c = &mesh.points[cell.points[3 + m]].coords;
                approx_eq(c[0], (a[0] + b[0]) / 2.0, 1e-14);
                approx_eq(c[1], (a[1] + b[1]) / 2.0, 1e-14);
            }
        }
    }

    #[test]
    fn first_moment_works() {
        let geo = DamGeometry::ternay();
        approx_eq(geo.area(), 680.0, 1e-12);
        approx_eq(geo.first_moment_x(), -40.0 * 1036.0 / 6.0, 1e-10);
        let rectangle = DamGeometry {
            height: 2.0,
            base: 3.0,
            crest: 3.0,
        };
        approx_eq(rectangle.first_moment_x(), -1.5 * 6.0, 1e-14);
    }
}
