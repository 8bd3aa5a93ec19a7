use super::Equations;
use crate::base::{FacetRegions, TaggedFacet};
use crate::StrError;
use gemlab::integ::{self, IntegPointData};
use gemlab::mesh::{CellId, Mesh, PointId};
use gemlab::shapes::{GeoKind, Scratchpad};
use russell_lab::Vector;
use std::collections::HashMap;

/// Holds a cell sharing a corner edge
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeOwner {
    /// Cell sharing the edge
    pub cell_id: CellId,

    /// Corner of the cell opposite to the edge
    pub opposite: PointId,

    /// Middle node of the edge (Tri6 only)
    pub middle: Option<PointId>,
}

/// Maps the corner edges of all triangles to the cells sharing them
///
/// Boundary edges have exactly one owner; interior edges have two.
pub struct EdgeOwners {
    /// Maps the sorted (a, b) corner pair to the cells sharing the edge
    pub map: HashMap<(PointId, PointId), Vec<EdgeOwner>>,
}

impl EdgeOwners {
    /// Allocates a new instance
    pub fn new(mesh: &Mesh) -> Result<Self, StrError> {
        let mut map: HashMap<_, Vec<EdgeOwner>> = HashMap::new();
        for cell in &mesh.cells {
            if cell.points.len() < 3 {
                return Err("cells must be triangles");
            }
            for m in 0..3 {
                let (a, b, c) = (cell.points[m], cell.points[(m + 1) % 3], cell.points[(m + 2) % 3]);
                let key = if a < b { (a, b) } else { (b, a) };
                let owners = map.entry(key).or_default();
                if owners.len() == 2 {
                    return Err("an edge cannot be shared by more than two cells");
                }
                owners.push(EdgeOwner {
                    cell_id: cell.id,
                    opposite: c,
                    middle: cell.points.get(3 + m).copied(),
                });
            }
        }
        Ok(EdgeOwners { map })
    }

    /// Finds the single cell owning the boundary edge (a, b)
    pub fn find(&self, a: PointId, b: PointId) -> Result<&EdgeOwner, StrError> {
        let key = if a < b { (a, b) } else { (b, a) };
        match self.map.get(&key).map(|v| v.as_slice()) {
            Some([owner]) => Ok(owner),
            Some([_, _]) => Err("the facet is shared by two cells and cannot be on the boundary"),
            _ => Err("cannot find a cell owning the facet"),
        }
    }

    /// Checks that a facet lies on the boundary and matches the nodes of its owning cell
    pub fn owner_of(&self, facet: &TaggedFacet) -> Result<&EdgeOwner, StrError> {
        if facet.kind != GeoKind::Lin2 && facet.kind != GeoKind::Lin3 {
            return Err("facets must be Lin2 or Lin3");
        }
        if facet.points.len() != facet.kind.nnode() {
            return Err("the number of points is incompatible with the geometry kind");
        }
        let owner = self.find(facet.points[0], facet.points[1])?;
        match (facet.kind, owner.middle) {
            (GeoKind::Lin2, None) => Ok(owner),
            (GeoKind::Lin3, Some(m)) if m == facet.points[2] => Ok(owner),
            (GeoKind::Lin3, Some(_)) => Err("the middle node of the facet does not match the owning cell"),
            _ => Err("the facet kind is incompatible with the owning cell"),
        }
    }

    /// Checks all facets of the facet regions
    pub fn check_all(&self, regions: &FacetRegions) -> Result<(), StrError> {
        for facet in &regions.facets {
            self.owner_of(facet)?;
        }
        Ok(())
    }
}

/// Implements the integration over a boundary facet (Lin2 or Lin3)
///
/// The outward unit normal is `n = s (-tᵧ, tₓ) / ‖t‖` where `t = dx/dξ` and the sign `s`
/// is chosen such that `n` points away from the owning cell.
pub struct BoundaryFacet {
    /// Boundary tag
    pub tag: usize,

    /// Points of the facet (corners first)
    pub points: Vec<PointId>,

    /// Cell owning the facet
    pub cell_id: CellId,

    /// Local-to-global map of equations (Ux₀, Uy₀, Ux₁, Uy₁, ...)
    pub local_to_global: Vec<usize>,

    /// Scratchpad holding the shape functions and coordinates
    pub pad: Scratchpad,

    /// Integration points
    pub ips: IntegPointData,

    /// Sign (±1) applied to the normal of the scratchpad to obtain the outward normal
    pub normal_sign: f64,
}

impl BoundaryFacet {
    /// Allocates a new instance
    pub fn new(mesh: &Mesh, equations: &Equations, owners: &EdgeOwners, facet: &TaggedFacet) -> Result<Self, StrError> {
        let owner = owners.owner_of(facet)?;
        let local_to_global = equations.local_to_global(&facet.points)?;
        let mut pad = Scratchpad::new(2, facet.kind)?;
        mesh.set_pad(&mut pad, &facet.points);

        // orient the normal away from the opposite corner of the owning cell
        let mut un = Vector::new(2);
        let mut x = Vector::new(2);
        if pad.calc_normal_vector(&mut un, &[0.0])? <= 0.0 {
            return Err("the facet has zero length");
        }
        pad.calc_coords(&mut x, &[0.0])?;
        let c = &mesh.points[owner.opposite].coords;
        let outward = (x[0] - c[0]) * un[0] + (x[1] - c[1]) * un[1];
        let normal_sign = if outward >= 0.0 { 1.0 } else { -1.0 };

        Ok(BoundaryFacet {
            tag: facet.tag,
            points: facet.points.clone(),
            cell_id: owner.cell_id,
            local_to_global,
            pad,
            ips: integ::default_points(facet.kind),
            normal_sign,
        })
    }

    /// Calculates the outward unit normal and the length ratio ‖dx/dξ‖ at ξ
    pub fn calc_normal(&mut self, ksi: &[f64]) -> Result<([f64; 2], f64), StrError> {
        let mut un = Vector::new(2);
        let norm = self.pad.calc_normal_vector(&mut un, ksi)?;
        if norm <= 0.0 {
            return Err("the facet has zero length");
        }
        Ok(([self.normal_sign * un[0], self.normal_sign * un[1]], norm))
    }

    /// Integrates a function along the facet
    ///
    /// The function receives the reference coordinate ξ ∈ [-1, 1], the real coordinates x,
    /// and the outward unit normal n.
    pub fn integrate<F>(&mut self, mut f: F) -> Result<f64, StrError>
    where
        F: FnMut(f64, &[f64; 2], &[f64; 2]) -> f64,
    {
        let mut x = Vector::new(2);
        let mut res = 0.0;
        for ip in self.ips {
            let (n, norm) = self.calc_normal(ip)?;
            self.pad.calc_coords(&mut x, ip)?;
            res += f(ip[0], &[x[0], x[1]], &n) * norm * ip[3];
        }
        Ok(res)
    }

    /// Calculates the local force vector due to a pressure: f = ∫ Nᵀ (-p n) ds
    pub fn pressure_load<F>(&mut self, pressure: F) -> Result<Vector, StrError>
    where
        F: Fn(&[f64; 2]) -> f64,
    {
        let mut x = Vector::new(2);
        let mut p_ips = Vec::with_capacity(self.ips.len());
        for ip in self.ips {
            self.pad.calc_coords(&mut x, ip)?;
            p_ips.push(pressure(&[x[0], x[1]]));
        }
        let s = self.normal_sign;
        let mut load = Vector::new(2 * self.pad.kind.nnode());
        let mut args = integ::CommonArgs::new(&mut self.pad, self.ips);
        integ::vec_02_nv_bry(&mut load, &mut args, |v, p, un, _| {
            v[0] = -p_ips[p] * s * un[0];
            v[1] = -p_ips[p] * s * un[1];
            Ok(())
        })?;
        Ok(load)
    }
}

/// Holds the boundary facets with a given tag
pub struct BoundaryFacets {
    pub tag: usize,
    pub all: Vec<BoundaryFacet>,
}

impl BoundaryFacets {
    /// Allocates a new instance with all facets of the given tag
    pub fn new(
        mesh: &Mesh,
        equations: &Equations,
        owners: &EdgeOwners,
        regions: &FacetRegions,
        tag: usize,
    ) -> Result<Self, StrError> {
        let all = regions
            .facets_with_tag(tag)
            .into_iter()
            .map(|facet| BoundaryFacet::new(mesh, equations, owners, facet))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BoundaryFacets { tag, all })
    }

    /// Returns the total length of the facets
    pub fn length(&mut self) -> Result<f64, StrError> {
        let mut length = 0.0;
        for facet in &mut self.all {
            length += facet.integrate(|_, _, _| 1.0)?;
        }
        Ok(length)
    }

    /// Integrates a function of the coordinates over all facets
    pub fn integrate<F>(&mut self, f: F) -> Result<f64, StrError>
    where
        F: Fn(&[f64; 2]) -> f64,
    {
        let mut res = 0.0;
        for facet in &mut self.all {
            res += facet.integrate(|_, x, _| f(x))?;
        }
        Ok(res)
    }

    /// Adds the pressure loads of all facets to a global vector
    pub fn add_pressure_loads<F>(&mut self, ff_ext: &mut Vector, pressure: F) -> Result<(), StrError>
    where
        F: Fn(&[f64; 2]) -> f64,
    {
        for facet in &mut self.all {
            let load = facet.pressure_load(&pressure)?;
            for l in 0..load.dim() {
                ff_ext[facet.local_to_global[l]] += load[l];
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
