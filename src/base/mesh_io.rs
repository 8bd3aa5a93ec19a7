use super::regions::{read_json_file, write_json_file};
use super::{CellRegions, FacetRegions};
use crate::StrError;
use gemlab::mesh::Mesh;
use gemlab::shapes::GeoKind;
use std::path::Path;

/// Holds the mesh and the two region files describing the dam
///
/// The files are located in a directory and share a filename stem:
///
/// * `{stem}.json` or `{stem}.msh` -- the mesh (gemlab JSON layout or gemlab text format)
/// * `{stem}_physical_region.json` -- the subdomain tag of each cell
/// * `{stem}_facet_region.json` -- the tagged boundary facets
#[derive(Clone, Debug)]
pub struct DamInput {
    pub mesh: Mesh,
    pub cells: CellRegions,
    pub facets: FacetRegions,
}

impl DamInput {
    /// Returns the paths to the mesh, physical region, and facet region files
    pub fn paths(dir: &str, stem: &str) -> (String, String, String) {
        let json = format!("{}/{}.json", dir, stem);
        let msh = format!("{}/{}.msh", dir, stem);
        let mesh = if Path::new(&json).exists() || !Path::new(&msh).exists() {
            json
        } else {
            msh
        };
        (
            mesh,
            format!("{}/{}_physical_region.json", dir, stem),
            format!("{}/{}_facet_region.json", dir, stem),
        )
    }

    /// Reads the three input files
    pub fn read(dir: &str, stem: &str) -> Result<Self, StrError> {
        let (path_mesh, path_cells, path_facets) = DamInput::paths(dir, stem);
        let mesh = if path_mesh.ends_with(".msh") {
            Mesh::from_text_file(&path_mesh)?
        } else {
            read_json_file(&path_mesh).map_err(|_| "cannot read mesh file")?
        };
        let cells = CellRegions::read_json(&path_cells).map_err(|_| "cannot read physical region file")?;
        let facets = FacetRegions::read_json(&path_facets).map_err(|_| "cannot read facet region file")?;
        let input = DamInput { mesh, cells, facets };
        if let Some(msg) = input.validate() {
            println!("ERROR: {}", msg);
            return Err("the input files are inconsistent");
        }
        Ok(input)
    }

    /// Writes the three input files (the mesh is written in JSON format)
    pub fn write(&self, dir: &str, stem: &str) -> Result<(), StrError> {
        let path_mesh = format!("{}/{}.json", dir, stem);
        let path_cells = format!("{}/{}_physical_region.json", dir, stem);
        let path_facets = format!("{}/{}_facet_region.json", dir, stem);
        write_json_file(&self.mesh, &path_mesh)?;
        self.cells.write_json(&path_cells)?;
        self.facets.write_json(&path_facets)?;
        Ok(())
    }

    /// Checks the consistency of mesh and regions
    pub fn validate(&self) -> Option<String> {
        if self.mesh.ndim != 2 {
            return Some(format!("ndim = {} is incorrect; the mesh must be 2D", self.mesh.ndim));
        }
        if self.mesh.cells.is_empty() {
            return Some("the mesh has no cells".to_string());
        }
        let kind = self.mesh.cells[0].kind;
        if kind != GeoKind::Tri3 && kind != GeoKind::Tri6 {
            return Some(format!("cell kind {:?} is not supported; use Tri3 or Tri6", kind));
        }
        if let Some(cell) = self.mesh.cells.iter().find(|c| c.kind != kind) {
            return Some(format!(
                "cell # {} has kind {:?} but all cells must have kind {:?}",
                cell.id, cell.kind, kind
            ));
        }
        let npoint = self.mesh.points.len();
        for cell in &self.mesh.cells {
            if let Some(p) = cell.points.iter().find(|&&p| p >= npoint) {
                return Some(format!("cell # {} refers to non-existent point {}", cell.id, p));
            }
        }
        if let Some(msg) = self.cells.validate(&self.mesh) {
            return Some(msg);
        }
        self.facets.validate(&self.mesh)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
