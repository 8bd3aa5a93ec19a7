use crate::StrError;
use gemlab::mesh::{CellAttribute, Feature, Mesh, PointId};
use gemlab::shapes::GeoKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Holds the subdomain tag of each cell (physical regions)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellRegions {
    /// Tag of each cell; the length equals the number of cells
    pub tags: Vec<usize>,
}

/// Holds a boundary facet (edge) with its tag
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaggedFacet {
    /// Boundary tag
    pub tag: usize,

    /// Kind of facet (Lin2 or Lin3)
    pub kind: GeoKind,

    /// Points of the facet: the two end points first, followed by the middle point of Lin3
    pub points: Vec<PointId>,
}

/// Holds the tagged boundary facets (facet regions)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FacetRegions {
    pub facets: Vec<TaggedFacet>,
}

impl TaggedFacet {
    /// Returns the gemlab feature corresponding to this facet
    pub fn feature(&self) -> Feature {
        Feature {
            kind: self.kind,
            points: self.points.clone(),
        }
    }
}

impl CellRegions {
    /// Allocates a new instance with the same tag for all cells of a mesh
    pub fn uniform(mesh: &Mesh, tag: usize) -> Self {
        CellRegions {
            tags: vec![tag; mesh.cells.len()],
        }
    }

    /// Checks that there is one tag per cell
    pub fn validate(&self, mesh: &Mesh) -> Option<String> {
        if self.tags.len() != mesh.cells.len() {
            return Some(format!(
                "the number of cell tags ({}) must be equal to the number of cells ({})",
                self.tags.len(),
                mesh.cells.len()
            ));
        }
        None
    }

    /// Copies the tags into the attributes of the mesh cells
    pub fn apply(&self, mesh: &mut Mesh) -> Result<(), StrError> {
        if self.tags.len() != mesh.cells.len() {
            return Err("the number of cell tags must be equal to the number of cells");
        }
        for (cell, tag) in mesh.cells.iter_mut().zip(&self.tags) {
            cell.attribute = *tag as CellAttribute;
        }
        Ok(())
    }

    /// Returns the (sorted) set of tags
    pub fn tags(&self) -> Vec<usize> {
        let set: BTreeSet<_> = self.tags.iter().copied().collect();
        set.into_iter().collect()
    }

    /// Reads a JSON file
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        read_json_file(full_path)
    }

    /// Writes a JSON file
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        write_json_file(self, full_path)
    }
}

impl FacetRegions {
    /// Returns the (sorted) set of tags
    pub fn tags(&self) -> Vec<usize> {
        let set: BTreeSet<_> = self.facets.iter().map(|f| f.tag).collect();
        set.into_iter().collect()
    }

    /// Returns all facets with a given tag
    pub fn facets_with_tag(&self, tag: usize) -> Vec<&TaggedFacet> {
        self.facets.iter().filter(|f| f.tag == tag).collect()
    }

    /// Returns the sorted list of (unique) points on the facets with a given tag
    pub fn points_with_tag(&self, tag: usize) -> Vec<PointId> {
        let set: BTreeSet<_> = self
            .facets
            .iter()
            .filter(|f| f.tag == tag)
            .flat_map(|f| f.points.iter().copied())
            .collect();
        set.into_iter().collect()
    }

    /// Checks the facets against the mesh
    ///
    /// The facet kind must be Lin2 for meshes with Tri3 cells and Lin3 for meshes with Tri6 cells.
    pub fn validate(&self, mesh: &Mesh) -> Option<String> {
        let cell_kind = match mesh.cells.first() {
            Some(cell) => cell.kind,
            None => return Some("the mesh has no cells".to_string()),
        };
        let facet_kind = match cell_kind {
            GeoKind::Tri3 => GeoKind::Lin2,
            GeoKind::Tri6 => GeoKind::Lin3,
            _ => return Some(format!("cell kind {:?} is not supported", cell_kind)),
        };
        let npoint = mesh.points.len();
        for (i, facet) in self.facets.iter().enumerate() {
            if facet.kind != facet_kind {
                return Some(format!(
                    "facet # {} has kind {:?} but {:?} is required by {:?} cells",
                    i, facet.kind, facet_kind, cell_kind
                ));
            }
            let nnode = if facet_kind == GeoKind::Lin2 { 2 } else { 3 };
            if facet.points.len() != nnode {
                return Some(format!("facet # {} must have {} points", i, nnode));
            }
            if let Some(p) = facet.points.iter().find(|&&p| p >= npoint) {
                return Some(format!("facet # {} refers to non-existent point {}", i, p));
            }
        }
        None
    }

    /// Reads a JSON file
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        read_json_file(full_path)
    }

    /// Writes a JSON file
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        write_json_file(self, full_path)
    }
}

/// Reads any deserializable structure from a JSON file
pub(crate) fn read_json_file<T, P>(full_path: &P) -> Result<T, StrError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<OsStr> + ?Sized,
{
    let path = Path::new(full_path).to_path_buf();
    let file = File::open(&path).map_err(|_| "file not found")?;
    let reader = BufReader::new(file);
    let data = serde_json::from_reader(reader).map_err(|_| "deserialize failed")?;
    Ok(data)
}

/// Writes any serializable structure to a JSON file (creates the directory if needed)
pub(crate) fn write_json_file<T, P>(data: &T, full_path: &P) -> Result<(), StrError>
where
    T: Serialize,
    P: AsRef<OsStr> + ?Sized,
{
    let path = Path::new(full_path).to_path_buf();
    if let Some(p) = path.parent() {
        fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
    }
    let mut file = File::create(&path).map_err(|_| "cannot create file")?;
    serde_json::to_writer_pretty(&mut file, data).map_err(|_| "cannot write file")?;
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{CellRegions, FacetRegions, TaggedFacet};
    use crate::base::DEFAULT_TEST_DIR;
    use gemlab::mesh::{Cell, Mesh, Point};
    use gemlab::shapes::GeoKind;

    fn two_tri3() -> Mesh {
        // 3------2
        // |    ,'|
        // |  ,'  |
        // |,'    |
        // 0------1
        #[rustfmt::skip]
        let mesh = Mesh {
            ndim: 2,
            points: vec![
                Point { id: 0, marker: 0, coords: vec![0.0, 0.0] },
                Point { id: 1, marker: 0, coords: vec![1.0, 0.0] },
                Point { id: 2, marker: 0, coords: vec![1.0, 1.0] },
                Point { id: 3, marker: 0, coords: vec![0.0, 1.0] },
            ],
            cells: vec![
                Cell { id: 0, attribute: 1, kind: GeoKind::Tri3, points: vec![0, 1, 2] },
                Cell { id: 1, attribute: 1, kind: GeoKind::Tri3, points: vec![0, 2, 3] },
            ],
        };
        mesh
    }

    fn facets() -> FacetRegions {
        FacetRegions {
            facets: vec![
                TaggedFacet { tag: 2, kind: GeoKind::Lin2, points: vec![0, 1] },
                TaggedFacet { tag: 1, kind: GeoKind::Lin2, points: vec![1, 2] },
                TaggedFacet { tag: 2, kind: GeoKind::Lin2, points: vec![3, 0] },
            ],
        }
    }

    #[test]
    fn cell_regions_work() {
        let mut mesh = two_tri3();
        let mut regions = CellRegions::uniform(&mesh, 1);
        assert_eq!(regions.validate(&mesh), None);
        regions.tags[1] = 7;
        regions.apply(&mut mesh).unwrap();
        assert_eq!(mesh.cells[1].attribute, 7);
        assert_eq!(regions.tags(), &[1, 7]);
        regions.tags.push(1);
        assert_eq!(
            regions.validate(&mesh),
            Some("the number of cell tags (3) must be equal to the number of cells (2)".to_string())
        );
        assert_eq!(
            regions.apply(&mut mesh).err(),
            Some("the number of cell tags must be equal to the number of cells")
        );
    }

    #[test]
    fn facet_regions_work() {
        let mesh = two_tri3();
        let regions = facets();
        assert_eq!(regions.validate(&mesh), None);
        assert_eq!(regions.tags(), &[1, 2]);
        assert_eq!(regions.facets_with_tag(2).len(), 2);
        assert_eq!(regions.points_with_tag(2), &[0, 1, 3]);
        assert_eq!(regions.points_with_tag(5).len(), 0);
        let feature = regions.facets[1].feature();
        assert_eq!(feature.kind, GeoKind::Lin2);
        assert_eq!(feature.points, &[1, 2]);
    }

    #[test]
    fn facet_regions_validate_captures_errors() {
        let mesh = two_tri3();
        let mut regions = facets();
        regions.facets[0].kind = GeoKind::Lin3;
        assert_eq!(
            regions.validate(&mesh),
            Some("facet # 0 has kind Lin3 but Lin2 is required by Tri3 cells".to_string())
        );
        regions.facets[0].kind = GeoKind::Lin2;
        regions.facets[2].points = vec![3, 9];
        assert_eq!(
            regions.validate(&mesh),
            Some("facet # 2 refers to non-existent point 9".to_string())
        );
        regions.facets[2].points = vec![3];
        assert_eq!(
            regions.validate(&mesh),
            Some("facet # 2 must have 2 points".to_string())
        );
    }

    #[test]
    fn read_and_write_json_work() {
        let mesh = two_tri3();
        let cells = CellRegions::uniform(&mesh, 1);
        let facets = facets();
        let path_cells = format!("{}/regions_cells.json", DEFAULT_TEST_DIR);
        let path_facets = format!("{}/regions_facets.json", DEFAULT_TEST_DIR);
        cells.write_json(&path_cells).unwrap();
        facets.write_json(&path_facets).unwrap();
        assert_eq!(CellRegions::read_json(&path_cells).unwrap(), cells);
        assert_eq!(FacetRegions::read_json(&path_facets).unwrap(), facets);
        assert_eq!(
            CellRegions::read_json("/tmp/damsim/__nonexistent__.json").err(),
            Some("file not found")
        );
    }
}
