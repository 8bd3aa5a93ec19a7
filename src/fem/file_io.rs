use super::{Dof, Equations, StressField};
use crate::base::CellRegions;
use crate::StrError;
use gemlab::mesh::Mesh;
use gemlab::shapes::GeoKind;
use russell_lab::Vector;
use serde::Serialize;
use std::fmt::Write;
use std::fs::{self, File};
use std::io::Write as IoWrite;

/// Assists in generating output files
///
/// The generated files are:
///
/// * `{out_dir}/{fn_stem}-displacement.vtu` and `.pvd` -- the displacement field on the full mesh
/// * `{out_dir}/{fn_stem}-stress.vtu` and `.pvd` -- the projected stress on the corner points
/// * `{out_dir}/{fn_stem}-summary.json` -- the diagnostics of the simulation
#[derive(Clone, Debug)]
pub struct FileIo {
    /// Defines the output directory
    pub out_dir: String,

    /// Defines the filename stem
    pub fn_stem: String,
}

impl FileIo {
    /// Allocates a new instance and creates the output directory
    pub fn new(out_dir: &str, fn_stem: &str) -> Result<Self, StrError> {
        fs::create_dir_all(out_dir).map_err(|_| "cannot create output directory")?;
        Ok(FileIo {
            out_dir: out_dir.to_string(),
            fn_stem: fn_stem.to_string(),
        })
    }

    /// Generates the path of a VTU file (`field` is "displacement" or "stress")
    pub fn path_vtu(&self, field: &str) -> String {
        format!("{}/{}-{}.vtu", self.out_dir, self.fn_stem, field)
    }

    /// Generates the path of a PVD file (`field` is "displacement" or "stress")
    pub fn path_pvd(&self, field: &str) -> String {
        format!("{}/{}-{}.pvd", self.out_dir, self.fn_stem, field)
    }

    /// Generates the path of the summary file
    pub fn path_summary(&self) -> String {
        format!("{}/{}-summary.json", self.out_dir, self.fn_stem)
    }

    /// Writes the displacement field and the cell tags to a VTU file (and its PVD wrapper)
    pub fn write_displacement(
        &self,
        mesh: &Mesh,
        cells: &CellRegions,
        equations: &Equations,
        uu: &Vector,
    ) -> Result<(), StrError> {
        let npoint = mesh.points.len();
        let ncell = mesh.cells.len();
        if ncell < 1 {
            return Err("there are no cells to write");
        }
        if cells.tags.len() != ncell {
            return Err("the number of cell tags must equal the number of cells");
        }
        let mut buffer = String::new();
        write_header(&mut buffer, npoint, ncell);

        // nodes: coordinates
        begin_points(&mut buffer);
        for point in &mesh.points {
            write!(&mut buffer, "{:?} {:?} 0.0 ", point.coords[0], point.coords[1]).unwrap();
        }
        end_data_array(&mut buffer, "</Points>\n");

        // elements: connectivity, offsets, and types
        let mut connectivity = Vec::with_capacity(ncell);
        let mut vtk_types = Vec::with_capacity(ncell);
        for cell in &mesh.cells {
            let vtk = cell
                .kind
                .vtk_type()
                .ok_or("cannot generate VTU file because VTK cell type is not available")?;
            connectivity.push(cell.points.clone());
            vtk_types.push(vtk);
        }
        write_cells(&mut buffer, &connectivity, &vtk_types);

        // data: points
        write!(&mut buffer, "<PointData Vectors=\"displacement\">\n").unwrap();
        write!(
            &mut buffer,
            "<DataArray type=\"Float64\" Name=\"displacement\" NumberOfComponents=\"3\" format=\"ascii\">\n"
        )
        .unwrap();
        for point in &mesh.points {
            let ux = match equations.eq(point.id, Dof::Ux).ok() {
                Some(eq) => uu[eq],
                None => 0.0,
            };
            let uy = match equations.eq(point.id, Dof::Uy).ok() {
                Some(eq) => uu[eq],
                None => 0.0,
            };
            write!(&mut buffer, "{:?} {:?} 0.0 ", ux, uy).unwrap();
        }
        end_data_array(&mut buffer, "</PointData>\n");

        // data: cells
        write!(&mut buffer, "<CellData Scalars=\"subdomain\">\n").unwrap();
        write!(
            &mut buffer,
            "<DataArray type=\"Int32\" Name=\"subdomain\" NumberOfComponents=\"1\" format=\"ascii\">\n"
        )
        .unwrap();
        for tag in &cells.tags {
            write!(&mut buffer, "{} ", tag).unwrap();
        }
        end_data_array(&mut buffer, "</CellData>\n");

        write_footer(&mut buffer);
        let path = self.path_vtu("displacement");
        write_file(&path, &buffer, "cannot create VTU file", "cannot write VTU file")?;
        self.write_pvd("displacement")
    }

    /// Writes the projected stress tensor to a VTU file (and its PVD wrapper)
    ///
    /// The stress lives on the corner points only; hence the cells are written as Tri3.
    /// The tensor is written with nine components and zero out-of-plane entries.
    pub fn write_stress(&self, mesh: &Mesh, stress: &StressField) -> Result<(), StrError> {
        let npoint = stress.vertices.n_vertex();
        let ncell = mesh.cells.len();
        if ncell < 1 {
            return Err("there are no cells to write");
        }
        let mut buffer = String::new();
        write_header(&mut buffer, npoint, ncell);

        // nodes: coordinates of the corners
        begin_points(&mut buffer);
        for p in &stress.vertices.points {
            let x = &mesh.points[*p].coords;
            write!(&mut buffer, "{:?} {:?} 0.0 ", x[0], x[1]).unwrap();
        }
        end_data_array(&mut buffer, "</Points>\n");

        // elements: linear triangles
        let vtk = GeoKind::Tri3.vtk_type().ok_or("VTK cell type of Tri3 is not available")?;
        let mut connectivity = Vec::with_capacity(ncell);
        for cell in &mesh.cells {
            connectivity.push(stress.vertices.cell_vertices(cell)?.to_vec());
        }
        write_cells(&mut buffer, &connectivity, &vec![vtk; ncell]);

        // data: points
        write!(&mut buffer, "<PointData Tensors=\"stress\">\n").unwrap();
        write!(
            &mut buffer,
            "<DataArray type=\"Float64\" Name=\"stress\" NumberOfComponents=\"9\" format=\"ascii\">\n"
        )
        .unwrap();
        for v in 0..npoint {
            let s = |k: usize| stress.values.get(v, k);
            write!(
                &mut buffer,
                "{:?} {:?} 0.0 {:?} {:?} 0.0 0.0 0.0 0.0 ",
                s(0),
                s(1),
                s(2),
                s(3)
            )
            .unwrap();
        }
        end_data_array(&mut buffer, "</PointData>\n");

        write_footer(&mut buffer);
        let path = self.path_vtu("stress");
        write_file(&path, &buffer, "cannot create VTU file", "cannot write VTU file")?;
        self.write_pvd("stress")
    }

    /// Writes a PVD file referencing a single VTU file
    fn write_pvd(&self, field: &str) -> Result<(), StrError> {
        let mut buffer = String::new();
        write!(&mut buffer, "<?xml version=\"1.0\"?>\n<VTKFile type=\"Collection\" version=\"0.1\" byte_order=\"LittleEndian\">\n<Collection>\n").unwrap();
        write!(
            &mut buffer,
            "<DataSet timestep=\"0\" part=\"0\" file=\"{}-{}.vtu\" />\n",
            self.fn_stem, field
        )
        .unwrap();
        write!(&mut buffer, "</Collection>\n</VTKFile>\n").unwrap();
        let path = self.path_pvd(field);
        write_file(&path, &buffer, "cannot create PVD file", "cannot write PVD file")
    }

    /// Writes the summary (JSON) file
    pub fn write_summary<T>(&self, summary: &T) -> Result<(), StrError>
    where
        T: Serialize,
    {
        let path = self.path_summary();
        let mut file = File::create(&path).map_err(|_| "cannot create file")?;
        serde_json::to_writer_pretty(&mut file, summary).map_err(|_| "cannot write file")?;
        Ok(())
    }
}

fn write_header(buffer: &mut String, npoint: usize, ncell: usize) {
    write!(
        buffer,
        "<?xml version=\"1.0\"?>\n\
         <VTKFile type=\"UnstructuredGrid\" version=\"0.1\" byte_order=\"LittleEndian\">\n\
         <UnstructuredGrid>\n\
         <Piece NumberOfPoints=\"{}\" NumberOfCells=\"{}\">\n",
        npoint, ncell
    )
    .unwrap();
}

fn begin_points(buffer: &mut String) {
    write!(
        buffer,
        "<Points>\n\
         <DataArray type=\"Float64\" NumberOfComponents=\"3\" format=\"ascii\">\n",
    )
    .unwrap();
}

fn end_data_array(buffer: &mut String, closing: &str) {
    write!(buffer, "\n</DataArray>\n{}", closing).unwrap();
}

fn write_cells<T: std::fmt::Display>(buffer: &mut String, connectivity: &[Vec<usize>], vtk_types: &[T]) {
    write!(
        buffer,
        "<Cells>\n\
         <DataArray type=\"Int32\" Name=\"connectivity\" format=\"ascii\">\n"
    )
    .unwrap();
    for points in connectivity {
        for p in points {
            write!(buffer, "{} ", p).unwrap();
        }
    }
    write!(
        buffer,
        "\n</DataArray>\n\
         <DataArray type=\"Int32\" Name=\"offsets\" format=\"ascii\">\n"
    )
    .unwrap();
    let mut offset = 0;
    for points in connectivity {
        offset += points.len();
        write!(buffer, "{} ", offset).unwrap();
    }
    write!(
        buffer,
        "\n</DataArray>\n\
         <DataArray type=\"UInt8\" Name=\"types\" format=\"ascii\">\n"
    )
    .unwrap();
    for vtk in vtk_types {
        write!(buffer, "{} ", vtk).unwrap();
    }
    end_data_array(buffer, "</Cells>\n");
}

fn write_footer(buffer: &mut String) {
    write!(
        buffer,
        "</Piece>\n\
         </UnstructuredGrid>\n\
         </VTKFile>\n"
    )
    .unwrap();
}

fn write_file(path: &str, buffer: &str, err_create: &'static str, err_write: &'static str) -> Result<(), StrError> {
    let mut file = File::create(path).map_err(|_| err_create)?;
    file.write_all(buffer.as_bytes()).map_err(|_| err_write)?;
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::FileIo;
    use crate::base::{DamGeometry, DEFAULT_TEST_DIR};
    use crate::fem::{Elements, Equations, StressField};
    use gemlab::shapes::GeoKind;
    use russell_lab::Vector;
    use russell_sparse::Genie;
    use std::fs;

    #[test]
    fn paths_work() {
        let file_io = FileIo {
            out_dir: "/tmp/out".to_string(),
            fn_stem: "dam".to_string(),
        };
        assert_eq!(file_io.path_vtu("stress"), "/tmp/out/dam-stress.vtu");
        assert_eq!(file_io.path_pvd("displacement"), "/tmp/out/dam-displacement.pvd");
        assert_eq!(file_io.path_summary(), "/tmp/out/dam-summary.json");
    }

    #[test]
    fn write_displacement_works() {
        let (mesh, cells, _) = DamGeometry::ternay().generate(1, 1, GeoKind::Tri3).unwrap();
        let equations = Equations::new(&mesh).unwrap();
        let mut uu = Vector::new(equations.n_equation);
        uu[7] = -0.25;
        let file_io = FileIo::new(DEFAULT_TEST_DIR, "test_write_displacement").unwrap();
        file_io.write_displacement(&mesh, &cells, &equations, &uu).unwrap();
        let contents = fs::read_to_string(&file_io.path_vtu("displacement")).map_err(|_| "cannot open file").unwrap();
        assert_eq!(
            contents,
            "<?xml version=\"1.0\"?>\n\
             <VTKFile type=\"UnstructuredGrid\" version=\"0.1\" byte_order=\"LittleEndian\">\n\
             <UnstructuredGrid>\n\
             <Piece NumberOfPoints=\"4\" NumberOfCells=\"2\">\n\
             <Points>\n\
             <DataArray type=\"Float64\" NumberOfComponents=\"3\" format=\"ascii\">\n\
             0.0 0.0 0.0 -30.0 0.0 0.0 0.0 40.0 0.0 -4.0 40.0 0.0 \n\
             </DataArray>\n\
             </Points>\n\
             <Cells>\n\
             <DataArray type=\"Int32\" Name=\"connectivity\" format=\"ascii\">\n\
             0 3 1 0 2 3 \n\
             </DataArray>\n\
             <DataArray type=\"Int32\" Name=\"offsets\" format=\"ascii\">\n\
             3 6 \n\
             </DataArray>\n\
             <DataArray type=\"UInt8\" Name=\"types\" format=\"ascii\">\n\
             5 5 \n\
             </DataArray>\n\
             </Cells>\n\
             <PointData Vectors=\"displacement\">\n\
             <DataArray type=\"Float64\" Name=\"displacement\" NumberOfComponents=\"3\" format=\"ascii\">\n\
             0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 -0.25 0.0 \n\
             </DataArray>\n\
             </PointData>\n\
             <CellData Scalars=\"subdomain\">\n\
             <DataArray type=\"Int32\" Name=\"subdomain\" NumberOfComponents=\"1\" format=\"ascii\">\n\
             1 1 \n\
             </DataArray>\n\
             </CellData>\n\
             </Piece>\n\
             </UnstructuredGrid>\n\
             </VTKFile>\n"
        );
        let pvd = fs::read_to_string(&file_io.path_pvd("displacement")).map_err(|_| "cannot open file").unwrap();
        assert!(pvd.contains("file=\"test_write_displacement-displacement.vtu\""));
    }

    #[test]
    fn write_stress_works() {
        let (mesh, _, _) = DamGeometry::ternay().generate(1, 1, GeoKind::Tri6).unwrap();
        let equations = Equations::new(&mesh).unwrap();
        let mut elements = Elements::new(&mesh, &equations, (1.0, 0.25), [0.0, 0.0]).unwrap();
        let uu = Vector::new(equations.n_equation);
        let stress = StressField::new(&mesh, &mut elements, &uu, Genie::Umfpack, false).unwrap();
        let file_io = FileIo::new(DEFAULT_TEST_DIR, "test_write_stress").unwrap();
        file_io.write_stress(&mesh, &stress).unwrap();
        let contents = fs::read_to_string(&file_io.path_vtu("stress")).map_err(|_| "cannot open file").unwrap();
        assert!(contents.contains("<Piece NumberOfPoints=\"4\" NumberOfCells=\"2\">"));
        assert!(contents.contains("0 3 1 0 2 3 \n"));
        assert!(contents.contains("Name=\"stress\" NumberOfComponents=\"9\""));
        assert!(fs::metadata(&file_io.path_pvd("stress")).is_ok());
    }
}
