use damsim::prelude::*;
use gemlab::shapes::GeoKind;
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "ternay_mesh",
    about = "Generates the mesh and region files of the Ternay dam cross-section"
)]
struct Options {
    /// Output directory
    out_dir: String,

    /// Filename stem
    #[structopt(default_value = "ternay")]
    stem: String,

    /// Number of divisions along x
    #[structopt(long, default_value = "8")]
    nx: usize,

    /// Number of divisions along y
    #[structopt(long, default_value = "12")]
    ny: usize,

    /// Generates linear triangles (Tri3) instead of quadratic ones (Tri6)
    #[structopt(long)]
    linear: bool,
}

fn main() -> Result<(), StrError> {
    // parse options
    let options = Options::from_args();

    // generate and write the files
    let kind = if options.linear { GeoKind::Tri3 } else { GeoKind::Tri6 };
    let (mesh, cells, facets) = DamGeometry::ternay().generate(options.nx, options.ny, kind)?;
    let input = DamInput { mesh, cells, facets };
    input.write(&options.out_dir, &options.stem)?;

    // message
    let (path_mesh, path_cells, path_facets) = DamInput::paths(&options.out_dir, &options.stem);
    let thin_line = format!("{:─^1$}", "", path_facets.len());
    println!("\n\n{}", thin_line);
    println!("mesh with {} points and {} cells; the files are:", input.mesh.points.len(), input.mesh.cells.len());
    println!("{}", path_mesh);
    println!("{}", path_cells);
    println!("{}", path_facets);
    println!("{}\n\n", thin_line);
    Ok(())
}
