use damsim::prelude::*;
use gemlab::shapes::GeoKind;
use russell_sparse::Genie;
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "ternay",
    about = "Computes the linear elastic response of the Ternay gravity dam (plane strain)"
)]
struct Options {
    /// Directory with the mesh and region files (generates the mesh if absent)
    #[structopt(long)]
    mesh_dir: Option<String>,

    /// Filename stem of the mesh and region files
    #[structopt(long, default_value = "ternay")]
    mesh_stem: String,

    /// Number of divisions along x of the generated mesh
    #[structopt(long, default_value = "8")]
    nx: usize,

    /// Number of divisions along y of the generated mesh
    #[structopt(long, default_value = "12")]
    ny: usize,

    /// Generates linear triangles (Tri3) instead of quadratic ones (Tri6)
    #[structopt(long)]
    linear: bool,

    /// Output directory
    #[structopt(long, default_value = "/tmp/damsim/results")]
    out_dir: String,

    /// Filename stem of the output files
    #[structopt(long, default_value = "ternay")]
    fn_stem: String,

    /// Linear solver: umfpack or mumps
    #[structopt(long, default_value = "umfpack")]
    genie: String,

    /// Skips the VTU and PVD files
    #[structopt(long)]
    no_vtu: bool,

    /// Shows messages during the simulation
    #[structopt(short, long)]
    verbose: bool,
}

fn main() -> Result<(), StrError> {
    // parse options
    let options = Options::from_args();
    let genie = match options.genie.as_str() {
        "umfpack" => Genie::Umfpack,
        "mumps" => Genie::Mumps,
        _ => return Err("the linear solver must be umfpack or mumps"),
    };

    // mesh and regions
    let (mesh, cells, facets) = match &options.mesh_dir {
        Some(dir) => {
            let input = DamInput::read(dir, &options.mesh_stem)?;
            (input.mesh, input.cells, input.facets)
        }
        None => {
            let kind = if options.linear { GeoKind::Tri3 } else { GeoKind::Tri6 };
            DamGeometry::ternay().generate(options.nx, options.ny, kind)?
        }
    };

    // parameters and configuration
    let param = ParamDam::default();
    let mut config = Config::new();
    config
        .set_lin_sol_genie(genie)?
        .set_verbose(options.verbose, false)?
        .set_output(&options.out_dir, &options.fn_stem)?
        .set_write_files(!options.no_vtu, true)?;
    if options.verbose {
        println!("{:?}", param);
        println!("{}", config);
    }

    // run
    let sim = DamSimulation::new(&mesh, &cells, &facets, &param, &config)?;
    let report = sim.run()?;

    // message
    let path_summary = format!("{}/{}-summary.json", config.out_dir, config.fn_stem);
    let thin_line = format!("{:─^1$}", "", path_summary.len());
    println!("\n\n{}", thin_line);
    print!("{}", report);
    println!("{}", thin_line);
    println!("the summary file is:");
    println!("{}", path_summary);
    println!("{}\n\n", thin_line);
    Ok(())
}
