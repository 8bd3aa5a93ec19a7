use crate::base::{CellRegions, Config, FacetRegions, ParamDam};
use crate::fem::{locate_point, BoundaryFacets, EdgeOwners, Elements, EnergyBalance, Equations, Essential};
use crate::fem::{FileIo, LinearSystem, Reactions, StressField};
use crate::StrError;
use gemlab::mesh::Mesh;
use gemlab::shapes::GeoKind;
use russell_lab::Vector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Holds the diagnostics of a dam simulation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DamReport {
    /// Number of points of the mesh
    pub n_point: usize,

    /// Number of cells of the mesh
    pub n_cell: usize,

    /// Number of equations (displacement DOFs)
    pub n_equation: usize,

    /// Area of the mesh
    pub area: f64,

    /// Point where the displacement is evaluated
    pub point_displacement: [f64; 2],

    /// Displacement (ux, uy) at `point_displacement`
    pub displacement: [f64; 2],

    /// Point where the projected stress is evaluated
    pub point_stress: [f64; 2],

    /// Projected stress (σxx, σxy, σyx, σyy) at `point_stress`
    pub stress: [f64; 4],

    /// Reactions on the clamped boundary computed from the projected stress
    pub reactions_stress: Reactions,

    /// Reactions on the clamped boundary computed by virtual work
    pub reactions_work: Reactions,

    /// Euclidean norm of the residual of the constrained linear system
    pub residual_norm: f64,

    /// Mechanical energy ½ Fᵀ U computed in different ways
    pub energy: EnergyBalance,
}

impl fmt::Display for DamReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (pu, ps) = (self.point_displacement, self.point_stress);
        write!(f, "number of points    = {}\n", self.n_point)?;
        write!(f, "number of cells     = {}\n", self.n_cell)?;
        write!(f, "number of equations = {}\n", self.n_equation)?;
        write!(f, "area                = {:?}\n", self.area)?;
        write!(f, "displacement at ({:?}, {:?}): {:?}\n", pu[0], pu[1], self.displacement)?;
        write!(f, "stress at ({:?}, {:?}): {:?}\n", ps[0], ps[1], self.stress)?;
        write!(f, "reactions via stress: {}\n", self.reactions_stress)?;
        write!(f, "reactions via work:   {}\n", self.reactions_work)?;
        write!(f, "residual norm ‖K U - F‖ = {:e}\n", self.residual_norm)?;
        write!(f, "energy ½ F·U (inner)    = {:?}\n", self.energy.inner_fu)?;
        write!(f, "energy ½ U·F (inner)    = {:?}\n", self.energy.inner_uf)?;
        write!(f, "energy ½ F·U (dot)      = {:?}\n", self.energy.dot)?;
        write!(f, "energy ½ Wext(u)        = {:?}\n", self.energy.external_work)?;
        Ok(())
    }
}

/// Performs the linear elastic analysis of a gravity dam
///
/// The dam is loaded by its self-weight and by the hydrostatic pressure on the facets
/// tagged with `config.tag_pressure`; the points of the facets tagged with
/// `config.tag_clamped` are clamped.
pub struct DamSimulation<'a> {
    /// Holds the mesh
    pub mesh: &'a Mesh,

    /// Holds the subdomain tag of each cell
    pub cells: &'a CellRegions,

    /// Holds the tagged boundary facets
    pub facets: &'a FacetRegions,

    /// Holds the material and loading parameters
    pub param: &'a ParamDam,

    /// Holds configuration parameters
    pub config: &'a Config,
}

impl<'a> DamSimulation<'a> {
    /// Allocates a new instance and checks the input data
    pub fn new(
        mesh: &'a Mesh,
        cells: &'a CellRegions,
        facets: &'a FacetRegions,
        param: &'a ParamDam,
        config: &'a Config,
    ) -> Result<Self, StrError> {
        if let Some(msg) = param.validate() {
            println!("ERROR: {}", msg);
            return Err("cannot allocate simulation because param.validate() failed");
        }
        if mesh.ndim != 2 {
            return Err("the mesh must be 2D");
        }
        if mesh.cells.is_empty() {
            return Err("the mesh has no cells");
        }
        let kind = mesh.cells[0].kind;
        if kind != GeoKind::Tri3 && kind != GeoKind::Tri6 {
            return Err("all cells must be Tri3 or Tri6");
        }
        if mesh.cells.iter().any(|c| c.kind != kind) {
            return Err("all cells must have the same kind");
        }
        if let Some(msg) = cells.validate(mesh) {
            println!("ERROR: {}", msg);
            return Err("cannot allocate simulation because the cell regions are inconsistent");
        }
        if let Some(msg) = facets.validate(mesh) {
            println!("ERROR: {}", msg);
            return Err("cannot allocate simulation because the facet regions are inconsistent");
        }
        if facets.facets_with_tag(config.tag_clamped).is_empty() {
            return Err("there are no facets with the clamped tag");
        }
        EdgeOwners::new(mesh)?.check_all(facets)?;
        Ok(DamSimulation {
            mesh,
            cells,
            facets,
            param,
            config,
        })
    }

    /// Runs the simulation and returns the diagnostics
    pub fn run(&self) -> Result<DamReport, StrError> {
        let (mesh, param, config) = (self.mesh, self.param, self.config);
        let verbose = config.verbose;

        // elements
        let equations = Equations::new(mesh)?;
        let mut elements = Elements::new(mesh, &equations, (param.young, param.poisson), param.body_force())?;
        if verbose {
            println!("number of equations = {}", equations.n_equation);
        }

        // external forces: self-weight plus water pressure
        let owners = EdgeOwners::new(mesh)?;
        let mut ff_ext = Vector::new(equations.n_equation);
        elements.add_body_forces(&mut ff_ext);
        let mut wetted = BoundaryFacets::new(mesh, &equations, &owners, self.facets, config.tag_pressure)?;
        wetted.add_pressure_loads(&mut ff_ext, |x| param.water_pressure(x[1]))?;

        // essential boundary conditions
        let supports = self.facets.points_with_tag(config.tag_clamped);
        let mut essential = Essential::new();
        essential.clamp(&supports);

        // solve
        let mut lin_sys = LinearSystem::new(config, &equations, &elements, &essential, ff_ext)?;
        if verbose {
            println!("solving the linear system with {:?} (nnz ≤ {})", config.lin_sol_genie, lin_sys.nnz_sup);
        }
        lin_sys.solve(config.verbose_lin_sys)?;
        let residual_norm = lin_sys.residual_norm()?;

        // displacement at a point
        let (index, ksi) = locate_point(&mut elements, &config.point_displacement)?;
        let displacement = elements.all[index].displacement_at(&ksi, &lin_sys.uu);

        // projected stress
        if verbose {
            println!("projecting the stress onto the continuous linear space");
        }
        let stress_field = StressField::new(
            mesh,
            &mut elements,
            &lin_sys.uu,
            config.lin_sol_genie,
            config.verbose_lin_sys,
        )?;
        let (index, ksi) = locate_point(&mut elements, &config.point_stress)?;
        let stress = stress_field.eval(mesh, elements.all[index].cell_id, &ksi)?;

        // reactions, energy, and area
        let mut clamped = BoundaryFacets::new(mesh, &equations, &owners, self.facets, config.tag_clamped)?;
        let reactions_stress = Reactions::via_stress(&stress_field, &mut clamped)?;
        let reactions_work = Reactions::via_work(mesh, &equations, &elements, &lin_sys, &supports)?;
        let energy = EnergyBalance::new(&lin_sys);
        let area = elements.area()?;

        let report = DamReport {
            n_point: mesh.points.len(),
            n_cell: mesh.cells.len(),
            n_equation: equations.n_equation,
            area,
            point_displacement: config.point_displacement,
            displacement,
            point_stress: config.point_stress,
            stress,
            reactions_stress,
            reactions_work,
            residual_norm,
            energy,
        };

        // output files
        if config.write_vtu || config.write_summary {
            let file_io = FileIo::new(&config.out_dir, &config.fn_stem)?;
            if config.write_vtu {
                file_io.write_displacement(mesh, self.cells, &equations, &lin_sys.uu)?;
                file_io.write_stress(mesh, &stress_field)?;
                if verbose {
                    println!("written: {}", file_io.path_pvd("displacement"));
                    println!("written: {}", file_io.path_pvd("stress"));
                }
            }
            if config.write_summary {
                file_io.write_summary(&report)?;
                if verbose {
                    println!("written: {}", file_io.path_summary());
                }
            }
        }
        Ok(report)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::DamSimulation;
    use crate::base::{Config, DamGeometry, ParamDam, TaggedFacet, DEFAULT_TEST_DIR, TAG_UPSTREAM};
    use gemlab::shapes::GeoKind;
    use russell_lab::approx_eq;

    #[test]
    fn new_captures_errors() {
        let (mesh, cells, facets) = DamGeometry::ternay().generate(1, 1, GeoKind::Tri3).unwrap();
        let mut param = ParamDam::default();
        let mut config = Config::new();
        param.poisson = 0.5;
        assert_eq!(
            DamSimulation::new(&mesh, &cells, &facets, &param, &config).err(),
            Some("cannot allocate simulation because param.validate() failed")
        );
        param.poisson = 0.25;
        config.set_tags(10, 1).unwrap();
        assert_eq!(
            DamSimulation::new(&mesh, &cells, &facets, &param, &config).err(),
            Some("there are no facets with the clamped tag")
        );
        let mut wrong = cells.clone();
        wrong.tags.pop();
        config.set_tags(2, 1).unwrap();
        assert_eq!(
            DamSimulation::new(&mesh, &wrong, &facets, &param, &config).err(),
            Some("cannot allocate simulation because the cell regions are inconsistent")
        );
    }

    #[test]
    fn new_rejects_mixed_cell_kinds() {
        let (mut mesh, cells, facets) = DamGeometry::ternay().generate(1, 1, GeoKind::Tri3).unwrap();
        let param = ParamDam::default();
        let config = Config::new();
        let second = mesh.cells.len() - 1;
        mesh.cells[second].kind = GeoKind::Tri6;
        mesh.cells[second].points.extend_from_slice(&[0, 1, 2]);
        assert_eq!(
            DamSimulation::new(&mesh, &cells, &facets, &param, &config).err(),
            Some("all cells must have the same kind")
        );
        mesh.cells[0].kind = GeoKind::Qua4;
        assert_eq!(
            DamSimulation::new(&mesh, &cells, &facets, &param, &config).err(),
            Some("all cells must be Tri3 or Tri6")
        );
    }

    #[test]
    fn new_rejects_interior_facets() {
        let (mesh, cells, mut facets) = DamGeometry::ternay().generate(1, 1, GeoKind::Tri3).unwrap();
        let param = ParamDam::default();
        let config = Config::new();
        facets.facets.push(TaggedFacet {
            tag: TAG_UPSTREAM,
            kind: GeoKind::Lin2,
            points: vec![0, 3],
        });
        assert_eq!(
            DamSimulation::new(&mesh, &cells, &facets, &param, &config).err(),
            Some("the facet is shared by two cells and cannot be on the boundary")
        );
    }

    #[test]
    fn run_works() {
        let geo = DamGeometry::ternay();
        let (mesh, cells, facets) = geo.generate(4, 6, GeoKind::Tri6).unwrap();
        let param = ParamDam::default();
        let mut config = Config::new();
        config
            .set_output(DEFAULT_TEST_DIR, "test_simulation_run")
            .unwrap()
            .set_write_files(false, true)
            .unwrap();
        let sim = DamSimulation::new(&mesh, &cells, &facets, &param, &config).unwrap();
        let report = sim.run().unwrap();
        assert_eq!(report.n_cell, 48);
        approx_eq(report.area, geo.area(), 1e-10);
        assert!(report.residual_norm < 1e-10);

        // the water pushes the crest downstream (-x)
        assert!(report.displacement[0] < 0.0);

        // global equilibrium
        let (gamma_c, gamma_w, h) = (param.rho_concrete * param.gravity, param.rho_water * param.gravity, 40.0);
        approx_eq(report.reactions_work.rx, 0.5 * gamma_w * h * h, 1e-9);
        approx_eq(report.reactions_work.ry, gamma_c * geo.area(), 1e-9);
        approx_eq(
            report.reactions_work.mz,
            gamma_c * geo.first_moment_x() - gamma_w * h * h * h / 6.0,
            1e-7,
        );
        assert!(report.energy.max_discrepancy() < 1e-14);
        assert!(std::fs::metadata(format!("{}/test_simulation_run-summary.json", DEFAULT_TEST_DIR)).is_ok());
    }
}
