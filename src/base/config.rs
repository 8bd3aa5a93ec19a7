use super::{DEFAULT_OUT_DIR, TAG_BASE, TAG_UPSTREAM};
use crate::StrError;
use russell_sparse::Genie;
use std::fmt;

/// Holds configuration parameters for running the dam simulation
#[derive(Clone, Debug)]
pub struct Config {
    /// Linear solver type
    pub lin_sol_genie: Genie,

    /// Shows messages during the simulation
    pub verbose: bool,

    /// Shows messages from the linear solver
    pub verbose_lin_sys: bool,

    /// Boundary tag where the displacements are clamped
    pub tag_clamped: usize,

    /// Boundary tag where the water pressure is applied
    pub tag_pressure: usize,

    /// Point where the displacement is evaluated and reported
    pub point_displacement: [f64; 2],

    /// Point where the projected stress is evaluated and reported
    pub point_stress: [f64; 2],

    /// Directory for the output files
    pub out_dir: String,

    /// Filename stem for the output files
    pub fn_stem: String,

    /// Writes the VTU and PVD files for ParaView
    pub write_vtu: bool,

    /// Writes the JSON file with the summary of results
    pub write_summary: bool,
}

impl Config {
    /// Allocates a new instance with the settings of the Ternay dam
    pub fn new() -> Self {
        Config {
            lin_sol_genie: Genie::Umfpack,
            verbose: false,
            verbose_lin_sys: false,
            tag_clamped: TAG_BASE,
            tag_pressure: TAG_UPSTREAM,
            point_displacement: [0.0, 40.0],
            point_stress: [-4.0, 0.0],
            out_dir: DEFAULT_OUT_DIR.to_string(),
            fn_stem: "ternay".to_string(),
            write_vtu: true,
            write_summary: true,
        }
    }

    /// Sets the linear solver
    pub fn set_lin_sol_genie(&mut self, genie: Genie) -> Result<&mut Self, StrError> {
        self.lin_sol_genie = genie;
        Ok(self)
    }

    /// Sets the verbose flags (simulation, linear solver)
    pub fn set_verbose(&mut self, verbose: bool, verbose_lin_sys: bool) -> Result<&mut Self, StrError> {
        self.verbose = verbose;
        self.verbose_lin_sys = verbose_lin_sys;
        Ok(self)
    }

    /// Sets the boundary tags (clamped, pressure)
    pub fn set_tags(&mut self, tag_clamped: usize, tag_pressure: usize) -> Result<&mut Self, StrError> {
        if tag_clamped == tag_pressure {
            return Err("the clamped and pressure tags must be different");
        }
        self.tag_clamped = tag_clamped;
        self.tag_pressure = tag_pressure;
        Ok(self)
    }

    /// Sets the points where the displacement and the stress are reported
    pub fn set_eval_points(&mut self, displacement: [f64; 2], stress: [f64; 2]) -> Result<&mut Self, StrError> {
        if !displacement.iter().chain(stress.iter()).all(|x| x.is_finite()) {
            return Err("the evaluation points must have finite coordinates");
        }
        self.point_displacement = displacement;
        self.point_stress = stress;
        Ok(self)
    }

    /// Sets the output directory and filename stem
    pub fn set_output(&mut self, out_dir: &str, fn_stem: &str) -> Result<&mut Self, StrError> {
        if out_dir.is_empty() {
            return Err("the output directory must not be empty");
        }
        if fn_stem.is_empty() || fn_stem.contains('/') {
            return Err("the filename stem must be non-empty and must not contain '/'");
        }
        self.out_dir = out_dir.to_string();
        self.fn_stem = fn_stem.to_string();
        Ok(self)
    }

    /// Sets the flags for writing the output files (VTU/PVD, summary)
    pub fn set_write_files(&mut self, write_vtu: bool, write_summary: bool) -> Result<&mut Self, StrError> {
        self.write_vtu = write_vtu;
        self.write_summary = write_summary;
        Ok(self)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration data\n")?;
        write!(f, "==================\n")?;
        write!(f, "lin_sol_genie = {:?}\n", self.lin_sol_genie)?;
        write!(f, "tag_clamped = {}\n", self.tag_clamped)?;
        write!(f, "tag_pressure = {}\n", self.tag_pressure)?;
        write!(f, "point_displacement = {:?}\n", self.point_displacement)?;
        write!(f, "point_stress = {:?}\n", self.point_stress)?;
        write!(f, "out_dir = {}\n", self.out_dir)?;
        write!(f, "fn_stem = {}\n", self.fn_stem)?;
        write!(f, "write_vtu = {}\n", self.write_vtu)?;
        write!(f, "write_summary = {}\n", self.write_summary)?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Config;
    use crate::StrError;

    #[test]
    fn new_works() -> Result<(), StrError> {
        let mut config = Config::new();
        config
            .set_verbose(true, false)?
            .set_tags(3, 4)?
            .set_eval_points([1.0, 2.0], [3.0, 4.0])?
            .set_output("/tmp/damsim/test", "column")?
            .set_write_files(false, true)?;
        assert_eq!(
            format!("{}", config),
            "Configuration data\n\
             ==================\n\
             lin_sol_genie = Umfpack\n\
             tag_clamped = 3\n\
             tag_pressure = 4\n\
             point_displacement = [1.0, 2.0]\n\
             point_stress = [3.0, 4.0]\n\
             out_dir = /tmp/damsim/test\n\
             fn_stem = column\n\
             write_vtu = false\n\
             write_summary = true\n"
        );
        Ok(())
    }

    #[test]
    fn setters_capture_errors() {
        let mut config = Config::new();
        assert_eq!(
            config.set_tags(2, 2).err(),
            Some("the clamped and pressure tags must be different")
        );
        assert_eq!(
            config.set_eval_points([f64::NAN, 0.0], [0.0, 0.0]).err(),
            Some("the evaluation points must have finite coordinates")
        );
        assert_eq!(
            config.set_output("", "ternay").err(),
            Some("the output directory must not be empty")
        );
        assert_eq!(
            config.set_output("/tmp", "a/b").err(),
            Some("the filename stem must be non-empty and must not contain '/'")
        );
    }
}
