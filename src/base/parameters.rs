use serde::{Deserialize, Serialize};

/// Holds the material and loading parameters of the dam problem
///
/// Units: lengths in m, forces in MN, stresses in MPa. Hence, the gravity
/// acceleration is given in MN/kg·m/s² (i.e., 9.81e-6) and densities in kg/m³.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamDam {
    /// Density of the concrete (kg/m³)
    pub rho_concrete: f64,

    /// Density of the water (kg/m³)
    pub rho_water: f64,

    /// Gravity acceleration (already scaled to MN units)
    pub gravity: f64,

    /// Young's modulus of the concrete (MPa)
    pub young: f64,

    /// Poisson's coefficient of the concrete
    pub poisson: f64,

    /// Height of the water level measured from the foundation (m)
    pub water_height: f64,
}

impl Default for ParamDam {
    /// Returns the parameters of the Ternay dam
    fn default() -> Self {
        ParamDam {
            rho_concrete: 2.5e3,
            rho_water: 1e3,
            gravity: 9.81e-6,
            young: 30e3,
            poisson: 0.25,
            water_height: 40.0,
        }
    }
}

impl ParamDam {
    /// Returns the body force vector ρ g (0, -1)
    pub fn body_force(&self) -> [f64; 2] {
        [0.0, -self.rho_concrete * self.gravity]
    }

    /// Returns the hydrostatic pressure ρw g (H - y)
    ///
    /// The expression is not clipped above the water level.
    pub fn water_pressure(&self, y: f64) -> f64 {
        self.rho_water * self.gravity * (self.water_height - y)
    }

    /// Validates the parameters
    ///
    /// Returns a message with the first inconsistency found, if any.
    pub fn validate(&self) -> Option<String> {
        if self.rho_concrete < 0.0 {
            return Some(format!("rho_concrete = {:?} is incorrect; it must be ≥ 0.0", self.rho_concrete));
        }
        if self.rho_water < 0.0 {
            return Some(format!("rho_water = {:?} is incorrect; it must be ≥ 0.0", self.rho_water));
        }
        if self.gravity < 0.0 {
            return Some(format!("gravity = {:?} is incorrect; it must be ≥ 0.0", self.gravity));
        }
        if self.young <= 0.0 {
            return Some(format!("young = {:?} is incorrect; it must be > 0.0", self.young));
        }
        if self.poisson <= -1.0 || self.poisson >= 0.5 {
            return Some(format!(
                "poisson = {:?} is incorrect; it must be in (-1.0, 0.5)",
                self.poisson
            ));
        }
        if self.water_height < 0.0 {
            return Some(format!(
                "water_height = {:?} is incorrect; it must be ≥ 0.0",
                self.water_height
            ));
        }
        None
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::ParamDam;
    use russell_lab::approx_eq;

    #[test]
    fn default_works() {
        let param = ParamDam::default();
        assert_eq!(param.validate(), None);
        assert_eq!(param.body_force()[0], 0.0);
        approx_eq(param.body_force()[1], -0.024525, 1e-15);
        approx_eq(param.water_pressure(0.0), 0.3924, 1e-15);
        assert_eq!(param.water_pressure(40.0), 0.0);
        approx_eq(param.water_pressure(50.0), -0.0981, 1e-15);
    }

    #[test]
    fn validate_captures_errors() {
        let mut param = ParamDam::default();
        param.young = 0.0;
        assert_eq!(
            param.validate(),
            Some("young = 0.0 is incorrect; it must be > 0.0".to_string())
        );
        param.young = 30e3;
        param.poisson = 0.5;
        assert_eq!(
            param.validate(),
            Some("poisson = 0.5 is incorrect; it must be in (-1.0, 0.5)".to_string())
        );
        param.poisson = 0.25;
        param.gravity = -1.0;
        assert_eq!(
            param.validate(),
            Some("gravity = -1.0 is incorrect; it must be ≥ 0.0".to_string())
        );
    }

    #[test]
    fn serialize_works() {
        let param = ParamDam::default();
        let json = serde_json::to_string(&param).unwrap();
        let read: ParamDam = serde_json::from_str(&json).unwrap();
        assert_eq!(read, param);
    }
}
