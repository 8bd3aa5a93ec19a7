/// Defines the directory where the simulation result files are saved
pub const DEFAULT_OUT_DIR: &str = "/tmp/damsim/results";

/// Defines an auxiliary directory where the test result files are saved
pub const DEFAULT_TEST_DIR: &str = "/tmp/damsim/test";

/// Boundary tag of the upstream (wetted) face
pub const TAG_UPSTREAM: usize = 1;

/// Boundary tag of the foundation (base of the dam)
pub const TAG_BASE: usize = 2;

/// Boundary tag of the downstream face
pub const TAG_DOWNSTREAM: usize = 3;

/// Boundary tag of the crest
pub const TAG_CREST: usize = 4;

/// Subdomain tag assigned to the concrete cells by the geometry generator
pub const TAG_CONCRETE: usize = 1;
