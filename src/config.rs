//! Run configuration for the spanner builder

/// Parameters controlling a construction run
pub struct Config {
    /// Seed for the sampling stream; None seeds from entropy
    pub seed: Option<u64>,

    /// Run the all-pairs stretch oracle on the result
    pub verify: bool,

    /// Worker threads for the verification oracle
    pub threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            verify: false,
            threads: 0,
        }
    }
}

impl Config {
    /// Create a new configuration with custom values
    pub fn new(seed: Option<u64>, verify: bool, threads: usize) -> Self {
        Self {
            seed,
            verify,
            threads,
        }
    }
}
