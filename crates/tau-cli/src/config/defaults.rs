pub struct DefaultsConfig {
    pub site_count: u32,
    pub initial_range: (f64, f64),
    pub timepoints: usize,
    pub replicates: usize,
    pub base_seed: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            site_count: 79,
            initial_range: (0.0, 1.0),
            timepoints: 50,
            replicates: 100,
            base_seed: 0,
        }
    }
}
