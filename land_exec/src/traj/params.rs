//! # Trajectory parameters
//!
//! Loaded from `traj.toml`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct TrajParams {
    /// Number of spatial axes the optimiser plans in
    pub axis_dim: usize,

    /// Order of the polynomial in each segment
    pub n_order: usize,

    /// Number of segments in the trajectory
    pub m: usize,

    /// Order of the derivative minimised by the optimiser
    pub d_order: usize,

    /// Resolution of the square grid of time allocations sampled during the prerequisite search
    pub sample_square_root: usize,

    /// Index at which playback of a freshly replanned trajectory begins
    pub replan_start_index: usize,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_traj_params_file() {
        let params: TrajParams = toml::from_str(include_str!("../../../params/traj.toml")).unwrap();

        assert_eq!(params.axis_dim, 3);
        assert_eq!(params.replan_start_index, 4);
        assert!(params.sample_square_root > 0);
    }
}
