use ndarray::prelude::*;
use serde::{Deserialize, Serialize};

pub mod basis;
pub mod error;
pub mod geometry;
pub mod kpoints;
pub mod sweep;

pub use basis::eigh2;
pub use error::{MagnonError, Result};
pub use geometry::{chern_number_of, plaquette_curvature, ChernSummary};
pub use kpoints::{gen_bz_mesh, k_path};
pub use sweep::{chern_phase_diagram, PhaseDiagram};

/// This crate is used to perform topological calculations on the two-band
/// magnon model of a honeycomb ferromagnet with Dzyaloshinskii-Moriya (DM)
/// interaction, currently including:
///
/// 1: Calculate the magnon band structure
///
/// 2: Calculate the Berry curvature of the lower band with the discrete
/// plaquette (Wilson loop) method
///
/// 3: Calculate the Chern number and sweep it over a (D, Bz) grid to build a
/// topological phase diagram
///
/// The model is the Haldane-like magnon Hamiltonian obtained from
/// $H=\sum_{\langle ij\rangle}J\bm S_i\cdot\bm S_j+\bm D\cdot(\bm S_i\times\bm S_j)-B_z\sum_i S_i^z$
/// after the Holstein-Primakoff and Fourier transforms. All parameters are
/// carried explicitly by [`HoneycombMagnon`], so concurrent sweeps with
/// different material parameters never share state.
#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoneycombMagnon {
    /// The Heisenberg exchange, the overall energy scale.
    pub J: f64,
    /// The spin magnitude.
    pub S: f64,
    /// The DM interaction strength. A nonzero D opens the topological gap.
    pub D: f64,
    /// The Zeeman field, entering both sublattices identically.
    pub Bz: f64,
}

impl HoneycombMagnon {
    #[allow(non_snake_case)]
    pub fn new(J: f64, S: f64, D: f64, Bz: f64) -> HoneycombMagnon {
        HoneycombMagnon { J, S, D, Bz }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn trivial_chern_without_dm() {
        // With D=0 the NNN gap term vanishes identically, so there is no
        // topological gap mechanism for any Zeeman field.
        for bz in [0.0, 0.5, -1.0] {
            let model = HoneycombMagnon::new(1.0, 1.0, 0.0, bz);
            let c = model.chern_number(30).unwrap();
            assert!(c.abs() < 0.1, "C = {} at Bz = {}, expected 0", c, bz);
        }
    }

    #[test]
    fn chern_sign_antisymmetry() {
        // Flipping the DM sign reverses the chirality of every gapped cone.
        let c_plus = HoneycombMagnon::new(1.0, 1.0, 0.8, 0.0)
            .chern_number(30)
            .unwrap();
        let c_minus = HoneycombMagnon::new(1.0, 1.0, -0.8, 0.0)
            .chern_number(30)
            .unwrap();
        assert!(
            (c_plus + c_minus).abs() < 0.1,
            "C(+D) = {}, C(-D) = {}",
            c_plus,
            c_minus
        );
        assert!(c_plus.abs() > 0.5, "gapped phase should carry a nonzero C");
    }

    #[test]
    fn chern_resolution_convergence() {
        let model = HoneycombMagnon::new(1.0, 1.0, 0.5, 0.25);
        let c_coarse = model.chern_number(20).unwrap();
        let c_fine = model.chern_number(60).unwrap();
        assert!(
            (c_fine - c_coarse).abs() < 0.05,
            "C(20) = {}, C(60) = {}",
            c_coarse,
            c_fine
        );
        let dist_coarse = (c_coarse - c_coarse.round()).abs();
        let dist_fine = (c_fine - c_fine.round()).abs();
        assert!(
            dist_fine <= dist_coarse + 0.02,
            "refinement moved away from the nearest integer: {} -> {}",
            dist_coarse,
            dist_fine
        );
    }

    #[test]
    fn dm_gap_at_dirac_point() {
        use std::f64::consts::PI;
        // One of the zeros of f(k) inside [-pi, pi)^2, where the NN term
        // alone would leave the bands degenerate.
        let k_dirac = array![2.0 * PI / 3.0, 2.0 * PI / (3.0 * 3.0_f64.sqrt())];
        let gapless = HoneycombMagnon::new(1.0, 1.0, 0.0, 0.3);
        assert!(gapless.gap_onek(&k_dirac) < 1e-8);
        // |H00 - H11| = 4 t2 g(K) with g(K) = 3 sqrt(3)/2
        let gapped = HoneycombMagnon::new(1.0, 1.0, 0.5, 0.3);
        let expected = 4.0 * 0.5 * 1.0 * 3.0 * 3.0_f64.sqrt() / 2.0;
        assert!((gapped.gap_onek(&k_dirac) - expected).abs() < 1e-8);
    }

    #[test]
    fn band_structure_along_path() {
        let model = HoneycombMagnon::new(1.0, 1.0, 0.5, 0.5);
        let nodes = arr2(&[[-std::f64::consts::PI, 0.0], [0.0, 0.0], [std::f64::consts::PI, 0.0]]);
        let (k_vec, k_dist, k_node) = k_path(&nodes, 101).unwrap();
        let band = model.solve_band_all_parallel(&k_vec);
        assert_eq!(band.shape(), &[101, 2]);
        assert_eq!(k_dist.len(), 101);
        assert_eq!(k_node.len(), 3);
        for row in band.outer_iter() {
            assert!(row[0] <= row[1]);
        }
        // k_dist is monotone along the path
        for i in 1..k_dist.len() {
            assert!(k_dist[i] >= k_dist[i - 1]);
        }
    }

    #[test]
    fn summary_flags_gap_closing() {
        // The gapless model shows a collapsed minimal gap and much larger
        // curvature extremes than a well-gapped one.
        let gapped = HoneycombMagnon::new(1.0, 1.0, 1.0, 0.0)
            .chern_summary(30)
            .unwrap();
        let gapless = HoneycombMagnon::new(1.0, 1.0, 0.0, 0.0)
            .chern_summary(30)
            .unwrap();
        assert!(gapped.min_gap > 0.1);
        assert!(gapless.min_gap < gapped.min_gap);
        assert!(gapless.max_abs_curvature > gapped.max_abs_curvature);
    }
}
