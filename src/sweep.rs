//! Parameter sweeps: Chern number phase diagrams over the (D, Bz) plane.
use crate::error::{MagnonError, Result};
use crate::HoneycombMagnon;
use ndarray::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A topological phase diagram: one Chern number per (D, Bz) pair.
///
/// Row i of `chern` belongs to `d_list[i]`, column j to `bz_list[j]`, in
/// the same order the ranges were supplied. Built once per sweep and
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseDiagram {
    pub d_list: Array1<f64>,
    pub bz_list: Array1<f64>,
    pub chern: Array2<f64>,
}

/// Sweeps the Chern number over a 2-D grid of (D, Bz) pairs at fixed J and
/// S. Every cell is an independent Chern integration at resolution `nk`
/// and the cells run in parallel, each writing only its own entry.
///
/// `nk` is a per-call trade-off: sweeps typically use a coarser mesh than
/// a single high-accuracy invariant evaluation.
#[allow(non_snake_case)]
pub fn chern_phase_diagram(
    J: f64,
    S: f64,
    d_list: &Array1<f64>,
    bz_list: &Array1<f64>,
    nk: usize,
) -> Result<PhaseDiagram> {
    if d_list.is_empty() {
        return Err(MagnonError::EmptyParameterRange { axis: "D" });
    }
    if bz_list.is_empty() {
        return Err(MagnonError::EmptyParameterRange { axis: "Bz" });
    }
    if nk < 2 {
        return Err(MagnonError::InvalidKmesh { nk });
    }
    let (nd, nbz) = (d_list.len(), bz_list.len());
    let chern: Result<Vec<f64>> = (0..nd * nbz)
        .into_par_iter()
        .map(|idx| {
            let (i, j) = (idx / nbz, idx % nbz);
            let model = HoneycombMagnon::new(J, S, d_list[[i]], bz_list[[j]]);
            model.chern_number(nk)
        })
        .collect();
    let chern = Array2::from_shape_vec((nd, nbz), chern?).unwrap();
    Ok(PhaseDiagram {
        d_list: d_list.to_owned(),
        bz_list: bz_list.to_owned(),
        chern,
    })
}
