//! Berry curvature and Chern numbers of the lower band, computed with the
//! discrete plaquette (Wilson loop) method.
//!
//! For a plaquette of side $\delta$ anchored at $\bm k$ the four link
//! variables
//! $$U_1=\braket{u_{\bm k}}{u_{\bm k+\delta\hat x}},\ U_2=\braket{u_{\bm k+\delta\hat x}}{u_{\bm k+\delta\hat x+\delta\hat y}},\ U_3=\braket{u_{\bm k+\delta\hat x+\delta\hat y}}{u_{\bm k+\delta\hat y}},\ U_4=\braket{u_{\bm k+\delta\hat y}}{u_{\bm k}}$$
//! are each of unit modulus up to numerical error, and the curvature
//! estimate is $F=\text{Im}\ln(U_1U_2U_3U_4)/\delta^2$ with the branch of
//! the logarithm in $(-\pi,\pi]$. Every eigenvector enters the cyclic
//! product once as a bra and once as a ket, so the arbitrary phase chosen
//! by the solver at each corner cancels exactly.
use crate::basis::eigh2;
use crate::error::{MagnonError, Result};
use crate::kpoints::gen_bz_mesh;
use crate::HoneycombMagnon;
use ndarray::prelude::*;
use ndarray::Data;
use num_complex::Complex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

// Guards for plaquettes that cross a band touching; see
// `plaquette_curvature`. Loop products of gapped, resolved bands stay at
// modulus 1 - O(dk^2) with fluxes far from the branch boundary.
const LOOP_MODULUS_TOL: f64 = 1e-8;
const BRANCH_TIE_TOL: f64 = 1e-9;

#[inline(always)]
fn vdot(a: &Array1<Complex<f64>>, b: &Array1<Complex<f64>>) -> Complex<f64> {
    a.iter().zip(b.iter()).map(|(x, y)| x.conj() * y).sum()
}

#[inline(always)]
fn lower_state<F>(ham: &F, kx: f64, ky: f64) -> Array1<Complex<f64>>
where
    F: Fn(&Array1<f64>) -> Array2<Complex<f64>>,
{
    let (_, evec) = eigh2(&ham(&array![kx, ky]));
    evec.row(0).to_owned()
}

/// The plaquette curvature estimate for the lower band of an arbitrary
/// two-band Bloch Hamiltonian `ham` at one wavevector, with spacing `dk`.
///
/// The branch of the logarithm is the principal argument in $(-\pi,\pi]$;
/// any other branch would leak spurious $2\pi/\delta^2$ jumps into the
/// integrated invariant.
///
/// A plaquette that crosses a band touching carries no usable flux. It
/// shows up in exactly two ways: the loop product lands on the negative
/// real axis (a half-quantized flux, where $+\pi$ and $-\pi$ label the
/// same point of the circle and the resolved sign is floating-point
/// noise), or the product collapses to zero modulus because two sampled
/// eigenvectors are orthogonal. Both cases return a curvature of zero, so
/// the touchings of a gapless model cancel instead of locking into an
/// arbitrary mesh-dependent integer.
pub fn plaquette_curvature<F>(ham: &F, kvec: &Array1<f64>, dk: f64) -> f64
where
    F: Fn(&Array1<f64>) -> Array2<Complex<f64>>,
{
    let (kx, ky) = (kvec[[0]], kvec[[1]]);
    let u00 = lower_state(ham, kx, ky);
    let u10 = lower_state(ham, kx + dk, ky);
    let u11 = lower_state(ham, kx + dk, ky + dk);
    let u01 = lower_state(ham, kx, ky + dk);
    let loop_product =
        vdot(&u00, &u10) * vdot(&u10, &u11) * vdot(&u11, &u01) * vdot(&u01, &u00);
    if loop_product.norm() < LOOP_MODULUS_TOL {
        return 0.0;
    }
    let flux = loop_product.arg();
    if PI - flux.abs() < BRANCH_TIE_TOL {
        return 0.0;
    }
    flux / dk.powi(2)
}

/// Integrates the plaquette curvature of an arbitrary two-band Bloch
/// Hamiltonian over the nk x nk mesh of [-pi, pi)^2 and divides by 2 pi.
/// Every grid point is evaluated independently, in parallel; the result is
/// a plain sum, so the accumulation order only matters at the level of
/// floating-point associativity.
pub fn chern_number_of<F>(ham: &F, nk: usize) -> Result<f64>
where
    F: Fn(&Array1<f64>) -> Array2<Complex<f64>> + Sync,
{
    let kvec = gen_bz_mesh(nk)?;
    let dk = 2.0 * PI / (nk as f64);
    let omega: Vec<f64> = kvec
        .axis_iter(Axis(0))
        .into_par_iter()
        .map(|k| plaquette_curvature(ham, &k.to_owned(), dk))
        .collect();
    let omega = arr1(&omega);
    Ok(omega.sum() * dk.powi(2) / (2.0 * PI))
}

/// One Chern integration together with its degeneracy diagnostics.
///
/// An anomalously large `max_abs_curvature` or a collapsing `min_gap`
/// marks a parameter point near a phase boundary, where the invariant is
/// unreliable. This is expected behavior at a true transition, not a
/// defect, so the value is reported rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChernSummary {
    pub chern: f64,
    pub max_abs_curvature: f64,
    pub min_gap: f64,
}

impl HoneycombMagnon {
    /// The Berry curvature of the lower magnon band at one wavevector,
    /// estimated on a plaquette of side `dk`.
    pub fn berry_curvature_onek<S>(&self, kvec: &ArrayBase<S, Ix1>, dk: f64) -> f64
    where
        S: Data<Elem = f64>,
    {
        plaquette_curvature(&|k| self.gen_ham(k), &kvec.to_owned(), dk)
    }

    /// Parallel curvature evaluation over a list of k-points, e.g. for a
    /// curvature heat map. Callers scanning for phase boundaries inspect
    /// the magnitudes of the returned samples directly.
    pub fn berry_curvature<S>(&self, kvec: &ArrayBase<S, Ix2>, dk: f64) -> Array1<f64>
    where
        S: Data<Elem = f64> + Sync,
    {
        let omega: Vec<f64> = kvec
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|x| self.berry_curvature_onek(&x, dk))
            .collect();
        arr1(&omega)
    }

    /// The Chern number of the lower band on an nk x nk mesh,
    /// $$C=\frac{1}{2\pi}\sum_{\bm k}F(\bm k)\,\delta^2,\qquad \delta=2\pi/n_k.$$
    /// Approaches an integer with increasing nk whenever the bands stay
    /// gapped over the zone.
    pub fn chern_number(&self, nk: usize) -> Result<f64> {
        chern_number_of(&|k| self.gen_ham(k), nk)
    }

    /// Like [`chern_number`](Self::chern_number), additionally reporting
    /// the largest curvature magnitude and the smallest band gap sampled on
    /// the mesh, for flagging suspect phase-boundary regions.
    pub fn chern_summary(&self, nk: usize) -> Result<ChernSummary> {
        let kvec = gen_bz_mesh(nk)?;
        let dk = 2.0 * PI / (nk as f64);
        let samples: Vec<(f64, f64)> = kvec
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|k| (self.berry_curvature_onek(&k, dk), self.gap_onek(&k)))
            .collect();
        let mut chern = 0.0;
        let mut max_abs_curvature = 0.0_f64;
        let mut min_gap = f64::INFINITY;
        for (omega, gap) in samples {
            chern += omega;
            max_abs_curvature = max_abs_curvature.max(omega.abs());
            min_gap = min_gap.min(gap);
        }
        Ok(ChernSummary {
            chern: chern * dk.powi(2) / (2.0 * PI),
            max_abs_curvature,
            min_gap,
        })
    }
}
