//! Bloch Hamiltonian construction and the closed-form two-band solver.
use crate::HoneycombMagnon;
use ndarray::prelude::*;
use ndarray::Data;
use num_complex::Complex;
use num_traits::Zero;
use rayon::prelude::*;

/// The three nearest-neighbour unit vectors of the honeycomb lattice.
#[inline(always)]
pub fn nn_vectors() -> [[f64; 2]; 3] {
    let h = 3.0_f64.sqrt() / 2.0;
    [[1.0, 0.0], [-0.5, h], [-0.5, -h]]
}

/// The next-nearest-neighbour displacements b_i = a_i - a_{i+1}.
#[inline(always)]
pub fn nnn_vectors() -> [[f64; 2]; 3] {
    let [a1, a2, a3] = nn_vectors();
    [
        [a1[0] - a2[0], a1[1] - a2[1]],
        [a2[0] - a3[0], a2[1] - a3[1]],
        [a3[0] - a1[0], a3[1] - a1[1]],
    ]
}

/// Closed-form eigensolver for a Hermitian 2x2 matrix.
///
/// Returns the eigenvalues in ascending order together with the matching
/// eigenvectors as the two rows of a complex matrix, each of unit norm.
/// The eigenvector representation is picked by the sign of the diagonal
/// asymmetry so that the dominant component never suffers cancellation,
/// which keeps the result stable arbitrarily close to a degeneracy. At an
/// exact degeneracy the standard basis is returned.
///
/// The overall phase of each eigenvector is an arbitrary gauge choice;
/// callers must only rely on gauge-invariant combinations of them.
pub fn eigh2<S>(ham: &ArrayBase<S, Ix2>) -> (Array1<f64>, Array2<Complex<f64>>)
where
    S: Data<Elem = Complex<f64>>,
{
    let a = ham[[0, 0]].re;
    let b = ham[[1, 1]].re;
    let c = ham[[0, 1]];
    let mid = 0.5 * (a + b);
    let asym = 0.5 * (a - b);
    let r = (asym * asym + c.norm_sqr()).sqrt();
    let eval = array![mid - r, mid + r];
    if r == 0.0 {
        return (eval, Array2::<Complex<f64>>::eye(2));
    }
    // Upper-band eigenvector (H - (mid+r)) v = 0, in the representation
    // whose leading component is asym + r resp. r - asym, both >= r > 0.
    let (x, y) = if asym >= 0.0 {
        (Complex::new(asym + r, 0.0), c.conj())
    } else {
        (c, Complex::new(r - asym, 0.0))
    };
    let norm = (x.norm_sqr() + y.norm_sqr()).sqrt();
    let (x, y) = (x / norm, y / norm);
    // The lower band is the orthogonal complement.
    let evec = array![[-y.conj(), x.conj()], [x, y]];
    (eval, evec)
}

impl HoneycombMagnon {
    /// Returns the 2x2 Bloch Hamiltonian at one wavevector, in the
    /// sublattice basis.
    ///
    /// With $t=JS$ and $t_2=DS$ the matrix is
    /// $$H(\bm k)=\begin{pmatrix} B_zS+2t_2 g(\bm k) & t f(\bm k)\\\\ t f^*(\bm k) & B_zS-2t_2 g(\bm k)\end{pmatrix}$$
    /// where $f(\bm k)=\sum_i e^{i\bm k\cdot\bm a_i}$ sums the
    /// nearest-neighbour phases and $g(\bm k)=\sum_i \sin(\bm k\cdot\bm b_i)$
    /// is the DM-induced, odd-in-k structure factor. The opposite sign of
    /// $g$ on the two diagonal entries is what opens the topological gap.
    #[allow(non_snake_case)]
    pub fn gen_ham<S>(&self, kvec: &ArrayBase<S, Ix1>) -> Array2<Complex<f64>>
    where
        S: Data<Elem = f64>,
    {
        if kvec.len() != 2 {
            panic!(
                "Wrong, the k-vector's length:k_len={} must equal to 2.",
                kvec.len()
            )
        }
        let (kx, ky) = (kvec[[0]], kvec[[1]]);
        let t = self.J * self.S;
        let t2 = self.D * self.S;
        let f = nn_vectors()
            .iter()
            .fold(Complex::<f64>::zero(), |acc, a| {
                acc + Complex::new(0.0, kx * a[0] + ky * a[1]).exp()
            });
        let g = nnn_vectors()
            .iter()
            .fold(0.0, |acc, b| acc + (kx * b[0] + ky * b[1]).sin());
        let onsite = self.Bz * self.S;
        array![
            [Complex::new(onsite + 2.0 * t2 * g, 0.0), t * f],
            [t * f.conj(), Complex::new(onsite - 2.0 * t2 * g, 0.0)],
        ]
    }

    /// Returns the two band energies (ascending) and the matching unit
    /// eigenvectors as rows, band 0 first.
    pub fn solve_onek<S>(&self, kvec: &ArrayBase<S, Ix1>) -> (Array1<f64>, Array2<Complex<f64>>)
    where
        S: Data<Elem = f64>,
    {
        let hamk = self.gen_ham(kvec);
        let herm_defect = (hamk[[0, 1]] - hamk[[1, 0]].conj()).norm();
        if herm_defect > 1e-8 {
            panic!("Wrong, hamiltonian is not hermitian");
        }
        eigh2(&hamk)
    }

    /// Eigenvalue-only path for band structures.
    pub fn solve_band_onek<S>(&self, kvec: &ArrayBase<S, Ix1>) -> Array1<f64>
    where
        S: Data<Elem = f64>,
    {
        let (eval, _) = self.solve_onek(kvec);
        eval
    }

    pub fn solve_band_all(&self, kvec: &Array2<f64>) -> Array2<f64> {
        let nk = kvec.len_of(Axis(0));
        let mut band = Array2::<f64>::zeros((nk, 2));
        for (i, k) in kvec.outer_iter().enumerate() {
            let eval = self.solve_band_onek(&k);
            band.slice_mut(s![i, ..]).assign(&eval);
        }
        band
    }

    #[allow(non_snake_case)]
    pub fn solve_band_all_parallel(&self, kvec: &Array2<f64>) -> Array2<f64> {
        let nk = kvec.len_of(Axis(0));
        let eval: Vec<_> = kvec
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|x| self.solve_band_onek(&x).to_vec())
            .collect();
        Array2::from_shape_vec((nk, 2), eval.into_iter().flatten().collect()).unwrap()
    }

    /// The band gap at one wavevector. Vanishes at a phase boundary, where
    /// the Chern number is ill-defined.
    pub fn gap_onek<S>(&self, kvec: &ArrayBase<S, Ix1>) -> f64
    where
        S: Data<Elem = f64>,
    {
        let eval = self.solve_band_onek(kvec);
        eval[[1]] - eval[[0]]
    }
}
