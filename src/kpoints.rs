//! Uniform Brillouin-zone meshes and k-point paths.
use crate::error::{MagnonError, Result};
use ndarray::prelude::*;
use std::f64::consts::PI;

/// Generates the uniform nk x nk mesh covering [-pi, pi)^2, one (kx, ky)
/// row per point in row-major order. The mesh step is 2 pi / nk, which is
/// also the plaquette spacing used by the curvature estimator on this mesh.
pub fn gen_bz_mesh(nk: usize) -> Result<Array2<f64>> {
    if nk < 2 {
        return Err(MagnonError::InvalidKmesh { nk });
    }
    let dk = 2.0 * PI / (nk as f64);
    let mut kvec = Array2::<f64>::zeros((nk * nk, 2));
    for i in 0..nk {
        for j in 0..nk {
            kvec[[i * nk + j, 0]] = -PI + (i as f64) * dk;
            kvec[[i * nk + j, 1]] = -PI + (j as f64) * dk;
        }
    }
    Ok(kvec)
}

/// Interpolates a high-symmetry path through the given nodes with nk points
/// in total, allocated proportionally to segment length. Returns the
/// k-points, the cumulative distance of every point and the distance of
/// every node, ready for band-structure consumers.
///
/// Fails on fewer than two path points, and on a path whose nodes all
/// coincide, since segment lengths then carry no sampling information.
pub fn k_path(
    path: &Array2<f64>,
    nk: usize,
) -> Result<(Array2<f64>, Array1<f64>, Array1<f64>)> {
    if nk < 2 {
        return Err(MagnonError::InvalidPathSampling { nk });
    }
    let n_node = path.nrows();
    if n_node < 2 {
        return Err(MagnonError::DegenerateKPath);
    }
    let mut k_node = Array1::<f64>::zeros(n_node);
    for n in 1..n_node {
        let seg = &path.row(n) - &path.row(n - 1);
        k_node[[n]] = k_node[[n - 1]] + seg.dot(&seg).sqrt();
    }
    let total = k_node[[n_node - 1]];
    if total == 0.0 {
        return Err(MagnonError::DegenerateKPath);
    }
    let mut node_index = vec![0usize; n_node];
    for n in 1..n_node {
        node_index[n] = ((k_node[[n]] / total) * ((nk - 1) as f64)).round() as usize;
    }
    let mut k_vec = Array2::<f64>::zeros((nk, 2));
    let mut k_dist = Array1::<f64>::zeros(nk);
    k_vec.row_mut(0).assign(&path.row(0));
    for n in 1..n_node {
        let (i0, i1) = (node_index[n - 1], node_index[n]);
        for i in i0..=i1 {
            let frac = if i1 == i0 {
                0.0
            } else {
                ((i - i0) as f64) / ((i1 - i0) as f64)
            };
            let k = &path.row(n - 1) * (1.0 - frac) + &path.row(n) * frac;
            k_vec.row_mut(i).assign(&k);
            k_dist[[i]] = k_node[[n - 1]] + frac * (k_node[[n]] - k_node[[n - 1]]);
        }
    }
    Ok((k_vec, k_dist, k_node))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen_bz_mesh() {
        let kvec = gen_bz_mesh(4).unwrap();
        assert_eq!(kvec.shape(), &[16, 2]);
        assert_eq!(kvec[[0, 0]], -PI);
        assert_eq!(kvec[[0, 1]], -PI);
        // half-open interval: the last point stays short of +pi by one step
        let dk = 2.0 * PI / 4.0;
        assert!((kvec[[15, 0]] - (PI - dk)).abs() < 1e-12);
        assert!((kvec[[15, 1]] - (PI - dk)).abs() < 1e-12);
    }

    #[test]
    fn mesh_rejects_degenerate_resolution() {
        assert_eq!(
            gen_bz_mesh(1).unwrap_err(),
            MagnonError::InvalidKmesh { nk: 1 }
        );
        assert_eq!(
            gen_bz_mesh(0).unwrap_err(),
            MagnonError::InvalidKmesh { nk: 0 }
        );
    }

    #[test]
    fn test_k_path_endpoints() {
        let nodes = array![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]];
        let (k_vec, k_dist, k_node) = k_path(&nodes, 21).unwrap();
        assert_eq!(k_vec.nrows(), 21);
        assert_eq!(k_vec.row(0).to_owned(), array![0.0, 0.0]);
        assert_eq!(k_vec.row(20).to_owned(), array![1.0, 1.0]);
        assert!((k_node[[2]] - 2.0).abs() < 1e-12);
        assert!((k_dist[[20]] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn k_path_rejects_degenerate_input() {
        let nodes = array![[0.0, 0.0], [1.0, 0.0]];
        assert_eq!(
            k_path(&nodes, 1).unwrap_err(),
            MagnonError::InvalidPathSampling { nk: 1 }
        );
        // all nodes coincident: total length 0 would poison every distance
        let stuck = array![[0.5, -0.5], [0.5, -0.5], [0.5, -0.5]];
        assert_eq!(k_path(&stuck, 21).unwrap_err(), MagnonError::DegenerateKPath);
        // a single node spans no segment at all
        let lone = array![[0.5, -0.5]];
        assert_eq!(k_path(&lone, 21).unwrap_err(), MagnonError::DegenerateKPath);
    }
}
