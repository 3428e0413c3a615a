//! Rigid alignment and initial-view orientation.
//!
//! Provides the structural alignment primitives the scene layer builds on:
//! - [`kabsch`]: least-squares optimal rotation between two point sets
//! - [`align_a_to_b`]: align a full structure from a matched partial selection
//! - [`best_orientation`]: parameter-free initial viewing rotation (PCA)
//!
//! All routines are total: degenerate input (too few points, zero variance)
//! yields the identity rotation, never an error.

use glam::{Mat3, Vec3};

/// Singular values below this are treated as rank deficiency.
const RANK_EPS: f32 = 1e-8;

/// Compute centroid of a point set. Empty input yields the origin.
#[must_use]
pub fn centroid(points: &[Vec3]) -> Vec3 {
    if points.is_empty() {
        return Vec3::ZERO;
    }
    points.iter().copied().sum::<Vec3>() / points.len() as f32
}

/// Optimal rotation aligning mean-centered set `a` onto mean-centered set
/// `b` (Kabsch). Builds the cross-covariance H = Aᵀ·B, takes its SVD
/// H = U·Σ·Vᵀ and returns R = V·diag(1, 1, det(V·Uᵀ))·Uᵀ; the determinant
/// correction blocks improper rotations (reflections).
///
/// Inputs must already be centered on their own centroids. Degenerate
/// input — mismatched lengths, fewer than 3 points, or zero variance —
/// returns [`Mat3::IDENTITY`].
#[must_use]
pub fn kabsch(a: &[Vec3], b: &[Vec3]) -> Mat3 {
    if a.len() != b.len() || a.len() < 3 {
        return Mat3::IDENTITY;
    }

    // H column j accumulates Σₖ bₖ[j]·aₖ, so H[i][j] = Σₖ aₖ[i]·bₖ[j].
    let mut hx = Vec3::ZERO;
    let mut hy = Vec3::ZERO;
    let mut hz = Vec3::ZERO;
    for (pa, pb) in a.iter().zip(b.iter()) {
        hx += pb.x * *pa;
        hy += pb.y * *pa;
        hz += pb.z * *pa;
    }
    let h = Mat3::from_cols(hx, hy, hz);

    let (u, s, v) = svd3(h);
    if s.max_element() < RANK_EPS {
        return Mat3::IDENTITY;
    }

    let d = (v * u.transpose()).determinant();
    let correction = Mat3::from_diagonal(Vec3::new(1.0, 1.0, d.signum()));
    v * correction * u.transpose()
}

/// Align every point of `full_a` using the rotation that best maps
/// `subset_a` onto `subset_b`.
///
/// The subsets are centered on their own centroids before [`kabsch`]; the
/// returned points are `R·(p − centroid(subset_a)) + centroid(subset_b)`.
/// This lets a whole structure follow an alignment computed from a matched
/// partial selection (e.g. shared CA positions).
#[must_use]
pub fn align_a_to_b(
    full_a: &[Vec3],
    subset_a: &[Vec3],
    subset_b: &[Vec3],
) -> Vec<Vec3> {
    let ca = centroid(subset_a);
    let cb = centroid(subset_b);

    let centered_a: Vec<Vec3> = subset_a.iter().map(|p| *p - ca).collect();
    let centered_b: Vec<Vec3> = subset_b.iter().map(|p| *p - cb).collect();
    let rotation = kabsch(&centered_a, &centered_b);

    full_a.iter().map(|p| rotation * (*p - ca) + cb).collect()
}

/// Initial viewing rotation and rotation center for a point cloud.
///
/// Takes the covariance of the centered coordinates, extracts principal
/// axes, and maps the largest-variance axis to screen X and the second
/// to screen Y (landscape/square canvas assumption), completing a
/// right-handed basis via cross product. Eigenvector signs are
/// canonicalized so the result is reproducible. Degenerate clouds
/// (fewer than 2 points, zero variance) get the identity rotation.
#[must_use]
pub fn best_orientation(coords: &[Vec3]) -> (Mat3, Vec3) {
    let center = centroid(coords);
    if coords.len() < 2 {
        return (Mat3::IDENTITY, center);
    }

    // Covariance (unnormalized; eigenvectors are scale-invariant).
    let mut cx = Vec3::ZERO;
    let mut cy = Vec3::ZERO;
    let mut cz = Vec3::ZERO;
    for p in coords {
        let c = *p - center;
        cx += c.x * c;
        cy += c.y * c;
        cz += c.z * c;
    }
    let cov = Mat3::from_cols(cx, cy, cz);

    let (evals, evecs) = jacobi_eigen(cov);
    if evals.x < RANK_EPS {
        return (Mat3::IDENTITY, center);
    }

    let r0 = canonical_sign(evecs.x_axis).normalize_or(Vec3::X);
    let mut r1 = canonical_sign(evecs.y_axis);
    r1 -= r1.dot(r0) * r0;
    let r1 = if r1.length_squared() < RANK_EPS {
        r0.any_orthonormal_vector()
    } else {
        r1.normalize()
    };
    let r2 = r0.cross(r1);

    // Rows r0/r1/r2 so rotated X carries the dominant variance.
    let rotation = Mat3::from_cols(r0, r1, r2).transpose();
    (rotation, center)
}

/// Flip `v` so its largest-magnitude component is non-negative. Removes
/// the sign ambiguity inherent to eigenvectors.
fn canonical_sign(v: Vec3) -> Vec3 {
    let a = v.abs();
    let dominant = if a.x >= a.y && a.x >= a.z {
        v.x
    } else if a.y >= a.z {
        v.y
    } else {
        v.z
    };
    if dominant < 0.0 {
        -v
    } else {
        v
    }
}

// ---------------------------------------------------------------------------
// 3x3 SVD via Jacobi iteration
// ---------------------------------------------------------------------------

/// SVD of a 3x3 matrix: `m = U·diag(s)·Vᵀ`, singular values descending.
///
/// V comes from a Jacobi eigendecomposition of mᵀ·m; U is recovered as
/// m·V·Σ⁻¹ and re-orthonormalized to tolerate rank deficiency.
fn svd3(m: Mat3) -> (Mat3, Vec3, Mat3) {
    let (evals, v) = jacobi_eigen(m.transpose() * m);
    let s = Vec3::new(
        evals.x.max(0.0).sqrt(),
        evals.y.max(0.0).sqrt(),
        evals.z.max(0.0).sqrt(),
    );

    let col = |sv: f32, vc: Vec3| -> Vec3 {
        if sv > RANK_EPS {
            (m * vc) / sv
        } else {
            Vec3::ZERO
        }
    };
    let u = orthonormalize_columns(Mat3::from_cols(
        col(s.x, v.x_axis),
        col(s.y, v.y_axis),
        col(s.z, v.z_axis),
    ));

    (u, s, v)
}

/// Eigendecomposition of a symmetric 3x3 matrix by cyclic Jacobi
/// rotations. Returns eigenvalues (descending) and the matrix whose
/// columns are the matching eigenvectors.
fn jacobi_eigen(sym: Mat3) -> (Vec3, Mat3) {
    // a[i][j] indexed symmetrically; v holds eigenvector columns.
    let mut a = [
        [sym.x_axis.x, sym.y_axis.x, sym.z_axis.x],
        [sym.x_axis.y, sym.y_axis.y, sym.z_axis.y],
        [sym.x_axis.z, sym.y_axis.z, sym.z_axis.z],
    ];
    let mut v = [Vec3::X, Vec3::Y, Vec3::Z];

    const MAX_SWEEPS: usize = 50;
    for _ in 0..MAX_SWEEPS {
        // Largest off-diagonal element picks the rotation plane.
        let (mut p, mut q, mut off) = (0usize, 1usize, 0.0f32);
        for i in 0..3 {
            for j in (i + 1)..3 {
                if a[i][j].abs() > off {
                    off = a[i][j].abs();
                    p = i;
                    q = j;
                }
            }
        }
        if off < 1e-10 {
            break;
        }

        let diff = a[q][q] - a[p][p];
        let theta = if diff.abs() < 1e-10 {
            std::f32::consts::FRAC_PI_4
        } else {
            0.5 * (2.0 * a[p][q] / diff).atan()
        };
        let (sin, cos) = theta.sin_cos();

        // A ← GᵀAG for the Givens rotation G in the (p, q) plane.
        let app = a[p][p];
        let aqq = a[q][q];
        let apq = a[p][q];
        a[p][p] = cos * cos * app - 2.0 * sin * cos * apq + sin * sin * aqq;
        a[q][q] = sin * sin * app + 2.0 * sin * cos * apq + cos * cos * aqq;
        a[p][q] = 0.0;
        a[q][p] = 0.0;
        for i in 0..3 {
            if i != p && i != q {
                let aip = a[i][p];
                let aiq = a[i][q];
                a[i][p] = cos * aip - sin * aiq;
                a[p][i] = a[i][p];
                a[i][q] = sin * aip + cos * aiq;
                a[q][i] = a[i][q];
            }
        }

        // V ← V·G, column update.
        let vp = v[p];
        let vq = v[q];
        v[p] = cos * vp - sin * vq;
        v[q] = sin * vp + cos * vq;
    }

    // Sort eigenpairs by descending eigenvalue.
    let mut pairs = [(a[0][0], v[0]), (a[1][1], v[1]), (a[2][2], v[2])];
    pairs.sort_by(|x, y| y.0.total_cmp(&x.0));

    (
        Vec3::new(pairs[0].0, pairs[1].0, pairs[2].0),
        Mat3::from_cols(pairs[0].1, pairs[1].1, pairs[2].1),
    )
}

/// Gram-Schmidt over the columns, replacing collapsed columns so the
/// result is always a full orthonormal basis.
fn orthonormalize_columns(m: Mat3) -> Mat3 {
    let c0 = m.x_axis.normalize_or(Vec3::X);

    let c1 = m.y_axis - m.y_axis.dot(c0) * c0;
    let c1 = if c1.length_squared() < RANK_EPS {
        c0.any_orthonormal_vector()
    } else {
        c1.normalize()
    };

    let c2 = m.z_axis - m.z_axis.dot(c0) * c0 - m.z_axis.dot(c1) * c1;
    let c2 = if c2.length_squared() < RANK_EPS {
        c0.cross(c1)
    } else {
        c2.normalize()
    };

    Mat3::from_cols(c0, c1, c2)
}
