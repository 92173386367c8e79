//! Small vector helpers for landmark geometry.

pub mod safe_cast;

/// Three-component vector
pub type Vec3 = [f64; 3];

#[must_use]
pub fn dot(a: &Vec3, b: &Vec3) -> f64 {
    a[0].mul_add(b[0], a[1].mul_add(b[1], a[2] * b[2]))
}

#[must_use]
pub fn norm(v: &Vec3) -> f64 {
    dot(v, v).sqrt()
}

/// Unit vector in the direction of `v`.
///
/// A zero-length input is returned unchanged, so the angle it forms with any
/// other vector evaluates to π/2 rather than faulting.
#[must_use]
pub fn normalize(v: Vec3) -> Vec3 {
    let n = norm(&v);
    if n == 0.0 {
        v
    } else {
        [v[0] / n, v[1] / n, v[2] / n]
    }
}

/// Angle in radians between two unit (or zero) vectors, in `[0, π]`
#[must_use]
pub fn angle_between(a: &Vec3, b: &Vec3) -> f64 {
    dot(a, b).clamp(-1.0, 1.0).acos()
}

/// Euclidean distance between two equal-length slices.
///
/// Trailing elements of the longer slice are ignored; callers validate
/// lengths before comparing.
#[must_use]
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
