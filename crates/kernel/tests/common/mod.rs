use iga_kernel::geometry::nurbs::NurbsSurfaceGeometry;
use iga_kernel::geometry::point::Point3d;

const HEIGHTS: [[f64; 5]; 4] = [
    [0.0, 0.10, -0.05, 0.12, 0.0],
    [0.08, 0.25, 0.18, -0.10, 0.05],
    [-0.06, 0.15, 0.30, 0.20, -0.04],
    [0.0, -0.08, 0.10, 0.06, 0.02],
];

const WEIGHTS: [[f64; 5]; 4] = [
    [1.0, 0.9, 1.1, 1.0, 0.95],
    [1.2, 1.0, 0.8, 1.3, 1.0],
    [0.9, 1.15, 1.0, 0.85, 1.1],
    [1.0, 1.05, 0.9, 1.0, 1.0],
];

/// Rational degree (2, 3) patch over [0, 1] x [0, 1] with one interior knot
/// per direction, sheared in x and with uneven heights and weights.
pub fn rational_patch() -> NurbsSurfaceGeometry {
    let mut poles = Vec::new();
    let mut weights = Vec::new();
    for i in 0..4 {
        for j in 0..5 {
            poles.push(Point3d::new(
                i as f64 / 3.0 + 0.05 * j as f64,
                j as f64 / 4.0,
                HEIGHTS[i][j],
            ));
            weights.push(WEIGHTS[i][j]);
        }
    }
    NurbsSurfaceGeometry::rational(
        2,
        3,
        vec![0.0, 0.0, 0.0, 0.4, 1.0, 1.0, 1.0],
        vec![0.0, 0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0, 1.0],
        4,
        5,
        poles,
        weights,
    )
    .unwrap()
}
