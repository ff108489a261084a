use std::ops::Range;

use super::knots::KnotVector;

/// Division where a zero denominator yields zero. Coincident knots produce
/// `0/0` terms in the Cox-de Boor recursion that must vanish.
fn guarded_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Binomial coefficient `C(n, k)` as a float.
pub fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    let mut result = 1.0;
    for i in 0..k {
        result = result * (n - i) as f64 / (i + 1) as f64;
    }
    result
}

/// Non-zero basis functions of one knot span and their derivatives.
///
/// `values[k][i]` is the k-th derivative of the basis function attached to
/// pole `first_pole + i`. Rows above the degree are zero.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisFunctions {
    degree: usize,
    first_pole: usize,
    values: Vec<Vec<f64>>,
}

impl BasisFunctions {
    /// Basis values and derivatives up to `order` at `t`. `t` is expected
    /// inside the domain of `knots`; the span search clamps anything else.
    pub fn compute(knots: &KnotVector, t: f64, order: usize) -> Self {
        let span = knots.find_span(t);
        Self::compute_at_span(knots, span, t, order)
    }

    pub fn compute_at_span(knots: &KnotVector, span: usize, t: f64, order: usize) -> Self {
        let p = knots.degree();
        let k = knots.as_slice();

        // Basis functions in the upper triangle, knot differences in the lower.
        let mut ndu = vec![vec![0.0; p + 1]; p + 1];
        let mut left = vec![0.0; p + 1];
        let mut right = vec![0.0; p + 1];
        ndu[0][0] = 1.0;

        for j in 1..=p {
            left[j] = t - k[span + 1 - j];
            right[j] = k[span + j] - t;
            let mut saved = 0.0;
            for r in 0..j {
                ndu[j][r] = right[r + 1] + left[j - r];
                let temp = guarded_div(ndu[r][j - 1], ndu[j][r]);
                ndu[r][j] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }
            ndu[j][j] = saved;
        }

        let mut values = vec![vec![0.0; p + 1]; order + 1];
        for j in 0..=p {
            values[0][j] = ndu[j][p];
        }

        let n_ders = order.min(p);
        let mut a = vec![vec![0.0; p + 1]; 2];
        for r in 0..=p {
            let (mut s1, mut s2) = (0, 1);
            a[0][0] = 1.0;

            for kk in 1..=n_ders {
                let mut d = 0.0;
                let rk = r as isize - kk as isize;
                let pk = p - kk;

                if rk >= 0 {
                    let rk = rk as usize;
                    a[s2][0] = guarded_div(a[s1][0], ndu[pk + 1][rk]);
                    d = a[s2][0] * ndu[rk][pk];
                }

                let j1 = if rk >= -1 { 1 } else { (-rk) as usize };
                let j2 = if r <= pk + 1 { kk - 1 } else { p - r };

                for j in j1..=j2 {
                    let idx = (rk + j as isize) as usize;
                    a[s2][j] = guarded_div(a[s1][j] - a[s1][j - 1], ndu[pk + 1][idx]);
                    d += a[s2][j] * ndu[idx][pk];
                }

                if r <= pk {
                    a[s2][kk] = guarded_div(-a[s1][kk - 1], ndu[pk + 1][r]);
                    d += a[s2][kk] * ndu[r][pk];
                }

                values[kk][r] = d;
                std::mem::swap(&mut s1, &mut s2);
            }
        }

        // Scale by p! / (p - k)!
        let mut factor = p as f64;
        for kk in 1..=n_ders {
            for v in values[kk].iter_mut() {
                *v *= factor;
            }
            factor *= (p - kk) as f64;
        }

        Self {
            degree: p,
            first_pole: span - p,
            values,
        }
    }

    /// Turn B-spline values into rational (NURBS) values with the quotient
    /// rule. `weights` holds one weight per pole of the full pole list.
    pub fn rationalize(&mut self, weights: &[f64]) {
        let nb = self.degree + 1;
        let order = self.max_order();
        let window = &weights[self.first_pole..self.first_pole + nb];

        let weighted: Vec<Vec<f64>> = self
            .values
            .iter()
            .map(|row| row.iter().zip(window).map(|(n, w)| n * w).collect())
            .collect();
        let sums: Vec<f64> = weighted.iter().map(|row| row.iter().sum()).collect();

        let mut rational = vec![vec![0.0; nb]; order + 1];
        for k in 0..=order {
            for i in 0..nb {
                let mut value = weighted[k][i];
                for j in 1..=k {
                    value -= binomial(k, j) * sums[j] * rational[k - j][i];
                }
                rational[k][i] = value / sums[0];
            }
        }
        self.values = rational;
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Highest derivative order stored.
    pub fn max_order(&self) -> usize {
        self.values.len() - 1
    }

    pub fn first_pole(&self) -> usize {
        self.first_pole
    }

    pub fn nb_nonzero_poles(&self) -> usize {
        self.degree + 1
    }

    pub fn nonzero_pole_indices(&self) -> Range<usize> {
        self.first_pole..self.first_pole + self.degree + 1
    }

    pub fn value(&self, order: usize, index: usize) -> f64 {
        self.values[order][index]
    }

    pub fn values(&self, order: usize) -> &[f64] {
        &self.values[order]
    }
}

/// Tensor-product shape functions of a surface at one `(u, v)`.
///
/// Pole `(a, b)` of the active window maps to grid pole
/// `(first_pole_u + a, first_pole_v + b)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceBasisFunctions {
    order_u: usize,
    order_v: usize,
    first_pole_u: usize,
    first_pole_v: usize,
    nb_u: usize,
    nb_v: usize,
    values: Vec<Vec<f64>>,
}

impl SurfaceBasisFunctions {
    pub fn compute(
        knots_u: &KnotVector,
        knots_v: &KnotVector,
        u: f64,
        v: f64,
        order_u: usize,
        order_v: usize,
    ) -> Self {
        let basis_u = BasisFunctions::compute(knots_u, u, order_u);
        let basis_v = BasisFunctions::compute(knots_v, v, order_v);
        let nb_u = basis_u.nb_nonzero_poles();
        let nb_v = basis_v.nb_nonzero_poles();

        let mut values = Vec::with_capacity((order_u + 1) * (order_v + 1));
        for k in 0..=order_u {
            for l in 0..=order_v {
                let mut row = Vec::with_capacity(nb_u * nb_v);
                for a in 0..nb_u {
                    for b in 0..nb_v {
                        row.push(basis_u.value(k, a) * basis_v.value(l, b));
                    }
                }
                values.push(row);
            }
        }

        Self {
            order_u,
            order_v,
            first_pole_u: basis_u.first_pole(),
            first_pole_v: basis_v.first_pole(),
            nb_u,
            nb_v,
            values,
        }
    }

    /// Two-dimensional quotient rule. `weights` is the full row-major weight
    /// grid with `nb_poles_v` columns.
    pub fn rationalize(&mut self, weights: &[f64], nb_poles_v: usize) {
        let nb = self.nb_u * self.nb_v;
        let window: Vec<f64> = (0..nb)
            .map(|idx| {
                let (a, b) = (idx / self.nb_v, idx % self.nb_v);
                weights[(self.first_pole_u + a) * nb_poles_v + self.first_pole_v + b]
            })
            .collect();

        let weighted: Vec<Vec<f64>> = self
            .values
            .iter()
            .map(|row| row.iter().zip(&window).map(|(n, w)| n * w).collect())
            .collect();
        let sums: Vec<f64> = weighted.iter().map(|row| row.iter().sum()).collect();
        let w00 = sums[0];

        let mut rational = vec![vec![0.0; nb]; self.values.len()];
        for k in 0..=self.order_u {
            for l in 0..=self.order_v {
                for idx in 0..nb {
                    let mut value = weighted[self.slot(k, l)][idx];
                    for j in 1..=l {
                        value -= binomial(l, j) * sums[self.slot(0, j)] * rational[self.slot(k, l - j)][idx];
                    }
                    for i in 1..=k {
                        let bi = binomial(k, i);
                        value -= bi * sums[self.slot(i, 0)] * rational[self.slot(k - i, l)][idx];
                        for j in 1..=l {
                            value -= bi
                                * binomial(l, j)
                                * sums[self.slot(i, j)]
                                * rational[self.slot(k - i, l - j)][idx];
                        }
                    }
                    let slot = self.slot(k, l);
                    rational[slot][idx] = value / w00;
                }
            }
        }
        self.values = rational;
    }

    fn slot(&self, k: usize, l: usize) -> usize {
        k * (self.order_v + 1) + l
    }

    pub fn order_u(&self) -> usize {
        self.order_u
    }

    pub fn order_v(&self) -> usize {
        self.order_v
    }

    pub fn nb_nonzero_poles(&self) -> usize {
        self.nb_u * self.nb_v
    }

    /// Active pole grid indices `(i, j)` in window order.
    pub fn nonzero_pole_indices(&self) -> Vec<(usize, usize)> {
        (0..self.nb_u)
            .flat_map(|a| (0..self.nb_v).map(move |b| (a, b)))
            .map(|(a, b)| (self.first_pole_u + a, self.first_pole_v + b))
            .collect()
    }

    /// Derivative `(k, l)` of the shape function at window position `index`.
    pub fn value(&self, k: usize, l: usize, index: usize) -> f64 {
        self.values[self.slot(k, l)][index]
    }

    pub fn values(&self, k: usize, l: usize) -> &[f64] {
        &self.values[self.slot(k, l)]
    }
}
