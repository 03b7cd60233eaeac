use crate::error::{AatError, Result};
use num_complex::Complex64;
use std::ops::Index;

/// Dense rank-4 doubles amplitude tensor indexed `(i, j, a, b)` with
/// `i, j` active occupied and `a, b` virtual orbitals, row-major storage.
#[derive(Debug, Clone, PartialEq)]
pub struct DoublesAmplitudes {
    n_occ: usize,
    n_virt: usize,
    data: Vec<Complex64>,
}

impl DoublesAmplitudes {
    pub fn zeros(n_occ: usize, n_virt: usize) -> Self {
        DoublesAmplitudes {
            n_occ,
            n_virt,
            data: vec![Complex64::new(0.0, 0.0); n_occ * n_occ * n_virt * n_virt],
        }
    }

    /// Wraps a flat row-major buffer; its length must be `n_occ² · n_virt²`.
    pub fn from_vec(n_occ: usize, n_virt: usize, data: Vec<Complex64>) -> Result<Self> {
        let expected = n_occ * n_occ * n_virt * n_virt;
        if data.len() != expected {
            return Err(AatError::InvalidConfiguration(format!(
                "doubles amplitudes of shape ({n_occ}, {n_occ}, {n_virt}, {n_virt}) need {expected} values, got {}",
                data.len()
            )));
        }
        Ok(DoublesAmplitudes {
            n_occ,
            n_virt,
            data,
        })
    }

    pub fn from_fn<F>(n_occ: usize, n_virt: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize, usize) -> Complex64,
    {
        let mut data = Vec::with_capacity(n_occ * n_occ * n_virt * n_virt);
        for i in 0..n_occ {
            for j in 0..n_occ {
                for a in 0..n_virt {
                    for b in 0..n_virt {
                        data.push(f(i, j, a, b));
                    }
                }
            }
        }
        DoublesAmplitudes {
            n_occ,
            n_virt,
            data,
        }
    }

    pub fn n_occ(&self) -> usize {
        self.n_occ
    }

    pub fn n_virt(&self) -> usize {
        self.n_virt
    }

    pub fn shape(&self) -> (usize, usize, usize, usize) {
        (self.n_occ, self.n_occ, self.n_virt, self.n_virt)
    }

    pub fn as_slice(&self) -> &[Complex64] {
        &self.data
    }

    #[inline]
    fn offset(&self, i: usize, j: usize, a: usize, b: usize) -> usize {
        ((i * self.n_occ + j) * self.n_virt + a) * self.n_virt + b
    }

    /// Same-spin combination `t[i,j,a,b] - t[i,j,b,a]`.
    #[inline]
    pub fn antisymmetrized(&self, i: usize, j: usize, a: usize, b: usize) -> Complex64 {
        self[(i, j, a, b)] - self[(i, j, b, a)]
    }

    pub fn scaled(&self, factor: Complex64) -> Self {
        DoublesAmplitudes {
            n_occ: self.n_occ,
            n_virt: self.n_virt,
            data: self.data.iter().map(|t| t * factor).collect(),
        }
    }

    pub fn conj(&self) -> Self {
        DoublesAmplitudes {
            n_occ: self.n_occ,
            n_virt: self.n_virt,
            data: self.data.iter().map(|t| t.conj()).collect(),
        }
    }

    /// Weight of the doubles manifold in the closed-shell wavefunction,
    /// <D|D> = Re Σ t*[i,j,a,b] (2 t[i,j,a,b] - t[i,j,b,a]).
    pub fn norm_squared(&self) -> f64 {
        let mut sum = 0.0;
        for i in 0..self.n_occ {
            for j in 0..self.n_occ {
                for a in 0..self.n_virt {
                    for b in 0..self.n_virt {
                        let t = self[(i, j, a, b)];
                        sum += (t.conj() * (2.0 * t - self[(i, j, b, a)])).re;
                    }
                }
            }
        }
        sum
    }

    /// Largest deviation from `t[i,j,a,b] = t[j,i,b,a]`.
    pub fn pair_symmetry_error(&self) -> f64 {
        let mut max_err: f64 = 0.0;
        for i in 0..self.n_occ {
            for j in 0..self.n_occ {
                for a in 0..self.n_virt {
                    for b in 0..self.n_virt {
                        let err = (self[(i, j, a, b)] - self[(j, i, b, a)]).norm();
                        max_err = max_err.max(err);
                    }
                }
            }
        }
        max_err
    }

    /// Expands into spin-orbital amplitudes over interleaved spin orbitals
    /// (`P = 2p + σ`):
    ///
    /// t_{IJ}^{AB} = t[i,j,a,b] δ(σI,σA) δ(σJ,σB) - t[i,j,b,a] δ(σI,σB) δ(σJ,σA)
    ///
    /// The result is antisymmetric in `(I, J)` and in `(A, B)`.
    pub fn to_spin_orbital(&self) -> DoublesAmplitudes {
        let zero = Complex64::new(0.0, 0.0);
        DoublesAmplitudes::from_fn(2 * self.n_occ, 2 * self.n_virt, |p, q, r, s| {
            let (i, si) = (p / 2, p % 2);
            let (j, sj) = (q / 2, q % 2);
            let (a, sa) = (r / 2, r % 2);
            let (b, sb) = (s / 2, s % 2);
            let mut t = zero;
            if si == sa && sj == sb {
                t += self[(i, j, a, b)];
            }
            if si == sb && sj == sa {
                t -= self[(i, j, b, a)];
            }
            t
        })
    }
}

impl Index<(usize, usize, usize, usize)> for DoublesAmplitudes {
    type Output = Complex64;

    #[inline]
    fn index(&self, (i, j, a, b): (usize, usize, usize, usize)) -> &Complex64 {
        &self.data[self.offset(i, j, a, b)]
    }
}
