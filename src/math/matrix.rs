use rand::Rng;

/// Dense row-major matrix of `f64`.
///
/// Rows are samples and columns are features or units everywhere in this
/// crate, so a batch of `n` inputs to a layer of fan-in `k` is an `n × k`
/// matrix and the layer's weights are `k × units`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix { rows, cols, data: vec![0.0; rows * cols] }
    }

    /// Builds a matrix from a flat row-major buffer.
    ///
    /// # Panics
    /// Panics if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Matrix {
        assert_eq!(data.len(), rows * cols, "buffer does not match {}x{}", rows, cols);
        Matrix { rows, cols, data }
    }

    /// Stacks equally long rows into a matrix. An empty slice gives a `0 × 0`
    /// matrix.
    pub fn from_rows(rows: &[Vec<f64>]) -> Matrix {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            assert_eq!(row.len(), cols, "ragged rows");
            data.extend_from_slice(row);
        }
        Matrix { rows: rows.len(), cols, data }
    }

    /// Copies the selected rows (in the given order) into a new matrix.
    pub fn gather_rows(source: &[Vec<f64>], indices: &[usize]) -> Matrix {
        let cols = source.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(indices.len() * cols);
        for &i in indices {
            data.extend_from_slice(&source[i]);
        }
        Matrix { rows: indices.len(), cols, data }
    }

    /// Glorot (Xavier) uniform initialization: samples from
    /// `U(-b, b)` with `b = sqrt(factor / (rows + cols))`.
    ///
    /// `factor` is 6 for most activations and 2 for the logistic function.
    pub fn glorot_uniform<R: Rng>(rows: usize, cols: usize, factor: f64, rng: &mut R) -> Matrix {
        let bound = (factor / (rows + cols) as f64).sqrt();
        let data = (0..rows * cols)
            .map(|_| rng.gen_range(-bound..bound))
            .collect();
        Matrix { rows, cols, data }
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// `self · rhs`
    pub fn dot(&self, rhs: &Matrix) -> Matrix {
        assert_eq!(self.cols, rhs.rows, "Matrices are of incorrect sizes");
        let mut res = Matrix::zeros(self.rows, rhs.cols);
        for i in 0..self.rows {
            let out = &mut res.data[i * rhs.cols..(i + 1) * rhs.cols];
            for k in 0..self.cols {
                let a = self.data[i * self.cols + k];
                if a == 0.0 {
                    continue;
                }
                for (o, b) in out.iter_mut().zip(rhs.row(k)) {
                    *o += a * b;
                }
            }
        }
        res
    }

    /// `selfᵀ · rhs`
    pub fn t_dot(&self, rhs: &Matrix) -> Matrix {
        assert_eq!(self.rows, rhs.rows, "Matrices are of incorrect sizes");
        let mut res = Matrix::zeros(self.cols, rhs.cols);
        for k in 0..self.rows {
            let left = self.row(k);
            let right = rhs.row(k);
            for (i, &a) in left.iter().enumerate() {
                if a == 0.0 {
                    continue;
                }
                let out = &mut res.data[i * rhs.cols..(i + 1) * rhs.cols];
                for (o, b) in out.iter_mut().zip(right) {
                    *o += a * b;
                }
            }
        }
        res
    }

    /// `self · rhsᵀ`
    pub fn dot_t(&self, rhs: &Matrix) -> Matrix {
        assert_eq!(self.cols, rhs.cols, "Matrices are of incorrect sizes");
        let mut res = Matrix::zeros(self.rows, rhs.rows);
        for i in 0..self.rows {
            let left = self.row(i);
            for j in 0..rhs.rows {
                res.data[i * rhs.rows + j] = left.iter().zip(rhs.row(j)).map(|(a, b)| a * b).sum();
            }
        }
        res
    }

    /// Adds `bias[j]` to every element of column `j`.
    pub fn add_row(&mut self, bias: &[f64]) {
        assert_eq!(bias.len(), self.cols, "bias width mismatch");
        for row in self.data.chunks_mut(self.cols.max(1)) {
            for (x, b) in row.iter_mut().zip(bias) {
                *x += b;
            }
        }
    }

    /// Sum of each column.
    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.cols];
        for row in self.data.chunks(self.cols.max(1)) {
            for (s, x) in sums.iter_mut().zip(row) {
                *s += x;
            }
        }
        sums
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| functor(x)).collect(),
        }
    }

    /// Element-wise (Hadamard) product, in place.
    pub fn hadamard_assign(&mut self, rhs: &Matrix) {
        assert_eq!((self.rows, self.cols), (rhs.rows, rhs.cols), "Matrices are of incorrect sizes");
        for (a, b) in self.data.iter_mut().zip(&rhs.data) {
            *a *= b;
        }
    }

    pub fn squared_sum(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum()
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}
