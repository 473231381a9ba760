use ndarray::{Array2, ArrayView1, Zip};

/// A trait that provides easy access to the first element of a slice.
pub trait Front<T> {
    fn front(&self) -> &T;
    fn mut_front(&mut self) -> &mut T;
}

/// A trait that provides easy access to the last element of a slice.
pub trait Back<T> {
    fn back(&self) -> &T;
}

impl<T> Front<T> for [T] {
    #[inline(always)]
    fn front(&self) -> &T {
        &self[0]
    }
    #[inline(always)]
    fn mut_front(&mut self) -> &mut T {
        &mut self[0]
    }
}

impl<T> Back<T> for [T] {
    #[inline(always)]
    fn back(&self) -> &T {
        &self[self.len() - 1]
    }
}

/// Overwrites `out` with the scaled outer product `alpha * x * y^T`.
///
/// `out` must be `x.len()` by `y.len()`.
pub fn outer_into(
    out: &mut Array2<f64>,
    alpha: f64,
    x: ArrayView1<'_, f64>,
    y: ArrayView1<'_, f64>,
) {
    assert_eq!(out.dim(), (x.len(), y.len()));
    Zip::from(out.rows_mut()).and(&x).for_each(|mut row, &xi| {
        row.zip_mut_with(&y, |o, &yj| *o = alpha * xi * yj);
    });
}

/// Squared difference between a target and a prediction.
#[inline]
pub fn squared_error(target: f64, prediction: f64) -> f64 {
    (target - prediction) * (target - prediction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn outer_product_overwrites() {
        let mut out = Array2::from_elem((2, 3), 7.0);
        let x = array![1.0, -2.0];
        let y = array![0.5, 1.0, 0.0];
        outer_into(&mut out, 2.0, x.view(), y.view());
        assert_eq!(out, array![[1.0, 2.0, 0.0], [-2.0, -4.0, 0.0]]);
    }

    #[test]
    #[should_panic]
    fn outer_product_checks_shape() {
        let mut out = Array2::zeros((2, 2));
        let x = array![1.0, 2.0, 3.0];
        outer_into(&mut out, 1.0, x.view(), x.view());
    }

    #[test]
    fn front_and_back() {
        let mut v = [1, 2, 3];
        assert_eq!(*v.front(), 1);
        assert_eq!(*v.back(), 3);
        *v.mut_front() = 0;
        assert_eq!(v, [0, 2, 3]);
    }
}
