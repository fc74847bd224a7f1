use ak_mem::Element;

/// Multiply a staged `m x k` block by a staged `k x n` block, adding each
/// product into the `m x n` accumulator tile.
///
/// The reduction walks the inner index in ascending order, so repeated calls
/// over consecutive inner blocks extend one left-to-right running sum per
/// output element. Callers size the slices: `a` holds `m * k` elements, `b`
/// holds `k * n` and `acc` holds `m * n`, all row-major.
pub fn accumulate<T: Element>(a: &[T], b: &[T], acc: &mut [T::Acc], m: usize, k: usize, n: usize) {
    debug_assert_eq!(a.len(), m * k);
    debug_assert_eq!(b.len(), k * n);
    debug_assert_eq!(acc.len(), m * n);

    for i in 0..m {
        for j in 0..n {
            let mut sum = acc[i * n + j];
            for p in 0..k {
                sum = T::mul_acc(sum, a[i * k + p], b[p * n + j]);
            }
            acc[i * n + j] = sum;
        }
    }
}
