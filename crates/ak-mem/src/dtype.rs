use std::fmt;

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
}

/// Element type of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit signed integer.
    I32,
    /// 32-bit IEEE 754 floating point.
    F32,
}

impl DType {
    /// Size of one element in bytes.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            DType::I32 | DType::F32 => 4,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::I32 => write!(f, "i32"),
            DType::F32 => write!(f, "f32"),
        }
    }
}

/// A numeric element the kernels operate on.
///
/// The kernels handle exactly two element kinds, `i32` and `f32`, and never
/// mix them within one invocation; the trait is sealed to keep it that way.
/// `Acc` is the accumulator for the reduction over the shared dimension:
/// wide enough that integer partial products cannot overflow it, and plain
/// single precision for floats so a fixed left-to-right reduction order gives
/// bit-identical results on every run.
pub trait Element:
    sealed::Sealed + Copy + PartialEq + fmt::Debug + Send + Sync + 'static
{
    /// Running-sum type for one output element.
    type Acc: Copy + fmt::Debug;

    /// The dtype tag for this element type.
    const DTYPE: DType;
    /// Additive identity.
    const ZERO: Self;
    /// Multiplicative identity.
    const ONE: Self;

    /// A fresh accumulator holding zero.
    fn acc_zero() -> Self::Acc;

    /// One multiply-accumulate step: `acc + lhs * rhs`.
    fn mul_acc(acc: Self::Acc, lhs: Self, rhs: Self) -> Self::Acc;

    /// Narrow a finished accumulator back to the element type.
    ///
    /// Integer accumulators truncate to 32-bit two's complement; sums that
    /// fit in `i32` come back exact. Float accumulators pass through
    /// unchanged.
    fn narrow(acc: Self::Acc) -> Self;
}

impl Element for i32 {
    type Acc = i64;

    const DTYPE: DType = DType::I32;
    const ZERO: Self = 0;
    const ONE: Self = 1;

    fn acc_zero() -> i64 {
        0
    }

    fn mul_acc(acc: i64, lhs: i32, rhs: i32) -> i64 {
        acc + lhs as i64 * rhs as i64
    }

    fn narrow(acc: i64) -> i32 {
        acc as i32
    }
}

impl Element for f32 {
    type Acc = f32;

    const DTYPE: DType = DType::F32;
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    fn acc_zero() -> f32 {
        0.0
    }

    fn mul_acc(acc: f32, lhs: f32, rhs: f32) -> f32 {
        acc + lhs * rhs
    }

    fn narrow(acc: f32) -> f32 {
        acc
    }
}
