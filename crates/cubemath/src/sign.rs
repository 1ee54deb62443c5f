//! Simple `Sign` type.

use std::fmt;
use std::ops::{Mul, MulAssign, Neg};

use num_traits::Signed;

/// Positive or negative.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Sign {
    /// Positive
    #[default]
    Pos,
    /// Negative
    Neg,
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Pos => write!(f, "+"),
            Sign::Neg => write!(f, "-"),
        }
    }
}

impl Neg for Sign {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Sign::Pos => Sign::Neg,
            Sign::Neg => Sign::Pos,
        }
    }
}

impl Sign {
    /// Returns `1` or `-1`.
    pub fn to_num<T: Signed>(self) -> T {
        match self {
            Sign::Pos => T::one(),
            Sign::Neg => -T::one(),
        }
    }
}

/// Implements `Mul<Sign>` and `MulAssign<Sign>` for a type that implements
/// `Neg`.
macro_rules! impl_mul_sign {
    ($($t:ty),* $(,)?) => {
        $(
            impl Mul<Sign> for $t {
                type Output = Self;

                fn mul(self, rhs: Sign) -> Self {
                    match rhs {
                        Sign::Pos => self,
                        Sign::Neg => -self,
                    }
                }
            }
            impl MulAssign<Sign> for $t {
                fn mul_assign(&mut self, rhs: Sign) {
                    *self = *self * rhs;
                }
            }
        )*
    };
}

impl_mul_sign!(Sign, i32, f32);
