//! `std::ops` implementations for `GDual<F>`.
//!
//! Every operator delegates to the named method on [`GDual`], so operands
//! are never mutated and compound assignment is "replace with the result".
//! `/` panics on a singular denominator; use [`GDual::try_div`] to get the
//! error instead.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::float::Float;
use crate::gdual::GDual;

fn div_or_panic<F: Float>(lhs: &GDual<F>, rhs: &GDual<F>) -> GDual<F> {
    match lhs.try_div(rhs) {
        Ok(q) => q,
        Err(e) => panic!("{e}"),
    }
}

// ══════════════════════════════════════════════
//  GDual<F> ↔ GDual<F>
// ══════════════════════════════════════════════

// Owned and borrowed operands, all four combinations.
macro_rules! impl_gdual_binop {
    ($trait:ident, $method:ident, $f:expr) => {
        impl<F: Float> $trait for GDual<F> {
            type Output = GDual<F>;
            #[inline]
            fn $method(self, rhs: GDual<F>) -> GDual<F> {
                $f(&self, &rhs)
            }
        }

        impl<F: Float> $trait<&GDual<F>> for GDual<F> {
            type Output = GDual<F>;
            #[inline]
            fn $method(self, rhs: &GDual<F>) -> GDual<F> {
                $f(&self, rhs)
            }
        }

        impl<F: Float> $trait<GDual<F>> for &GDual<F> {
            type Output = GDual<F>;
            #[inline]
            fn $method(self, rhs: GDual<F>) -> GDual<F> {
                $f(self, &rhs)
            }
        }

        impl<F: Float> $trait<&GDual<F>> for &GDual<F> {
            type Output = GDual<F>;
            #[inline]
            fn $method(self, rhs: &GDual<F>) -> GDual<F> {
                $f(self, rhs)
            }
        }
    };
}

impl_gdual_binop!(Add, add, GDual::add);
impl_gdual_binop!(Sub, sub, GDual::sub);
impl_gdual_binop!(Mul, mul, GDual::mul);
impl_gdual_binop!(Div, div, div_or_panic);

impl<F: Float> Neg for GDual<F> {
    type Output = GDual<F>;
    #[inline]
    fn neg(self) -> GDual<F> {
        GDual::neg(&self)
    }
}

impl<F: Float> Neg for &GDual<F> {
    type Output = GDual<F>;
    #[inline]
    fn neg(self) -> GDual<F> {
        GDual::neg(self)
    }
}

macro_rules! impl_gdual_assign {
    ($trait:ident, $method:ident, $f:expr) => {
        impl<F: Float> $trait for GDual<F> {
            #[inline]
            fn $method(&mut self, rhs: GDual<F>) {
                *self = $f(&*self, &rhs);
            }
        }

        impl<F: Float> $trait<&GDual<F>> for GDual<F> {
            #[inline]
            fn $method(&mut self, rhs: &GDual<F>) {
                *self = $f(&*self, rhs);
            }
        }
    };
}

impl_gdual_assign!(AddAssign, add_assign, GDual::add);
impl_gdual_assign!(SubAssign, sub_assign, GDual::sub);
impl_gdual_assign!(MulAssign, mul_assign, GDual::mul);
impl_gdual_assign!(DivAssign, div_assign, div_or_panic);

// ══════════════════════════════════════════════
//  Mixed ops: GDual<F> with primitive floats
// ══════════════════════════════════════════════

// `$g` is the gdual operand type, owned or borrowed.
macro_rules! impl_gdual_scalar_binops {
    ($f:ty, $g:ty) => {
        impl Add<$f> for $g {
            type Output = GDual<$f>;
            #[inline]
            fn add(self, rhs: $f) -> GDual<$f> {
                self.add_scalar(rhs)
            }
        }

        impl Add<$g> for $f {
            type Output = GDual<$f>;
            #[inline]
            fn add(self, rhs: $g) -> GDual<$f> {
                rhs.add_scalar(self)
            }
        }

        impl Sub<$f> for $g {
            type Output = GDual<$f>;
            #[inline]
            fn sub(self, rhs: $f) -> GDual<$f> {
                self.add_scalar(-rhs)
            }
        }

        impl Sub<$g> for $f {
            type Output = GDual<$f>;
            #[inline]
            fn sub(self, rhs: $g) -> GDual<$f> {
                let rhs: &GDual<$f> = &rhs;
                GDual::neg(rhs).add_scalar(self)
            }
        }

        impl Mul<$f> for $g {
            type Output = GDual<$f>;
            #[inline]
            fn mul(self, rhs: $f) -> GDual<$f> {
                self.scale(rhs)
            }
        }

        impl Mul<$g> for $f {
            type Output = GDual<$f>;
            #[inline]
            fn mul(self, rhs: $g) -> GDual<$f> {
                rhs.scale(self)
            }
        }

        // Dividing by a plain float is scaling by its reciprocal; a zero
        // divisor yields non-finite coefficients, as for primitive floats.
        #[allow(clippy::suspicious_arithmetic_impl)]
        impl Div<$f> for $g {
            type Output = GDual<$f>;
            #[inline]
            fn div(self, rhs: $f) -> GDual<$f> {
                self.scale(1.0 / rhs)
            }
        }

        impl Div<$g> for $f {
            type Output = GDual<$f>;
            #[inline]
            fn div(self, rhs: $g) -> GDual<$f> {
                let rhs: &GDual<$f> = &rhs;
                div_or_panic(&rhs.constant_like(self), rhs)
            }
        }
    };
}

macro_rules! impl_gdual_scalar_ops {
    ($f:ty) => {
        impl_gdual_scalar_binops!($f, GDual<$f>);
        impl_gdual_scalar_binops!($f, &GDual<$f>);

        impl AddAssign<$f> for GDual<$f> {
            #[inline]
            fn add_assign(&mut self, rhs: $f) {
                *self = self.add_scalar(rhs);
            }
        }

        impl SubAssign<$f> for GDual<$f> {
            #[inline]
            fn sub_assign(&mut self, rhs: $f) {
                *self = self.add_scalar(-rhs);
            }
        }

        impl MulAssign<$f> for GDual<$f> {
            #[inline]
            fn mul_assign(&mut self, rhs: $f) {
                *self = self.scale(rhs);
            }
        }

        impl DivAssign<$f> for GDual<$f> {
            #[inline]
            fn div_assign(&mut self, rhs: $f) {
                *self = self.scale(1.0 / rhs);
            }
        }
    };
}

impl_gdual_scalar_ops!(f32);
impl_gdual_scalar_ops!(f64);
