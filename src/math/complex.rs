//! Purpose: Complex-number value type and the complex functions the math module exports.
//! Exports: `Complex` plus free functions (arithmetic, trig, powers, roots).
//! Role: Computation behind the `Complex`, `ComplexFunctions_*` and `Pow*`/`Sqrt*`/`Cbrt*` exports.
//! Invariants: Multivalued functions take an integer branch; branch 0 is the principal value.
use std::f64::consts::PI;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A complex number with real part `re` and imaginary part `im`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    pub const fn i() -> Self {
        Self::new(0.0, 1.0)
    }

    pub const fn one() -> Self {
        Self::new(1.0, 0.0)
    }

    /// Principal argument, in (-pi, pi].
    pub fn arg(&self) -> f64 {
        self.im.atan2(self.re)
    }

    pub fn magnitude(&self) -> f64 {
        self.re.hypot(self.im)
    }

    pub fn magnitude_squared(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    pub fn conj(&self) -> Self {
        Self::new(self.re, -self.im)
    }

    pub fn scale(&self, r: f64) -> Self {
        Self::new(self.re * r, self.im * r)
    }

    pub fn normalize(&self) -> Self {
        self.scale(1.0 / self.magnitude())
    }

    pub fn is_finite(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    /// Principal natural logarithm.
    pub fn ln(&self) -> Self {
        Self::new(self.magnitude().ln(), self.arg())
    }
}

impl Add for Complex {
    type Output = Complex;

    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Complex;

    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Complex;

    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Div for Complex {
    type Output = Complex;

    fn div(self, rhs: Complex) -> Complex {
        (self * rhs.conj()).scale(1.0 / rhs.magnitude_squared())
    }
}

impl Neg for Complex {
    type Output = Complex;

    fn neg(self) -> Complex {
        Complex::new(-self.re, -self.im)
    }
}

/// e^(i theta) for real theta.
pub fn cis(theta: f64) -> Complex {
    Complex::new(theta.cos(), theta.sin())
}

pub fn exp(z: &Complex) -> Complex {
    cis(z.im).scale(z.re.exp())
}

/// sin(a+bi) = sin a cosh b + i cos a sinh b
pub fn sin(z: &Complex) -> Complex {
    let (a, b) = (z.re, z.im);
    Complex::new(a.sin() * b.cosh(), a.cos() * b.sinh())
}

/// cos(a+bi) = cos a cosh b - i sin a sinh b
pub fn cos(z: &Complex) -> Complex {
    let (a, b) = (z.re, z.im);
    Complex::new(a.cos() * b.cosh(), -a.sin() * b.sinh())
}

/// tan(a+bi) = (tan a + i tanh b) / (1 - i tan a tanh b)
pub fn tan(z: &Complex) -> Complex {
    let tan_a = z.re.tan();
    let tanh_b = z.im.tanh();
    Complex::new(tan_a, tanh_b) / Complex::new(1.0, -tan_a * tanh_b)
}

pub fn sec(z: &Complex) -> Complex {
    Complex::one() / cos(z)
}

pub fn csc(z: &Complex) -> Complex {
    Complex::one() / sin(z)
}

pub fn cot(z: &Complex) -> Complex {
    Complex::one() / tan(z)
}

/// Principal value of z^w.
pub fn pow(z: &Complex, w: &Complex) -> Complex {
    exp(&(*w * z.ln()))
}

/// z^w on the given branch of log z.
pub fn pow_branched(z: &Complex, w: &Complex, branch: i32) -> Complex {
    let turn = Complex::i() * w.scale(2.0 * PI * f64::from(branch));
    pow(z, w) * exp(&turn)
}

/// z^r for real r.
pub fn pow_r(z: &Complex, r: f64) -> Complex {
    pow(z, &Complex::new(r, 0.0))
}

pub fn pow_r_branched(z: &Complex, r: f64, branch: i32) -> Complex {
    pow_branched(z, &Complex::new(r, 0.0), branch)
}

/// r^z for real r; a negative base uses arg pi.
pub fn pow_z(r: f64, z: &Complex) -> Complex {
    if r == 0.0 {
        return Complex::default();
    }
    let log_r = Complex::new(r.abs().ln(), if r > 0.0 { 0.0 } else { PI });
    exp(&(*z * log_r))
}

/// z^n for integer n.
pub fn pow_n(z: &Complex, n: i32) -> Complex {
    match n {
        0 => Complex::one(),
        1 => *z,
        -1 => z.conj().scale(1.0 / z.magnitude_squared()),
        2 => *z * *z,
        _ => cis(z.arg() * f64::from(n)).scale(z.magnitude().powi(n)),
    }
}

/// Principal square root.
pub fn sqrt(z: &Complex) -> Complex {
    if z.im.abs() < 1.0e-17 {
        let r = z.re;
        return if r >= 0.0 {
            Complex::new(r.sqrt(), 0.0)
        } else {
            Complex::new(0.0, (-r).sqrt())
        };
    }
    let r = z.magnitude();
    (*z + Complex::new(r, 0.0)).normalize().scale(r.sqrt())
}

pub fn sqrt_branched(z: &Complex, branch: i32) -> Complex {
    if branch % 2 == 0 { sqrt(z) } else { -sqrt(z) }
}

pub fn cbrt(z: &Complex) -> Complex {
    pow_r(z, 1.0 / 3.0)
}

pub fn cbrt_branched(z: &Complex, branch: i32) -> Complex {
    pow_r_branched(z, 1.0 / 3.0, branch)
}
