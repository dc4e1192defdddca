pub mod cost;
pub mod energy;
pub mod power;
pub mod rate;

use std::ops::Mul;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

pub use self::{
    cost::Cost,
    energy::KilowattHours,
    power::Kilowatts,
    rate::{KilowattHourRate, KilowattRate},
};

/// Dimensioned `f64`: exponents of kilowatts, hours and dollars.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::Sub,
    derive_more::SubAssign,
    derive_more::Neg,
    derive_more::Sum,
)]
#[from(f64, OrderedFloat<f64>)]
#[serde(transparent)]
#[must_use]
pub struct Quantity<const POWER: isize, const TIME: isize, const COST: isize>(
    pub OrderedFloat<f64>,
);

impl<const POWER: isize, const TIME: isize, const COST: isize> Quantity<POWER, TIME, COST> {
    pub const ZERO: Self = Self(OrderedFloat(0.0));

    pub const fn new(value: f64) -> Self {
        Self(OrderedFloat(value))
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0.0
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0.0 < 0.0
    }
}

impl<const POWER: isize, const TIME: isize, const COST: isize> Default
    for Quantity<POWER, TIME, COST>
{
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const POWER: isize, const TIME: isize, const COST: isize> Mul<f64>
    for Quantity<POWER, TIME, COST>
{
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}
