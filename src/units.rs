//! Display units for forces and lengths.
//!
//! Frames store forces in tonne-force and lengths in metres. Captions may be
//! shown in other units; the multipliers are derived with `uom` so the
//! conversion constants come from one place.

use serde::{Deserialize, Serialize};
use uom::si::f64::{Force, Length};
use uom::si::force::{kilogram_force, kilonewton, newton};
use uom::si::length::{centimeter, meter, millimeter};

/// Unit used to display forces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForceUnit {
    /// Tonne-force, the storage unit.
    #[default]
    TonneForce,
    /// Kilonewton.
    Kilonewton,
    /// Newton.
    Newton,
}

impl ForceUnit {
    /// Number of display units in one tonne-force.
    #[must_use]
    pub fn per_tonne_force(self) -> f64 {
        let one = Force::new::<kilogram_force>(1000.0);
        match self {
            Self::TonneForce => 1.0,
            Self::Kilonewton => one.get::<kilonewton>(),
            Self::Newton => one.get::<newton>(),
        }
    }
}

/// Unit used to display lengths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthUnit {
    /// Metre, the storage unit.
    #[default]
    Meter,
    /// Centimetre.
    Centimeter,
    /// Millimetre.
    Millimeter,
}

impl LengthUnit {
    /// Number of display units in one metre.
    #[must_use]
    pub fn per_meter(self) -> f64 {
        let one = Length::new::<meter>(1.0);
        match self {
            Self::Meter => 1.0,
            Self::Centimeter => one.get::<centimeter>(),
            Self::Millimeter => one.get::<millimeter>(),
        }
    }
}

/// Multiplier pair converting stored values into display values.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitScale {
    /// Force multiplier.
    pub force: f64,
    /// Length multiplier.
    pub length: f64,
}

impl UnitScale {
    /// Build the multipliers for the given display units.
    ///
    /// # Examples
    /// ```
    /// use framex::{ForceUnit, LengthUnit, UnitScale};
    ///
    /// let scale = UnitScale::from_units(ForceUnit::Kilonewton, LengthUnit::Meter);
    /// assert!((scale.force - 9.80665).abs() < 1.0e-9);
    /// ```
    #[must_use]
    pub fn from_units(force: ForceUnit, length: LengthUnit) -> Self {
        Self {
            force: force.per_tonne_force(),
            length: length.per_meter(),
        }
    }

    /// Multiplier for moments (force times length).
    #[must_use]
    pub fn moment(&self) -> f64 {
        self.force * self.length
    }

    /// Multiplier for stiffnesses (force per length).
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.force / self.length
    }
}

impl Default for UnitScale {
    fn default() -> Self {
        Self {
            force: 1.0,
            length: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn storage_units_are_identity() {
        let scale = UnitScale::from_units(ForceUnit::TonneForce, LengthUnit::Meter);
        assert_eq!(scale, UnitScale::default());
    }

    #[test]
    fn derived_multipliers_combine_force_and_length() {
        let scale = UnitScale::from_units(ForceUnit::Kilonewton, LengthUnit::Centimeter);
        assert_relative_eq!(scale.force, 9.80665, epsilon = 1.0e-9);
        assert_relative_eq!(scale.length, 100.0, epsilon = 1.0e-9);
        assert_relative_eq!(scale.moment(), 980.665, epsilon = 1.0e-6);
        assert_relative_eq!(scale.stiffness(), 0.0980665, epsilon = 1.0e-9);
    }

    #[test]
    fn newton_and_millimetre() {
        assert_relative_eq!(ForceUnit::Newton.per_tonne_force(), 9806.65, epsilon = 1.0e-6);
        assert_relative_eq!(LengthUnit::Millimeter.per_meter(), 1000.0, epsilon = 1.0e-9);
    }
}
