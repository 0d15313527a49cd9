//! Physical constants (SI unless noted).

/// Speed of light in vacuum (m/s).
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Reduced Planck constant times c (eV·m).
pub const HBAR_C_EV_M: f64 = 1.973_269_804e-7;

/// Fine-structure constant.
pub const FINE_STRUCTURE: f64 = 7.297_352_569_3e-3;

/// Classical electron radius (m).
pub const ELECTRON_RADIUS: f64 = 2.817_940_326_2e-15;

/// Electron rest energy (eV).
pub const ELECTRON_MASS_EV: f64 = 510_998.950_00;

/// Slack added before flooring `pos / circumference` so that positions a
/// rounding error short of a turn boundary land in the next turn.
pub const TURN_EPSILON: f64 = 1e-10;

/// Tolerance for comparing element lengths.
pub const LENGTH_TOLERANCE: f64 = 1e-9;
