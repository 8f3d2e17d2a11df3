use std::fmt;
use std::str::FromStr;

use crate::error::RotationError;
use crate::linalg::Vec3;

/// A coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn from_char(c: char) -> Result<Axis, RotationError> {
        match c {
            'X' => Ok(Axis::X),
            'Y' => Ok(Axis::Y),
            'Z' => Ok(Axis::Z),
            other => Err(RotationError::UnknownAxis(other.to_string())),
        }
    }

    pub fn unit_vector(self) -> Vec3 {
        match self {
            Axis::X => [1.0, 0.0, 0.0],
            Axis::Y => [0.0, 1.0, 0.0],
            Axis::Z => [0.0, 0.0, 1.0],
        }
    }

    /// Position of this axis' component in `(x, y, z)`.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
        }
    }
}

impl FromStr for Axis {
    type Err = RotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Axis::from_char(c),
            _ => Err(RotationError::UnknownAxis(s.to_string())),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Order in which three Euler rotations are applied, e.g. `YXZ`.
///
/// Always three distinct axes, so every value is one of the six permutations
/// of `XYZ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct AxisOrder([Axis; 3]);

impl AxisOrder {
    pub const XYZ: AxisOrder = AxisOrder([Axis::X, Axis::Y, Axis::Z]);
    pub const XZY: AxisOrder = AxisOrder([Axis::X, Axis::Z, Axis::Y]);
    pub const YXZ: AxisOrder = AxisOrder([Axis::Y, Axis::X, Axis::Z]);
    pub const YZX: AxisOrder = AxisOrder([Axis::Y, Axis::Z, Axis::X]);
    pub const ZXY: AxisOrder = AxisOrder([Axis::Z, Axis::X, Axis::Y]);
    pub const ZYX: AxisOrder = AxisOrder([Axis::Z, Axis::Y, Axis::X]);

    pub const ALL: [AxisOrder; 6] = [
        AxisOrder::XYZ,
        AxisOrder::XZY,
        AxisOrder::YXZ,
        AxisOrder::YZX,
        AxisOrder::ZXY,
        AxisOrder::ZYX,
    ];

    /// Build an order from three axes, rejecting repeats.
    pub fn new(first: Axis, second: Axis, third: Axis) -> Option<AxisOrder> {
        if first == second || first == third || second == third {
            return None;
        }
        Some(AxisOrder([first, second, third]))
    }

    pub fn axes(&self) -> [Axis; 3] {
        self.0
    }

    /// `sign((e3 x e2) . e1)`: `-1` for the cyclic orders (`XYZ`, `YZX`, `ZXY`),
    /// `+1` for the others.
    pub fn handedness(&self) -> f64 {
        let [a1, a2, a3] = self.0;
        let e1 = a1.unit_vector();
        let e2 = a2.unit_vector();
        let e3 = a3.unit_vector();
        let triple = crate::linalg::dot(&crate::linalg::cross(&e3, &e2), &e1);
        if triple < 0.0 {
            -1.0
        } else {
            1.0
        }
    }
}

/// True when `order` is exactly three characters from `X`, `Y`, `Z` with no repeats.
pub fn axis_order_is_valid(order: &str) -> bool {
    order.parse::<AxisOrder>().is_ok()
}

/// Unit vector for an axis letter.
pub fn axis_from_string(axis: &str) -> Result<Vec3, RotationError> {
    Ok(axis.parse::<Axis>()?.unit_vector())
}

impl FromStr for AxisOrder {
    type Err = RotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RotationError::InvalidAxisOrder(s.to_string());
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 3 {
            return Err(invalid());
        }
        let mut axes = [Axis::X; 3];
        for (slot, &c) in axes.iter_mut().zip(&chars) {
            *slot = Axis::from_char(c).map_err(|_| invalid())?;
        }
        AxisOrder::new(axes[0], axes[1], axes[2]).ok_or_else(invalid)
    }
}

impl TryFrom<String> for AxisOrder {
    type Error = RotationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AxisOrder> for String {
    fn from(order: AxisOrder) -> String {
        order.to_string()
    }
}

impl fmt::Display for AxisOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for axis in self.0 {
            write!(f, "{axis}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_orders() {
        for order in ["XYZ", "XZY", "YXZ", "YZX", "ZXY", "ZYX"] {
            assert!(axis_order_is_valid(order), "{order} should be valid");
        }
    }

    #[test]
    fn invalid_orders() {
        for order in ["XYX", "ZZY", "ABC", "xyz", "XY", "XYZX", "", "X Y"] {
            assert!(!axis_order_is_valid(order), "{order:?} should be invalid");
        }
    }

    #[test]
    fn parse_error_keeps_input() {
        let err = "XYX".parse::<AxisOrder>().unwrap_err();
        assert_eq!(err, RotationError::InvalidAxisOrder("XYX".to_string()));
    }

    #[test]
    fn display_roundtrip() {
        for order in AxisOrder::ALL {
            let s = order.to_string();
            assert_eq!(s.parse::<AxisOrder>().unwrap(), order);
        }
    }

    #[test]
    fn axis_from_string_maps_unit_vectors() {
        assert_eq!(axis_from_string("X").unwrap(), [1.0, 0.0, 0.0]);
        assert_eq!(axis_from_string("Y").unwrap(), [0.0, 1.0, 0.0]);
        assert_eq!(axis_from_string("Z").unwrap(), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn axis_from_string_rejects_unknown() {
        for bad in ["W", "x", "", "XY"] {
            assert_eq!(
                axis_from_string(bad),
                Err(RotationError::UnknownAxis(bad.to_string()))
            );
        }
    }

    #[test]
    fn handedness_splits_even_and_odd() {
        assert_eq!(AxisOrder::XYZ.handedness(), -1.0);
        assert_eq!(AxisOrder::YZX.handedness(), -1.0);
        assert_eq!(AxisOrder::ZXY.handedness(), -1.0);
        assert_eq!(AxisOrder::XZY.handedness(), 1.0);
        assert_eq!(AxisOrder::YXZ.handedness(), 1.0);
        assert_eq!(AxisOrder::ZYX.handedness(), 1.0);
    }

    #[test]
    fn new_rejects_repeats() {
        assert!(AxisOrder::new(Axis::X, Axis::X, Axis::Z).is_none());
        assert_eq!(
            AxisOrder::new(Axis::Y, Axis::X, Axis::Z),
            Some(AxisOrder::YXZ)
        );
    }
}
