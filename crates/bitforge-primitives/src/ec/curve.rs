//! secp256k1 point operations.
//!
//! Thin adapter over k256 exposing the three curve services the key codecs
//! need: point validity, generator multiplication, and y-recovery for
//! compressed points. Coordinates cross this boundary as big integers.

use std::fmt;

use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{AffinePoint, EncodedPoint, FieldBytes, NonZeroScalar, ProjectivePoint, Scalar};
use num_bigint::BigUint;

/// Width in bytes of a serialized field element.
pub const COORDINATE_LEN: usize = 32;

/// An affine point given by its coordinates.
///
/// Holding a `Point` says nothing about curve membership; `PublicKey`
/// checks that on construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    /// The x coordinate.
    pub x: BigUint,
    /// The y coordinate.
    pub y: BigUint,
}

impl Point {
    /// Create a point from its coordinates.
    pub fn new(x: BigUint, y: BigUint) -> Self {
        Point { x, y }
    }

    /// The secp256k1 generator point.
    pub fn generator() -> Self {
        Self::from_affine(&AffinePoint::GENERATOR)
    }

    /// Whether the y coordinate is odd.
    pub fn is_y_odd(&self) -> bool {
        self.y.bit(0)
    }

    fn from_affine(point: &AffinePoint) -> Self {
        let encoded = point.to_encoded_point(false);
        let coordinate =
            |c: Option<&FieldBytes>| c.map(|b| BigUint::from_bytes_be(b)).unwrap_or_default();
        Point {
            x: coordinate(encoded.x()),
            y: coordinate(encoded.y()),
        }
    }

    fn to_affine(&self) -> Option<AffinePoint> {
        let x = coordinate_bytes(&self.x)?;
        let y = coordinate_bytes(&self.y)?;
        let encoded = EncodedPoint::from_affine_coordinates(
            &FieldBytes::from(x),
            &FieldBytes::from(y),
            false,
        );
        AffinePoint::from_encoded_point(&encoded).into()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:064x}, {:064x})", self.x, self.y)
    }
}

/// Serialize a coordinate as a fixed-width big-endian field element.
///
/// Returns `None` if the value does not fit in 32 bytes.
pub fn coordinate_bytes(value: &BigUint) -> Option<[u8; COORDINATE_LEN]> {
    let raw = value.to_bytes_be();
    if raw.len() > COORDINATE_LEN {
        return None;
    }
    let mut out = [0u8; COORDINATE_LEN];
    out[COORDINATE_LEN - raw.len()..].copy_from_slice(&raw);
    Some(out)
}

/// Check that `point` satisfies the curve equation with canonical coordinates.
pub fn is_valid_point(point: &Point) -> bool {
    point.to_affine().is_some()
}

/// Compute `scalar * G`.
pub fn multiply_generator(scalar: &NonZeroScalar) -> Point {
    let scalar: &Scalar = scalar.as_ref();
    let product = ProjectivePoint::GENERATOR * scalar;
    Point::from_affine(&product.to_affine())
}

/// Recover the full point for a compressed x coordinate.
///
/// # Arguments
/// * `x` - The x coordinate.
/// * `y_is_odd` - Parity of the wanted y, as carried by the 0x02/0x03 prefix.
///
/// # Returns
/// The point, or `None` if `x` is not the x coordinate of any curve point.
pub fn decompress(x: &BigUint, y_is_odd: bool) -> Option<Point> {
    let x = coordinate_bytes(x)?;
    let mut sec = [0u8; 1 + COORDINATE_LEN];
    sec[0] = if y_is_odd { 0x03 } else { 0x02 };
    sec[1..].copy_from_slice(&x);
    let encoded = EncodedPoint::from_bytes(sec).ok()?;
    let point: Option<AffinePoint> = AffinePoint::from_encoded_point(&encoded).into();
    point.map(|p| Point::from_affine(&p))
}
