//! secp256k1 scalar and point arithmetic for key derivation.
//!
//! Everything here is a thin layer over `k256`, whose scalar operations are
//! constant-time. Scalars and coordinates cross this boundary as 32-byte
//! big-endian arrays, so they are always left-padded to full width.

use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::PrimeField;
use k256::{AffinePoint, FieldBytes, NonZeroScalar, ProjectivePoint, PublicKey, Scalar, SecretKey, U256};

use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Order `n` of the secp256k1 base point, big-endian.
pub const CURVE_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// Affine `(x, y)` coordinates, each 32 bytes big-endian.
pub type Coordinates = ([u8; 32], [u8; 32]);

/// Parse a big-endian scalar, rejecting values `>= n`. Zero is accepted.
pub fn parse_scalar(bytes: &[u8; 32]) -> Option<Scalar> {
    Scalar::from_repr(FieldBytes::from(*bytes)).into()
}

/// Parse a private scalar, rejecting zero and values `>= n`.
pub fn parse_secret_key(bytes: &[u8; 32]) -> Option<SecretKey> {
    SecretKey::from_bytes(&FieldBytes::from(*bytes)).ok()
}

/// `(a + b) mod n` over big-endian 256-bit integers.
///
/// Inputs at or above `n` are reduced first, which leaves the sum unchanged
/// modulo `n`. Intermediate values are wiped before returning.
pub fn add_mod_n(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let a = Zeroizing::new(reduce(a));
    let b = Zeroizing::new(reduce(b));
    let sum = Zeroizing::new(*a + *b);
    sum.to_bytes().into()
}

fn reduce(bytes: &[u8; 32]) -> Scalar {
    let wide = Zeroizing::new(U256::from_be_slice(bytes));
    <Scalar as Reduce<U256>>::reduce(*wide)
}

/// Multiply the base point by `scalar`.
///
/// The scalar is not reduced: zero or anything `>= n` is rejected.
pub fn scalar_base_multiply(scalar: &[u8; 32]) -> Result<Coordinates> {
    let scalar: Option<NonZeroScalar> = NonZeroScalar::from_repr(FieldBytes::from(*scalar)).into();
    let scalar = scalar.ok_or(Error::InvalidPrivateKey)?;
    coordinates(&(ProjectivePoint::GENERATOR * *scalar).to_affine())
}

/// SEC1 compressed encoding: `0x02 | (y & 1)` followed by `x`.
pub fn compress_point(x: &[u8; 32], y: &[u8; 32]) -> [u8; 33] {
    let mut out = [0u8; 33];
    out[0] = 0x02 | (y[31] & 1);
    out[1..].copy_from_slice(x);
    out
}

/// Compressed encoding of a public key.
pub fn encode_point(point: &PublicKey) -> Result<[u8; 33]> {
    let (x, y) = coordinates(point.as_affine())?;
    Ok(compress_point(&x, &y))
}

/// Parse a 33-byte compressed point.
pub fn decode_point(bytes: &[u8; 33]) -> Result<PublicKey> {
    if bytes[0] != 0x02 && bytes[0] != 0x03 {
        return Err(Error::InvalidKeyData("public key must be compressed"));
    }
    PublicKey::from_sec1_bytes(bytes).map_err(|_| Error::InvalidKeyData("not a point on secp256k1"))
}

/// Public key of a private scalar.
pub fn public_key(secret: &SecretKey) -> PublicKey {
    secret.public_key()
}

/// `point(tweak) + point`, the public half of child key derivation.
///
/// Returns `None` when `tweak >= n` or the sum is the point at infinity.
pub fn add_points(tweak: &[u8; 32], point: &PublicKey) -> Option<PublicKey> {
    let tweak = parse_scalar(tweak)?;
    let sum = ProjectivePoint::GENERATOR * tweak + point.to_projective();
    PublicKey::from_affine(sum.to_affine()).ok()
}

fn coordinates(point: &AffinePoint) -> Result<Coordinates> {
    let encoded = point.to_encoded_point(false);
    let (Some(x), Some(y)) = (encoded.x(), encoded.y()) else {
        return Err(Error::InvalidKeyData("point at infinity"));
    };
    let mut out = ([0u8; 32], [0u8; 32]);
    out.0.copy_from_slice(x);
    out.1.copy_from_slice(y);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const G_X: [u8; 32] = hex!("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");
    const G_Y: [u8; 32] = hex!("483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8");

    fn scalar(n: u8) -> [u8; 32] {
        let mut out = [0u8; 32];
        out[31] = n;
        out
    }

    fn order_minus(n: u8) -> [u8; 32] {
        let mut out = CURVE_ORDER;
        out[31] -= n;
        out
    }

    #[test]
    fn base_multiply_by_one_is_generator() {
        let (x, y) = scalar_base_multiply(&scalar(1)).unwrap();
        assert_eq!(x, G_X);
        assert_eq!(y, G_Y);
    }

    #[test]
    fn base_multiply_rejects_zero_and_order() {
        assert_eq!(scalar_base_multiply(&[0u8; 32]), Err(Error::InvalidPrivateKey));
        assert_eq!(scalar_base_multiply(&CURVE_ORDER), Err(Error::InvalidPrivateKey));
    }

    #[test]
    fn compress_uses_y_parity() {
        assert_eq!(compress_point(&G_X, &G_Y)[0], 0x02);
        let mut odd = G_Y;
        odd[31] |= 1;
        let compressed = compress_point(&G_X, &odd);
        assert_eq!(compressed[0], 0x03);
        assert_eq!(compressed[1..], G_X);
    }

    #[test]
    fn add_mod_n_wraps() {
        assert_eq!(add_mod_n(&order_minus(1), &scalar(1)), [0u8; 32]);
        assert_eq!(add_mod_n(&order_minus(1), &scalar(2)), scalar(1));
        assert_eq!(add_mod_n(&scalar(2), &scalar(3)), scalar(5));
    }

    #[test]
    fn add_mod_n_reduces_oversized_inputs() {
        assert_eq!(
            add_mod_n(&[0xff; 32], &[0xff; 32]),
            hex!("000000000000000000000000000000028aa24632a16ebf88805b42e65f937d7c")
        );
        assert_eq!(add_mod_n(&CURVE_ORDER, &scalar(9)), scalar(9));
    }

    #[test]
    fn public_key_of_one_is_generator() {
        let one = parse_secret_key(&scalar(1)).unwrap();
        assert_eq!(
            encode_point(&public_key(&one)).unwrap(),
            compress_point(&G_X, &G_Y)
        );
    }

    #[test]
    fn parse_scalar_bounds() {
        assert!(parse_scalar(&CURVE_ORDER).is_none());
        assert!(parse_scalar(&order_minus(1)).is_some());
        assert!(parse_scalar(&[0u8; 32]).is_some());
        assert!(parse_secret_key(&[0u8; 32]).is_none());
        assert!(parse_secret_key(&scalar(1)).is_some());
    }

    #[test]
    fn add_points_matches_scalar_sum() {
        let one = parse_secret_key(&scalar(1)).unwrap();
        let two = add_points(&scalar(1), &public_key(&one)).unwrap();
        assert_eq!(
            encode_point(&two).unwrap(),
            hex!("02c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5")
        );
        assert!(add_points(&CURVE_ORDER, &two).is_none());
    }

    #[test]
    fn add_points_to_infinity_is_rejected() {
        let one = parse_secret_key(&scalar(1)).unwrap();
        // (n - 1)G + G is the identity
        assert!(add_points(&order_minus(1), &public_key(&one)).is_none());
    }

    #[test]
    fn decode_point_roundtrip() {
        let encoded = compress_point(&G_X, &G_Y);
        let point = decode_point(&encoded).unwrap();
        assert_eq!(encode_point(&point).unwrap(), encoded);

        let mut uncompressed_tag = encoded;
        uncompressed_tag[0] = 0x04;
        assert!(decode_point(&uncompressed_tag).is_err());
    }
}
