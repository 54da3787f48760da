// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The [SRP] computation behind `auth.checkPassword`, used by accounts
//! with two-factor authentication enabled.
//!
//! [SRP]: https://core.telegram.org/api/srp
use hmac::Hmac;
use num_bigint::BigUint;
use sha2::Sha512;

use crate::sha256;

/// The password-derived proof to place in `inputCheckPasswordSRP`.
#[derive(Clone, Debug, PartialEq)]
pub struct SrpCheck {
    /// `A = g^a mod p`, left-padded to the length of `p`.
    pub a_pub: Vec<u8>,
    /// The `M1` proof of knowledge.
    pub m1: Vec<u8>,
}

// SH(data, salt) := H(salt | data | salt)
fn salted_hash(data: &[u8], salt: &[u8]) -> [u8; 32] {
    sha256!(salt, data, salt)
}

// PH1(password, salt1, salt2) := SH(SH(password, salt1), salt2)
// PH2(password, salt1, salt2) := SH(pbkdf2(sha512, PH1, salt1, 100000), salt2)
fn password_hash(password: &[u8], salt1: &[u8], salt2: &[u8]) -> [u8; 32] {
    let ph1 = salted_hash(&salted_hash(password, salt1), salt2);

    let mut dk = [0u8; 64];
    pbkdf2::pbkdf2::<Hmac<Sha512>>(&ph1, salt1, 100_000, &mut dk);

    salted_hash(&dk, salt2)
}

fn pad_to_len(data: &[u8], len: usize) -> Vec<u8> {
    let mut padded = vec![0u8; len.saturating_sub(data.len())];
    padded.extend(data);
    padded
}

fn xor32(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.iter_mut()
        .zip(left.iter().zip(right.iter()))
        .for_each(|(o, (a, b))| *o = a ^ b);
    out
}

/// Compute the SRP proof for `auth.checkPassword`.
///
/// All big-number operands sent into hashes are left-zero-padded to the
/// exact byte length of the prime `p`. The ephemeral secret `a` is taken
/// as a parameter so the computation stays deterministic under test.
pub fn calculate_check(
    password: &[u8],
    salt1: &[u8],
    salt2: &[u8],
    g: i32,
    p: &[u8],
    srp_b: &[u8],
    a: &[u8],
) -> SrpCheck {
    let p_len = p.len();
    let big_p = BigUint::from_bytes_be(p);
    let big_g = BigUint::from(g as u32);
    let big_a = BigUint::from_bytes_be(a);

    let g_padded = pad_to_len(&big_g.to_bytes_be(), p_len);
    let b_padded = pad_to_len(srp_b, p_len);

    // A := g^a mod p
    let a_pub = pad_to_len(&big_g.modpow(&big_a, &big_p).to_bytes_be(), p_len);

    // u := H(A | B)
    let u = BigUint::from_bytes_be(&sha256!(&a_pub, &b_padded));

    // k := H(p | g)
    let k = BigUint::from_bytes_be(&sha256!(p, &g_padded));

    // x := PH2(password, salt1, salt2)
    let x = BigUint::from_bytes_be(&password_hash(password, salt1, salt2));

    // k_v := (k * g^x) mod p
    let k_v = (k * big_g.modpow(&x, &big_p)) % &big_p;

    // t := (B - k_v) mod p, kept positive
    let big_b = BigUint::from_bytes_be(srp_b) % &big_p;
    let t = if big_b >= k_v {
        big_b - k_v
    } else {
        big_b + &big_p - k_v
    };

    // S := t^(a + u * x) mod p
    let s = t.modpow(&(big_a + u * &x), &big_p);

    // K := H(S)
    let k_s = sha256!(&pad_to_len(&s.to_bytes_be(), p_len));

    // M1 := H(H(p) xor H(g) | H(salt1) | H(salt2) | A | B | K)
    let h_p = sha256!(p);
    let h_g = sha256!(&g_padded);
    let m1 = sha256!(
        &xor32(&h_p, &h_g),
        &sha256!(salt1),
        &sha256!(salt2),
        &a_pub,
        &b_padded,
        &k_s
    )
    .to_vec();

    SrpCheck { a_pub, m1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_proof() {
        let p = pad_to_len(&[4], 256);
        let check = calculate_check(&[7], &[1], &[2], 3, &p, &[5], &[6]);

        assert_eq!(
            check.m1,
            vec![
                113, 194, 128, 151, 4, 153, 170, 134, 32, 95, 223, 56, 223, 136, 52, 244, 208, 194,
                114, 97, 231, 249, 72, 123, 225, 229, 225, 113, 128, 184, 98, 51,
            ]
        );

        let mut expected_a = vec![0u8; 255];
        expected_a.push(1);
        assert_eq!(check.a_pub, expected_a);
    }

    #[test]
    fn padding_is_stable() {
        assert_eq!(pad_to_len(&[1, 2], 4), vec![0, 0, 1, 2]);
        assert_eq!(pad_to_len(&[1, 2, 3, 4], 2), vec![1, 2, 3, 4]);
    }
}
