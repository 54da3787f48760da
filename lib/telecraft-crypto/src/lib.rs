// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Cryptographic primitives used by the MTProto v2 protocol: the AES-IGE
//! envelope with per-message key derivation, the handshake helpers, pq
//! factorization, RSA-PAD and the SRP two-factor proof.
pub mod aes;
mod auth_key;
pub mod factorize;
pub mod hex;
pub mod rsa;
#[macro_use]
pub mod sha;
pub mod srp;

pub use auth_key::AuthKey;
use getrandom::getrandom;
use std::fmt;

/// Errors from decrypting a server message envelope. All of them are fatal
/// for the connection they occur on.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// The ciphertext is either too small or not padded correctly.
    InvalidBuffer,

    /// The incoming frame names an authorization key other than ours.
    AuthKeyMismatch,

    /// The recomputed message key does not match the received one.
    MessageKeyMismatch,
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::InvalidBuffer => write!(f, "invalid ciphertext buffer length"),
            Error::AuthKeyMismatch => write!(f, "server authkey mismatches with ours"),
            Error::MessageKeyMismatch => write!(f, "server msgkey mismatches with ours"),
        }
    }
}

enum Side {
    Client,
    Server,
}

impl Side {
    // "where x = 0 for messages from client to server and x = 8 for those
    // from server to client."
    fn x(&self) -> usize {
        match *self {
            Side::Client => 0,
            Side::Server => 8,
        }
    }
}

/// Calculate the `(key, iv)` pair for AES-IGE based on the
/// [MTProto 2.0 guidelines].
///
/// [MTProto 2.0 guidelines]: https://core.telegram.org/mtproto/description#defining-aes-key-and-initialization-vector
fn calc_key(auth_key: &AuthKey, msg_key: &[u8; 16], side: Side) -> ([u8; 32], [u8; 32]) {
    let x = side.x();

    // sha256_a = SHA256 (msg_key + substr (auth_key, x, 36));
    let sha256_a = sha256!(msg_key, &auth_key.data[x..x + 36]);

    // sha256_b = SHA256 (substr (auth_key, 40+x, 36) + msg_key);
    let sha256_b = sha256!(&auth_key.data[40 + x..40 + x + 36], msg_key);

    // aes_key = substr (sha256_a, 0, 8) + substr (sha256_b, 8, 16) + substr (sha256_a, 24, 8);
    let aes_key = {
        let mut buffer = [0; 32];
        buffer[0..8].copy_from_slice(&sha256_a[0..8]);
        buffer[8..8 + 16].copy_from_slice(&sha256_b[8..8 + 16]);
        buffer[24..24 + 8].copy_from_slice(&sha256_a[24..24 + 8]);
        buffer
    };

    // aes_iv = substr (sha256_b, 0, 8) + substr (sha256_a, 8, 16) + substr (sha256_b, 24, 8);
    let aes_iv = {
        let mut buffer = [0; 32];
        buffer[0..8].copy_from_slice(&sha256_b[0..8]);
        buffer[8..8 + 16].copy_from_slice(&sha256_a[8..8 + 16]);
        buffer[24..24 + 8].copy_from_slice(&sha256_b[24..24 + 8]);
        buffer
    };

    (aes_key, aes_iv)
}

/// MTProto 2.0 requires from 12 to 1024 bytes of padding, and the padded
/// length must be divisible by 16 bytes.
fn determine_padding_v2_length(len: usize) -> usize {
    16 + (16 - (len % 16))
}

// Inner body of `encrypt_data_v2`, separated so it can be driven with a
// fixed padding under test.
fn do_encrypt_data_v2(plaintext: &[u8], auth_key: &AuthKey, random_padding: &[u8; 32]) -> Vec<u8> {
    let padding_len = determine_padding_v2_length(plaintext.len());

    let mut padded = Vec::with_capacity(plaintext.len() + padding_len);
    padded.extend(plaintext);
    padded.extend(&random_padding[..padding_len]);

    let side = Side::Client;
    let x = side.x();

    // msg_key_large = SHA256 (substr (auth_key, 88+x, 32) + plaintext + random_padding);
    let msg_key_large = sha256!(&auth_key.data[88 + x..88 + x + 32], &padded);

    // msg_key = substr (msg_key_large, 8, 16);
    let msg_key = {
        let mut buffer = [0; 16];
        buffer.copy_from_slice(&msg_key_large[8..8 + 16]);
        buffer
    };

    let (key, iv) = calc_key(auth_key, &msg_key, side);
    aes::ige_encrypt(&mut padded, &key, &iv);

    let mut result = Vec::with_capacity(8 + 16 + padded.len());
    result.extend(&auth_key.key_id);
    result.extend(&msg_key);
    result.extend(&padded);
    result
}

/// Encrypt a message body into the outer MTProto 2.0 envelope:
/// `auth_key_id (8) | msg_key (16) | ciphertext`.
pub fn encrypt_data_v2(plaintext: &[u8], auth_key: &AuthKey) -> Vec<u8> {
    let random_padding = {
        let mut rnd = [0; 32];
        getrandom(&mut rnd).expect("failed to generate a secure padding");
        rnd
    };

    do_encrypt_data_v2(plaintext, auth_key, &random_padding)
}

/// The inverse of [`encrypt_data_v2`]; checks the key id and the
/// [message key] before returning the plaintext.
///
/// [message key]: https://core.telegram.org/mtproto/security_guidelines#mtproto-encrypted-messages
pub fn decrypt_data_v2(ciphertext: &[u8], auth_key: &AuthKey) -> Result<Vec<u8>, Error> {
    let side = Side::Server;
    let x = side.x();

    if ciphertext.len() < 24 || (ciphertext.len() - 24) % 16 != 0 {
        return Err(Error::InvalidBuffer);
    }

    let key_id = &ciphertext[..8];
    if auth_key.key_id != *key_id {
        return Err(Error::AuthKeyMismatch);
    }

    let msg_key = {
        let mut buffer = [0; 16];
        buffer.copy_from_slice(&ciphertext[8..8 + 16]);
        buffer
    };

    let (key, iv) = calc_key(auth_key, &msg_key, Side::Server);
    let plaintext = aes::ige_decrypt(&ciphertext[24..], &key, &iv);

    let our_key = sha256!(&auth_key.data[88 + x..88 + x + 32], &plaintext);

    // Constant-time enough for our purposes: the comparison happens over
    // fixed-length hashes, not attacker-controlled lengths.
    if !constant_time_eq(&msg_key, &our_key[8..8 + 16]) {
        return Err(Error::MessageKeyMismatch);
    }

    Ok(plaintext)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Generate the AES key and initialization vector for decrypting the
/// server's DH answer, from the nonces exchanged during the handshake.
pub fn generate_key_data_from_nonce(
    server_nonce: &[u8; 16],
    new_nonce: &[u8; 32],
) -> ([u8; 32], [u8; 32]) {
    let hash1 = sha1!(new_nonce, server_nonce);
    let hash2 = sha1!(server_nonce, new_nonce);
    let hash3 = sha1!(new_nonce, new_nonce);

    // key = hash1 + hash2[:12]
    let key = {
        let mut buffer = [0; 32];
        buffer[..hash1.len()].copy_from_slice(&hash1);
        buffer[hash1.len()..].copy_from_slice(&hash2[..12]);
        buffer
    };

    // iv = hash2[12:20] + hash3 + new_nonce[:4]
    let iv = {
        let mut buffer = [0; 32];
        buffer[..8].copy_from_slice(&hash2[12..]);
        buffer[8..28].copy_from_slice(&hash3);
        buffer[28..].copy_from_slice(&new_nonce[..4]);
        buffer
    };

    (key, iv)
}

/// Encrypt data using AES-IGE, randomly padding to 16 bytes if needed.
pub fn encrypt_ige(plaintext: &[u8], key: &[u8; 32], iv: &[u8; 32]) -> Vec<u8> {
    let mut padded = if plaintext.len() % 16 == 0 {
        plaintext.to_vec()
    } else {
        let pad_len = (16 - (plaintext.len() % 16)) % 16;
        let mut padded = Vec::with_capacity(plaintext.len() + pad_len);
        padded.extend(plaintext);

        let mut buffer = vec![0; pad_len];
        getrandom(&mut buffer).expect("failed to generate random padding for encryption");
        padded.extend(&buffer);
        padded
    };

    aes::ige_encrypt(&mut padded, key, iv);
    padded
}

/// Decrypt data using AES-IGE. Panics if the ciphertext is not padded to
/// 16 bytes.
pub fn decrypt_ige(padded_ciphertext: &[u8], key: &[u8; 32], iv: &[u8; 32]) -> Vec<u8> {
    aes::ige_decrypt(padded_ciphertext, key, iv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequential_auth_key() -> AuthKey {
        let mut buffer = [0u8; 256];
        buffer
            .iter_mut()
            .enumerate()
            .for_each(|(i, x)| *x = i as u8);
        AuthKey::from_bytes(buffer)
    }

    fn sequential_msg_key() -> [u8; 16] {
        let mut buffer = [0u8; 16];
        buffer
            .iter_mut()
            .enumerate()
            .for_each(|(i, x)| *x = i as u8);
        buffer
    }

    #[test]
    fn client_side_key() {
        let expected = (
            [
                112, 78, 208, 156, 139, 65, 102, 138, 232, 249, 157, 36, 71, 56, 247, 29, 189, 220,
                68, 70, 155, 107, 189, 74, 168, 87, 61, 208, 66, 189, 5, 158,
            ],
            [
                77, 38, 96, 0, 165, 80, 237, 171, 191, 76, 124, 228, 15, 208, 4, 60, 201, 34, 48,
                24, 76, 211, 23, 165, 204, 156, 36, 130, 253, 59, 147, 24,
            ],
        );
        assert_eq!(
            calc_key(&sequential_auth_key(), &sequential_msg_key(), Side::Client),
            expected
        );
    }

    #[test]
    fn server_side_key() {
        let expected = (
            [
                33, 119, 37, 121, 155, 36, 88, 6, 69, 129, 116, 161, 252, 251, 200, 131, 144, 104,
                7, 177, 80, 51, 253, 208, 234, 43, 77, 105, 207, 156, 54, 78,
            ],
            [
                102, 154, 101, 56, 145, 122, 79, 165, 108, 163, 35, 96, 164, 49, 201, 22, 11, 228,
                173, 136, 113, 64, 152, 13, 171, 145, 206, 123, 220, 71, 255, 188,
            ],
        );
        assert_eq!(
            calc_key(&sequential_auth_key(), &sequential_msg_key(), Side::Server),
            expected
        );
    }

    #[test]
    fn encrypt_with_fixed_padding() {
        let expected = vec![
            50, 209, 88, 110, 164, 87, 223, 200, 168, 23, 41, 212, 109, 181, 64, 25, 162, 191, 215,
            247, 68, 249, 185, 108, 79, 113, 108, 253, 196, 71, 125, 178, 162, 193, 95, 109, 219,
            133, 35, 95, 185, 85, 47, 29, 132, 7, 198, 170, 234, 0, 204, 132, 76, 90, 27, 246, 172,
            68, 183, 155, 94, 220, 42, 35, 134, 139, 61, 96, 115, 165, 144, 153, 44, 15, 41, 117,
            36, 61, 86, 62, 161, 128, 210, 24, 238, 117, 124, 154,
        ];
        let got = do_encrypt_data_v2(
            b"Hello, world! This data should remain secure!",
            &sequential_auth_key(),
            &[0; 32],
        );
        assert_eq!(got, expected);
    }

    #[test]
    fn envelope_roundtrip() {
        // Encrypting with the client key then decrypting "as the server"
        // won't match, so roundtrip through a key where both sides agree
        // on the direction by re-deriving manually.
        let auth_key = sequential_auth_key();
        let body = vec![42u8; 128];
        let packet = encrypt_data_v2(&body, &auth_key);

        // The envelope layout holds regardless of direction.
        assert_eq!(&packet[..8], &auth_key.key_id);
        assert_eq!((packet.len() - 24) % 16, 0);

        // Undo the client-side encryption manually and compare.
        let msg_key: [u8; 16] = packet[8..24].try_into().unwrap();
        let (key, iv) = calc_key(&auth_key, &msg_key, Side::Client);
        let plaintext = aes::ige_decrypt(&packet[24..], &key, &iv);
        assert_eq!(&plaintext[..body.len()], &body[..]);
    }

    #[test]
    fn rejects_foreign_key_id() {
        let auth_key = sequential_auth_key();
        let other = AuthKey::from_bytes([1u8; 256]);
        let packet = encrypt_data_v2(&[0u8; 16], &auth_key);
        assert_eq!(
            decrypt_data_v2(&packet, &other),
            Err(Error::AuthKeyMismatch)
        );
    }

    #[test]
    fn rejects_short_buffers() {
        let auth_key = sequential_auth_key();
        assert_eq!(
            decrypt_data_v2(&[0u8; 23], &auth_key),
            Err(Error::InvalidBuffer)
        );
        assert_eq!(
            decrypt_data_v2(&[0u8; 25], &auth_key),
            Err(Error::InvalidBuffer)
        );
    }

    #[test]
    fn key_from_nonce() {
        let server_nonce = {
            let mut buffer = [0u8; 16];
            buffer
                .iter_mut()
                .enumerate()
                .for_each(|(i, x)| *x = i as u8);
            buffer
        };
        let new_nonce = {
            let mut buffer = [0u8; 32];
            buffer
                .iter_mut()
                .enumerate()
                .for_each(|(i, x)| *x = i as u8);
            buffer
        };

        let (key, iv) = generate_key_data_from_nonce(&server_nonce, &new_nonce);
        assert_eq!(
            key,
            [
                7, 88, 241, 83, 59, 97, 93, 36, 246, 232, 169, 74, 111, 203, 238, 10, 85, 234, 171,
                34, 23, 215, 41, 92, 169, 33, 61, 26, 45, 125, 22, 166
            ]
        );
        assert_eq!(
            iv,
            [
                90, 132, 16, 142, 152, 5, 101, 108, 232, 100, 7, 14, 22, 110, 98, 24, 246, 120, 62,
                133, 17, 71, 26, 90, 183, 128, 44, 242, 0, 1, 2, 3
            ]
        );
    }
}
