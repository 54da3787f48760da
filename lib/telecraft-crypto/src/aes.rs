// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use std::mem;

/// Encrypt the input plaintext in-place using the AES-IGE mode.
///
/// Panics if the buffer is not padded to 16 bytes.
pub fn ige_encrypt(buffer: &mut [u8], key: &[u8; 32], iv: &[u8; 32]) {
    assert!(buffer.len() % 16 == 0);

    let cipher = aes::Aes256::new(GenericArray::from_slice(key));

    let mut plaintext_block = [0; 16];
    let mut iv1 = [0; 16];
    let mut iv2 = [0; 16];
    iv1.copy_from_slice(&iv[..16]);
    iv2.copy_from_slice(&iv[16..]);

    for ciphertext_block in buffer.chunks_mut(16) {
        plaintext_block.copy_from_slice(ciphertext_block);

        // block = block XOR iv1
        ciphertext_block
            .iter_mut()
            .zip(plaintext_block)
            .zip(iv1.as_ref())
            .for_each(|((x, a), b)| *x = a ^ b);

        // block = encrypt(block)
        let ciphertext_block = GenericArray::from_mut_slice(ciphertext_block);
        cipher.encrypt_block(ciphertext_block);

        // block = block XOR iv2
        ciphertext_block
            .iter_mut()
            .zip(iv2.as_ref())
            .for_each(|(x, a)| *x ^= a);

        iv1.copy_from_slice(ciphertext_block);
        mem::swap(&mut iv2, &mut plaintext_block);
    }
}

/// Decrypt the input ciphertext using the AES-IGE mode.
///
/// Panics if the ciphertext is not padded to 16 bytes.
pub fn ige_decrypt(ciphertext: &[u8], key: &[u8; 32], iv: &[u8; 32]) -> Vec<u8> {
    assert!(ciphertext.len() % 16 == 0);
    let mut plaintext = vec![0; ciphertext.len()];

    let cipher = aes::Aes256::new(GenericArray::from_slice(key));
    let mut iv = *iv;
    let (iv1, iv2) = iv.split_at_mut(16);

    for (ciphertext_block, plaintext_block) in ciphertext.chunks(16).zip(plaintext.chunks_mut(16)) {
        // block = block XOR iv2
        plaintext_block
            .iter_mut()
            .zip(ciphertext_block)
            .zip(iv2.as_ref())
            .for_each(|((a, x), b)| *a = x ^ b);

        // block = decrypt(block)
        let plaintext_block = GenericArray::from_mut_slice(plaintext_block);
        cipher.decrypt_block(plaintext_block);

        // block = block XOR iv1
        plaintext_block
            .iter_mut()
            .zip(iv1.as_ref())
            .for_each(|(a, b)| *a ^= b);

        iv1.copy_from_slice(ciphertext_block);
        iv2.copy_from_slice(plaintext_block);
    }

    plaintext
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> [u8; 32] {
        let mut buffer = [0u8; 32];
        buffer
            .iter_mut()
            .enumerate()
            .for_each(|(i, x)| *x = i as u8);
        buffer
    }

    #[test]
    fn encrypt_identity_block() {
        let mut data = sample_block();
        let key = sample_block();
        let iv = sample_block();
        ige_encrypt(&mut data, &key, &iv);
        assert_eq!(
            data.to_vec(),
            vec![
                226, 129, 18, 165, 62, 92, 137, 199, 177, 234, 128, 113, 193, 51, 105, 159, 212,
                232, 107, 38, 196, 186, 201, 252, 90, 241, 171, 140, 226, 122, 68, 164,
            ]
        );
    }

    #[test]
    fn decrypt_identity_block() {
        let data = sample_block();
        let key = sample_block();
        let iv = sample_block();
        assert_eq!(
            ige_decrypt(&data, &key, &iv),
            vec![
                229, 119, 122, 250, 205, 123, 44, 22, 247, 172, 64, 202, 230, 30, 246, 3, 254, 230,
                9, 143, 184, 168, 134, 10, 185, 238, 103, 44, 215, 229, 186, 204,
            ]
        );
    }

    #[test]
    fn roundtrip() {
        let mut data = [7u8; 64];
        let key = sample_block();
        let iv = sample_block();
        ige_encrypt(&mut data, &key, &iv);
        assert_eq!(ige_decrypt(&data, &key, &iv), vec![7u8; 64]);
    }
}
