// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use super::{Error, Transport, UnpackedOffset};
use bytes::{BufMut, BytesMut};

/// An implementation of the [abridged transport], the lightest framing
/// available. Lengths are expressed in 4-byte words, in one byte when they
/// fit under 127 and in `0x7f` plus three bytes otherwise:
///
/// ```text
/// +-+----...----+        +----+----...----+
/// |L|  payload  |   or   |7Flen|  payload |
/// +-+----...----+        +----+----...----+
/// ```
///
/// The connection opens with the single byte `0xef`.
///
/// [abridged transport]: https://core.telegram.org/mtproto/mtproto-transports#abridged
pub struct Abridged {
    init: bool,
}

#[allow(clippy::new_without_default)]
impl Abridged {
    const TAG: u8 = 0xef;

    pub fn new() -> Self {
        Self { init: false }
    }
}

impl Transport for Abridged {
    fn pack(&mut self, input: &[u8], output: &mut BytesMut) {
        assert_eq!(input.len() % 4, 0);

        if !self.init {
            output.put_u8(Self::TAG);
            self.init = true;
        }

        let len = input.len() / 4;
        if len < 127 {
            output.put_u8(len as u8);
        } else {
            output.put_u8(0x7f);
            output.put_slice(&(len as u32).to_le_bytes()[..3]);
        }
        output.put_slice(input);
    }

    fn unpack(&mut self, input: &[u8]) -> Result<UnpackedOffset, Error> {
        if input.is_empty() {
            return Err(Error::MissingBytes);
        }

        let header_len;
        let len = input[0];
        let len = if len < 127 {
            header_len = 1;
            len as i32
        } else {
            if input.len() < 4 {
                return Err(Error::MissingBytes);
            }

            header_len = 4;
            i32::from_le_bytes(input[0..4].try_into().unwrap()) >> 8
        };

        let len = len * 4;
        if (input.len() as i32) < header_len + len {
            return Err(Error::MissingBytes);
        }

        // A tiny frame carrying a negative number is a transport status.
        if header_len == 1 && len == 4 {
            let status = i32::from_le_bytes(input[1..5].try_into().unwrap());
            if status < 0 {
                return Err(Error::BadStatus {
                    status: (-status) as u32,
                });
            }
        }

        let header_len = header_len as usize;
        let len = len as usize;

        Ok(UnpackedOffset {
            data_start: header_len,
            data_end: header_len + len,
            next_offset: header_len + len,
        })
    }

    fn reset(&mut self) {
        log::info!("resetting sending of header in abridged transport");
        self.init = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns a new transport and `n` bytes of input data for it.
    fn setup_pack(n: usize) -> (Abridged, Vec<u8>) {
        let input = (0..n).map(|x| (x & 0xff) as u8).collect();
        (Abridged::new(), input)
    }

    #[test]
    fn pack_empty() {
        let (mut transport, input) = setup_pack(0);
        let mut output = BytesMut::new();
        transport.pack(&input, &mut output);
        assert_eq!(&output[..], &[0xef, 0]);
    }

    #[test]
    #[should_panic]
    fn pack_non_padded() {
        let (mut transport, input) = setup_pack(7);
        let mut output = BytesMut::new();
        transport.pack(&input, &mut output);
    }

    #[test]
    fn pack_normal() {
        let (mut transport, input) = setup_pack(128);
        let mut output = BytesMut::new();
        transport.pack(&input, &mut output);
        assert_eq!(&output[..2], &[0xef, 32]);
        assert_eq!(&output[2..], &input[..]);
    }

    #[test]
    fn pack_large() {
        let (mut transport, input) = setup_pack(1024);
        let mut output = BytesMut::new();
        transport.pack(&input, &mut output);
        assert_eq!(&output[..5], &[0xef, 127, 0, 1, 0]);
        assert_eq!(&output[5..], &input[..]);
    }

    #[test]
    fn unpack_missing_bytes() {
        let mut transport = Abridged::new();
        assert_eq!(transport.unpack(&[1]), Err(Error::MissingBytes));
    }

    #[test]
    fn unpack_normal() {
        let (mut transport, input) = setup_pack(128);
        let mut output = BytesMut::new();
        transport.pack(&input, &mut output);
        let offset = transport.unpack(&output[1..]).unwrap();
        assert_eq!(&output[1..][offset.data_start..offset.data_end], &input[..]);
    }

    #[test]
    fn unpack_large() {
        let (mut transport, input) = setup_pack(1024);
        let mut output = BytesMut::new();
        transport.pack(&input, &mut output);
        let offset = transport.unpack(&output[1..]).unwrap();
        assert_eq!(&output[1..][offset.data_start..offset.data_end], &input[..]);
    }

    #[test]
    fn unpack_two_frames() {
        let (mut transport, input) = setup_pack(128);
        let mut output = BytesMut::new();
        transport.pack(&input, &mut output);
        transport.pack(&input, &mut output);
        let buffer = &output[1..];

        let offset = transport.unpack(buffer).unwrap();
        assert_eq!(&buffer[offset.data_start..offset.data_end], &input[..]);

        let offset2 = transport.unpack(&buffer[offset.next_offset..]).unwrap();
        assert_eq!(
            &buffer[offset.next_offset..][offset2.data_start..offset2.data_end],
            &input[..]
        );
    }

    #[test]
    fn unpack_bad_status() {
        let mut transport = Abridged::new();
        let mut buffer = Vec::new();
        buffer.push(1u8);
        buffer.extend((-404_i32).to_le_bytes());
        assert_eq!(
            transport.unpack(&buffer),
            Err(Error::BadStatus { status: 404 })
        );
    }
}
