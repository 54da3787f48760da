// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use super::{Error, Transport, UnpackedOffset};
use bytes::{BufMut, BytesMut};

/// An implementation of the [intermediate transport]:
///
/// ```text
/// +----+----...----+
/// | len|  payload  |
/// +----+----...----+
///  ^^^^ 4 bytes
/// ```
///
/// The connection opens with the four-byte tag `0xee 0xee 0xee 0xee`.
///
/// [intermediate transport]: https://core.telegram.org/mtproto/mtproto-transports#intermediate
pub struct Intermediate {
    init: bool,
}

#[allow(clippy::new_without_default)]
impl Intermediate {
    const TAG: [u8; 4] = 0xee_ee_ee_ee_u32.to_le_bytes();

    pub fn new() -> Self {
        Self { init: false }
    }
}

impl Transport for Intermediate {
    fn pack(&mut self, input: &[u8], output: &mut BytesMut) {
        assert_eq!(input.len() % 4, 0);

        if !self.init {
            output.put_slice(&Self::TAG);
            self.init = true;
        }

        output.put_u32_le(input.len() as u32);
        output.put_slice(input);
    }

    fn unpack(&mut self, input: &[u8]) -> Result<UnpackedOffset, Error> {
        if input.len() < 4 {
            return Err(Error::MissingBytes);
        }

        let len = i32::from_le_bytes(input[0..4].try_into().unwrap());
        if len < 4 {
            return Err(Error::BadLen { got: len });
        }
        if (input.len() as i32 - 4) < len {
            return Err(Error::MissingBytes);
        }

        if len == 4 {
            let status = i32::from_le_bytes(input[4..8].try_into().unwrap());
            if status < 0 {
                return Err(Error::BadStatus {
                    status: (-status) as u32,
                });
            }
        }

        let len = len as usize;
        Ok(UnpackedOffset {
            data_start: 4,
            data_end: 4 + len,
            next_offset: 4 + len,
        })
    }

    fn reset(&mut self) {
        log::info!("resetting sending of header in intermediate transport");
        self.init = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns a new transport and `n` bytes of input data for it.
    fn setup_pack(n: usize) -> (Intermediate, Vec<u8>) {
        let input = (0..n).map(|x| (x & 0xff) as u8).collect();
        (Intermediate::new(), input)
    }

    #[test]
    fn pack_empty() {
        let (mut transport, input) = setup_pack(0);
        let mut output = BytesMut::new();
        transport.pack(&input, &mut output);
        assert_eq!(&output[..], &[0xee, 0xee, 0xee, 0xee, 0, 0, 0, 0]);
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
        assert_eq!(&output[..8], &[0xee, 0xee, 0xee, 0xee, 128, 0, 0, 0]);
        assert_eq!(&output[8..], &input[..]);
    }

    #[test]
    fn tag_is_sent_once() {
        let (mut transport, input) = setup_pack(4);
        let mut output = BytesMut::new();
        transport.pack(&input, &mut output);
        transport.pack(&input, &mut output);
        assert_eq!(output.len(), 4 + 2 * (4 + 4));
    }

    #[test]
    fn unpack_missing_bytes() {
        let mut transport = Intermediate::new();
        assert_eq!(transport.unpack(&[1]), Err(Error::MissingBytes));
    }

    #[test]
    fn unpack_normal() {
        let (mut transport, input) = setup_pack(128);
        let mut output = BytesMut::new();
        transport.pack(&input, &mut output);
        let offset = transport.unpack(&output[4..]).unwrap();
        assert_eq!(&output[4..][offset.data_start..offset.data_end], &input[..]);
    }

    #[test]
    fn unpack_two_frames() {
        let (mut transport, input) = setup_pack(128);
        let mut output = BytesMut::new();
        transport.pack(&input, &mut output);
        transport.pack(&input, &mut output);
        let buffer = &output[4..];

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
        let mut transport = Intermediate::new();
        let mut buffer = Vec::new();
        buffer.extend(4_i32.to_le_bytes());
        buffer.extend((-404_i32).to_le_bytes());
        assert_eq!(
            transport.unpack(&buffer),
            Err(Error::BadStatus { status: 404 })
        );
    }
}
