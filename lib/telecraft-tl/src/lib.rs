// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Trait definitions for Telegram's [Binary Data Serialization], along with
//! hand-written definitions for the small subset of the schema that the
//! protocol core needs to understand on its own: the auth-key exchange
//! objects, MTProto service messages, the `Updates` family, and the handful
//! of functions the core issues on its own behalf.
//!
//! The full generated schema registry is an external collaborator. Callers
//! own their own request and response types; anything this crate does not
//! interpret flows through it as an opaque [`Blob`].
//!
//! [Binary Data Serialization]: https://core.telegram.org/mtproto/serialize
pub mod deserialize;
mod serialize;

pub mod enums;
pub mod functions;
pub mod types;

pub use deserialize::{Cursor, Deserializable};
pub use serialize::Serializable;

/// The schema layer this crate's function definitions were written against.
pub const LAYER: i32 = 181;

/// This struct represents the concrete type of a vector, that is,
/// `vector` as opposed to the type `Vector`. This bare type is less
/// common, so instead of creating an enum for `Vector` wrapping `vector`
/// as Rust's `Vec`, a new-type for `vector` is used instead.
#[derive(Clone, Debug, PartialEq)]
pub struct RawVec<T>(pub Vec<T>);

/// An unparsed blob which should not be read as a TL byte-string. Used by
/// functions returning generic objects which pass the underlying result
/// through without interpretation.
#[derive(Clone, Debug, PartialEq)]
pub struct Blob(pub Vec<u8>);

impl From<Vec<u8>> for Blob {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

/// Anything implementing this trait is identifiable by both ends of the
/// connection when performing Remote Procedure Calls and transmitting
/// objects.
pub trait Identifiable {
    /// The unique identifier for the type.
    const CONSTRUCTOR_ID: u32;
}

/// Structures implementing this trait are suitable for use in Remote
/// Procedure Calls, and know the type of the response coming back.
pub trait RemoteCall: Serializable {
    /// The type of the "return" value coming from the other end of the
    /// connection.
    type Return: Deserializable;
}

/// Peek the constructor identifier from the head of a serialized object.
pub fn peek_constructor(body: &[u8]) -> Option<u32> {
    if body.len() >= 4 {
        Some(u32::from_le_bytes([body[0], body[1], body[2], body[3]]))
    } else {
        None
    }
}
