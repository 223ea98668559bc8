// /////////////////////////////////////////////////////////////////////////////
// linepipe
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Concrete stage adapters: one module per external collaborator family.

pub mod base64;
pub mod crypto;
pub mod deflate;
pub mod digest;
pub mod file_io;
pub mod filter;
pub mod line_reader;
pub mod memory;

pub use self::base64::{Base64Decoder, Base64Encoder};
pub use self::crypto::{DecryptTransformer, EncryptTransformer};
pub use self::deflate::{DeflateTransformer, InflateTransformer};
pub use self::digest::DigestTransformer;
pub use self::file_io::{FileConsumer, FileProducer};
pub use self::filter::{RemoveFilter, ReplaceFilter};
pub use self::line_reader::{ByteConsumer, LineConsumer};
pub use self::memory::{SliceCollector, SliceProducer};
