// /////////////////////////////////////////////////////////////////////////////
// linepipe
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Error taxonomy shared by every layer of the pipeline.
//!
//! This is the "host-provided reporting channel" of the system: every role
//! operation and every buffer operation that can fail returns one of these
//! variants instead of routing through a global error slot. Concrete stage
//! adapters (in the `linepipe` crate) map library-specific errors onto these
//! tags at the adapter boundary.

use thiserror::Error;

/// Errors that can occur anywhere in the pipeline: buffer allocation, stage
/// construction, stage execution, or scheduler bookkeeping.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Buffer allocation or role-internal allocation failed.
    #[error("out of memory: {0}")]
    OutOfMemory(String),

    /// Role-constructor-level misuse: unknown cipher or digest name,
    /// oversized key, malformed stage configuration.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A wrapped external library reported a decoding/encoding failure:
    /// malformed ciphertext, corrupt compressed stream, malformed base64.
    #[error("protocol error: {0}")]
    ProtocolError(String),

    /// An underlying host operation on a file or stream failed.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A wrapped library reported a condition not documented in its
    /// contract.
    #[error("unexpected condition: {0}")]
    Unexpected(String),
}

impl PipelineError {
    pub fn out_of_memory(msg: impl Into<String>) -> Self {
        Self::OutOfMemory(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::ProtocolError(msg.into())
    }

    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
