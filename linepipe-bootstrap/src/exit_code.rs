// /////////////////////////////////////////////////////////////////////////////
// linepipe
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Unix exit codes (BSD `sysexits.h` conventions), mapped from
//! [`linepipe_core::PipelineError`].
//!
//! Scaled down from the teacher's `bootstrap::exit_code` (which covers its
//! whole enterprise error surface — users, hosts, services) to the handful
//! of categories this crate's error taxonomy actually has.

use std::fmt;

use linepipe_core::PipelineError;

/// Exit codes following Unix conventions (BSD sysexits.h).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful termination (0).
    #[default]
    Success = 0,

    /// Command-line usage error: bad arguments, unknown stage name (64).
    UsageError = 64,

    /// Malformed input data: bad base64, corrupt compressed/encrypted
    /// stream (65).
    DataError = 65,

    /// Cannot open input (66).
    NoInput = 66,

    /// Internal software error: a contract violation the scheduler or a
    /// stage was not supposed to be able to reach (70).
    Software = 70,

    /// I/O error reading or writing a file or stream (74).
    IoError = 74,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Maps a [`PipelineError`] to the exit code a shell script should see.
    pub fn from_pipeline_error(error: &PipelineError) -> Self {
        match error {
            PipelineError::InvalidArgument(_) => ExitCode::UsageError,
            PipelineError::ProtocolError(_) => ExitCode::DataError,
            PipelineError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => ExitCode::NoInput,
            PipelineError::IoError(_) => ExitCode::IoError,
            PipelineError::OutOfMemory(_) | PipelineError::Unexpected(_) => ExitCode::Software,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "success",
            ExitCode::UsageError => "command line usage error",
            ExitCode::DataError => "data format error",
            ExitCode::NoInput => "cannot open input",
            ExitCode::Software => "internal software error",
            ExitCode::IoError => "I/O error",
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.as_i32()
    }
}
