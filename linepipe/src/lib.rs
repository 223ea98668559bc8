// /////////////////////////////////////////////////////////////////////////////
// linepipe
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Concrete producer, transformer, and consumer stages for the `linepipe`
//! streaming transformation pipeline, plus a small application layer
//! (`recipe`) that assembles a [`linepipe_core::Scheduler`] from a
//! CLI-described sequence of stage names.
//!
//! This crate is the "external collaborator" layer the core specification
//! deliberately leaves out of scope: file and in-memory I/O, base64,
//! deflate/inflate, AES-256-CBC encrypt/decrypt, digests, and byte
//! filtering. None of it changes how the scheduler works; it only supplies
//! things for the scheduler to drive.

pub mod recipe;
pub mod stages;

pub use recipe::{build_pipeline, run_to_completion, StageSpec};
