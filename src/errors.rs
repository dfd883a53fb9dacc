// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

// BUILD ERROR
// ================================================================================================

/// A fatal condition encountered while building the commitment artifacts.
///
/// All variants are unrecoverable: the pipeline is a single-shot batch job
/// with no partial results of value, so the binary reports the message and
/// exits with a non-zero status.
#[derive(Debug, Error)]
pub enum BuildError {
    /// An input file could not be read.
    #[error("failed to read {path}: {reason}")]
    FileRead { path: String, reason: String },

    /// The STARK structure document could not be parsed.
    #[error("failed to parse STARK structure {path}: {reason}")]
    ConfigParse { path: String, reason: String },

    /// The domain descriptor is inconsistent or out of range.
    #[error("invalid domain descriptor: {0}")]
    InvalidDomain(String),

    /// The verification hash type is not one of the supported modes.
    #[error("invalid verification hash type: {0}")]
    UnsupportedHashType(String),

    /// The constant-polynomial file size is inconsistent with the domain.
    #[error(
        "size of {path} is {actual} bytes, which does not hold a whole number \
         of columns over a domain of {domain_size} rows"
    )]
    SizeMismatch { path: String, actual: usize, domain_size: usize },

    /// An output file could not be written.
    #[error("failed to write {path}: {reason}")]
    FileWrite { path: String, reason: String },
}
