// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use std::{fs, path::Path, str::FromStr};

use serde::Deserialize;
use winter_math::{fields::f64::BaseElement, StarkField};

use crate::errors::BuildError;

// HASH TYPE
// ================================================================================================

/// Node domain of the commitment tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashType {
    /// Nodes are Goldilocks field elements; rows are hashed with Rescue-Prime.
    Goldilocks,
    /// Nodes are BN254 scalar-field elements.
    Bn254,
}

impl FromStr for HashType {
    type Err = BuildError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "GL" => Ok(Self::Goldilocks),
            "BN128" => Ok(Self::Bn254),
            other => Err(BuildError::UnsupportedHashType(other.to_string())),
        }
    }
}

// CONFIG
// ================================================================================================

/// Raw STARK structure document; extra fields used by other prover stages
/// are ignored.
#[derive(Debug, Deserialize)]
struct RawStarkStruct {
    #[serde(rename = "nBits")]
    n_bits: usize,
    #[serde(rename = "nBitsExt")]
    n_bits_ext: usize,
    #[serde(rename = "verificationHashType")]
    verification_hash_type: String,
}

/// Validated domain descriptor and hash mode; immutable once loaded.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub n_bits: usize,
    pub n_bits_ext: usize,
    pub hash_type: HashType,
}

impl Config {
    /// Loads and validates the STARK structure document at the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, if the domain
    /// descriptor is out of range, or if the hash type is not supported.
    pub fn load(path: &Path) -> Result<Self, BuildError> {
        let data = fs::read_to_string(path).map_err(|err| BuildError::FileRead {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        let raw: RawStarkStruct =
            serde_json::from_str(&data).map_err(|err| BuildError::ConfigParse {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;
        Self::validate(raw)
    }

    fn validate(raw: RawStarkStruct) -> Result<Self, BuildError> {
        if raw.n_bits == 0 {
            return Err(BuildError::InvalidDomain("nBits must be at least 1".to_string()));
        }
        if raw.n_bits_ext < raw.n_bits {
            return Err(BuildError::InvalidDomain(format!(
                "nBitsExt ({}) must not be smaller than nBits ({})",
                raw.n_bits_ext, raw.n_bits
            )));
        }
        if raw.n_bits_ext > BaseElement::TWO_ADICITY as usize {
            return Err(BuildError::InvalidDomain(format!(
                "the field does not contain a multiplicative subgroup of size 2^{}",
                raw.n_bits_ext
            )));
        }
        let hash_type = raw.verification_hash_type.parse()?;
        Ok(Self {
            n_bits: raw.n_bits,
            n_bits_ext: raw.n_bits_ext,
            hash_type,
        })
    }

    /// Returns the base domain size.
    pub fn domain_size(&self) -> usize {
        1 << self.n_bits
    }

    /// Returns the extended domain size.
    pub fn extended_domain_size(&self) -> usize {
        1 << self.n_bits_ext
    }
}

// TESTS
// ================================================================================================
