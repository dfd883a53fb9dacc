// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use std::{path::Path, time::Instant};

use tracing::{info, info_span};

use crate::{
    commit::{Bn254RowHasher, MerkleTree, Rp64RowHasher},
    config::{Config, HashType},
    errors::BuildError,
    io, lde,
};

// PIPELINE
// ================================================================================================

/// Builds the constant-polynomial commitment artifacts.
///
/// Loads the STARK structure from `stark_struct` and the base evaluation
/// matrix from `const_pols`, extends the matrix to the coset of the larger
/// domain, commits to it with a Merkle tree in the configured node domain,
/// and writes the committed-tree file to `const_tree`. When
/// `verification_key` is provided, the tree root is also written there as a
/// JSON document.
///
/// The pipeline is a single linear pass: the first error aborts it, and no
/// output file is produced after a failure.
pub fn build_const_tree(
    const_pols: &Path,
    stark_struct: &Path,
    const_tree: &Path,
    verification_key: Option<&Path>,
) -> Result<(), BuildError> {
    let started = Instant::now();

    let config = Config::load(stark_struct)?;
    let base = {
        let _span = info_span!("load_const_pols").entered();
        io::load_const_pols(const_pols, config.n_bits)?
    };
    info!(
        num_pols = base.num_cols(),
        n_bits = config.n_bits,
        n_bits_ext = config.n_bits_ext,
        hash_type = ?config.hash_type,
        "loaded constant polynomials"
    );

    let extended = {
        let _span = info_span!("extend").entered();
        let now = Instant::now();
        let extended = lde::extend(&base, config.n_bits_ext);
        info!(
            "extended {} polynomials from {} to {} rows in {} ms",
            extended.num_cols(),
            base.num_rows(),
            extended.num_rows(),
            now.elapsed().as_millis()
        );
        extended
    };
    drop(base);

    match config.hash_type {
        HashType::Goldilocks => {
            let tree = {
                let _span = info_span!("merkelize").entered();
                let now = Instant::now();
                let tree = MerkleTree::<Rp64RowHasher>::build(&extended);
                info!("built field-native tree in {} ms", now.elapsed().as_millis());
                tree
            };
            io::write_goldilocks_tree(const_tree, &extended, &tree)?;
            if let Some(path) = verification_key {
                let key = io::VerificationKey::from_goldilocks_tree(&tree);
                io::write_verification_key(path, &key)?;
            }
        },
        HashType::Bn254 => {
            let tree = {
                let _span = info_span!("merkelize").entered();
                let now = Instant::now();
                let tree = MerkleTree::<Bn254RowHasher>::build(&extended);
                info!("built curve-based tree in {} ms", now.elapsed().as_millis());
                tree
            };
            io::write_bn254_tree(const_tree, &extended, &tree)?;
            if let Some(path) = verification_key {
                let key = io::VerificationKey::from_bn254_tree(&tree);
                io::write_verification_key(path, &key)?;
            }
        },
    }

    info!("committed-tree artifacts written in {} ms", started.elapsed().as_millis());
    Ok(())
}

// TESTS
// ================================================================================================
