// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Input loading and artifact serialization.
//!
//! The committed-tree artifacts use fixed binary layouts:
//!
//! * Field-native mode: `u64 n_pols` ‖ `u64 n_ext` ‖ extended matrix
//!   (`n_ext · n_pols` canonical little-endian words, row-major) ‖ node
//!   array (leaf hashes first, root last, four words per node).
//! * Curve-based mode: `u64 source_width` ‖ `u64 height` ‖ extended matrix
//!   (as above) ‖ node array (32 canonical little-endian bytes per node).
//!
//! The verification key is a small JSON document holding the tree root.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};

use serde::Serialize;
use winter_crypto::Digest;
use winter_math::{fields::f64::BaseElement, StarkField};
use winter_utils::uninit_vector;

use crate::{
    commit::{bn254, goldilocks, Bn254RowHasher, MerkleTree, Rp64RowHasher},
    errors::BuildError,
    matrix::RowMatrix,
};

// CONSTANTS
// ================================================================================================

/// Number of bytes in a serialized field element.
pub const ELEMENT_BYTES: usize = 8;

// INPUT LOADING
// ================================================================================================

/// Reads the constant-polynomial file for a domain of 2^`n_bits` rows.
///
/// The file is a flat array of 8-byte little-endian field elements,
/// row-major; the number of polynomials is inferred from the file size.
///
/// # Errors
/// Returns an error if the file cannot be read, or if its byte size does
/// not hold a whole number of columns over the domain.
pub fn load_const_pols(path: &Path, n_bits: usize) -> Result<RowMatrix, BuildError> {
    let data = fs::read(path).map_err(|err| BuildError::FileRead {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;

    let n = 1usize << n_bits;
    let stride = n * ELEMENT_BYTES;
    if data.is_empty() || data.len() % stride != 0 {
        return Err(BuildError::SizeMismatch {
            path: path.display().to_string(),
            actual: data.len(),
            domain_size: n,
        });
    }
    let num_cols = data.len() / stride;

    let mut values = unsafe { uninit_vector(n * num_cols) };
    for (value, chunk) in values.iter_mut().zip(data.chunks_exact(ELEMENT_BYTES)) {
        let mut bytes = [0u8; ELEMENT_BYTES];
        bytes.copy_from_slice(chunk);
        *value = BaseElement::new(u64::from_le_bytes(bytes));
    }

    Ok(RowMatrix::new(values, num_cols))
}

// COMMITTED-TREE SERIALIZATION
// ================================================================================================

/// Writes the field-native committed-tree artifact.
pub fn write_goldilocks_tree(
    path: &Path,
    matrix: &RowMatrix,
    tree: &MerkleTree<Rp64RowHasher>,
) -> Result<(), BuildError> {
    debug_assert_eq!(
        goldilocks::tree_num_elements(matrix.num_rows()),
        tree.nodes().len() * goldilocks::DIGEST_WIDTH
    );
    write_file(path, |writer| {
        writer.write_all(&(matrix.num_cols() as u64).to_le_bytes())?;
        writer.write_all(&(matrix.num_rows() as u64).to_le_bytes())?;
        write_elements(writer, matrix.values())?;
        for node in tree.nodes() {
            writer.write_all(&node.as_bytes())?;
        }
        Ok(())
    })
}

/// Writes the curve-based committed-tree artifact.
pub fn write_bn254_tree(
    path: &Path,
    matrix: &RowMatrix,
    tree: &MerkleTree<Bn254RowHasher>,
) -> Result<(), BuildError> {
    write_file(path, |writer| {
        writer.write_all(&(matrix.num_cols() as u64).to_le_bytes())?;
        writer.write_all(&(matrix.num_rows() as u64).to_le_bytes())?;
        write_elements(writer, matrix.values())?;
        for node in tree.nodes() {
            writer.write_all(&bn254::node_bytes(node))?;
        }
        Ok(())
    })
}

// VERIFICATION KEY
// ================================================================================================

/// Root of the commitment tree in its published JSON encoding.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConstRoot {
    /// Field-native root: four canonical little-endian words.
    Words([u64; goldilocks::DIGEST_WIDTH]),
    /// Curve-based root: decimal string of the scalar-field element.
    Scalar(String),
}

/// The published verification key; derived from the tree root and never
/// mutated after creation.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct VerificationKey {
    #[serde(rename = "constRoot")]
    pub const_root: ConstRoot,
}

impl VerificationKey {
    /// Returns the verification key for a field-native tree.
    pub fn from_goldilocks_tree(tree: &MerkleTree<Rp64RowHasher>) -> Self {
        Self {
            const_root: ConstRoot::Words(goldilocks::node_words(tree.root())),
        }
    }

    /// Returns the verification key for a curve-based tree.
    pub fn from_bn254_tree(tree: &MerkleTree<Bn254RowHasher>) -> Self {
        Self {
            const_root: ConstRoot::Scalar(tree.root().to_string()),
        }
    }
}

/// Writes the verification key as a JSON document.
pub fn write_verification_key(path: &Path, key: &VerificationKey) -> Result<(), BuildError> {
    let mut json = serde_json::to_string_pretty(key).map_err(|err| BuildError::FileWrite {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    json.push('\n');
    fs::write(path, json).map_err(|err| BuildError::FileWrite {
        path: path.display().to_string(),
        reason: err.to_string(),
    })
}

// HELPER FUNCTIONS
// ================================================================================================

fn write_file<F>(path: &Path, write_contents: F) -> Result<(), BuildError>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let result = File::create(path).and_then(|file| {
        let mut writer = BufWriter::new(file);
        write_contents(&mut writer)?;
        writer.flush()
    });
    result.map_err(|err| BuildError::FileWrite {
        path: path.display().to_string(),
        reason: err.to_string(),
    })
}

fn write_elements<W: Write>(writer: &mut W, elements: &[BaseElement]) -> io::Result<()> {
    for element in elements {
        writer.write_all(&element.as_int().to_le_bytes())?;
    }
    Ok(())
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use std::{env, fs, path::PathBuf};

    use rand_utils::rand_vector;
    use winter_math::StarkField;

    use super::{load_const_pols, write_goldilocks_tree, ELEMENT_BYTES};
    use crate::{
        commit::{goldilocks, MerkleTree, Rp64RowHasher},
        errors::BuildError,
        matrix::RowMatrix,
    };

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("const-tree-{}-{}", std::process::id(), name))
    }

    #[test]
    fn load_infers_column_count() {
        let path = temp_path("const-8x2.bin");
        let data: Vec<u8> = (0u64..16).flat_map(|v| v.to_le_bytes()).collect();
        fs::write(&path, &data).unwrap();

        let matrix = load_const_pols(&path, 3).unwrap();
        assert_eq!(8, matrix.num_rows());
        assert_eq!(2, matrix.num_cols());
        assert_eq!(6, matrix.row(3)[0].as_int());
        assert_eq!(7, matrix.row(3)[1].as_int());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn load_rejects_inconsistent_size() {
        let path = temp_path("const-bad-size.bin");
        fs::write(&path, vec![0u8; 100]).unwrap();

        // 100 bytes do not hold whole columns over an 8-row domain
        let result = load_const_pols(&path, 3);
        assert!(matches!(
            result,
            Err(BuildError::SizeMismatch { actual: 100, domain_size: 8, .. })
        ));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn load_rejects_empty_file() {
        let path = temp_path("const-empty.bin");
        fs::write(&path, []).unwrap();

        let result = load_const_pols(&path, 3);
        assert!(matches!(result, Err(BuildError::SizeMismatch { .. })));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn goldilocks_artifact_layout() {
        let matrix = RowMatrix::new(rand_vector(16 * 3), 3);
        let tree = MerkleTree::<Rp64RowHasher>::build(&matrix);

        let path = temp_path("const-tree-gl.bin");
        write_goldilocks_tree(&path, &matrix, &tree).unwrap();
        let data = fs::read(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let expected_len =
            2 * ELEMENT_BYTES + matrix.values().len() * ELEMENT_BYTES
                + goldilocks::tree_num_elements(16) * ELEMENT_BYTES;
        assert_eq!(expected_len, data.len());

        // header
        assert_eq!(3, u64::from_le_bytes(data[..8].try_into().unwrap()));
        assert_eq!(16, u64::from_le_bytes(data[8..16].try_into().unwrap()));

        // matrix values are canonical little-endian words
        let first = u64::from_le_bytes(data[16..24].try_into().unwrap());
        assert_eq!(matrix.values()[0].as_int(), first);

        // the last node in the file is the root
        use winter_crypto::Digest;
        let tail = &data[data.len() - 32..];
        assert_eq!(tree.root().as_bytes().as_slice(), tail);
    }
}
