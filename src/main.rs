// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use std::{path::PathBuf, process};

use structopt::StructOpt;
use tracing::error;
use tracing_subscriber::EnvFilter;

use const_tree::build_const_tree;

// CLI
// ================================================================================================

#[derive(StructOpt, Debug)]
#[structopt(
    name = "const-tree",
    about = "Builds the constant-polynomial commitment tree of a STARK prover"
)]
struct Options {
    /// Binary file with constant-polynomial evaluations over the base domain
    #[structopt(short = "c", long = "const", parse(from_os_str))]
    const_pols: PathBuf,

    /// JSON file with the STARK structure (nBits, nBitsExt, verificationHashType)
    #[structopt(short = "s", long = "stark-struct", parse(from_os_str))]
    stark_struct: PathBuf,

    /// Output file for the committed tree
    #[structopt(short = "t", long = "const-tree", parse(from_os_str))]
    const_tree: PathBuf,

    /// Optional output file for the verification key
    #[structopt(short = "v", long = "verkey", parse(from_os_str))]
    verification_key: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let options = Options::from_args();
    if let Err(err) = build_const_tree(
        &options.const_pols,
        &options.stark_struct,
        &options.const_tree,
        options.verification_key.as_deref(),
    ) {
        error!("{err}");
        process::exit(1);
    }
}
