//! Quick Start Example
//!
//! Seeds a tensor train from a dense array, applies an operator, rounds the
//! result, and processes a batch with a cancel flag.
//!
//! Run with:
//! ```bash
//! cargo run --example quickstart
//! ```

use scirs2_core::ndarray::Dimension;
use scirs2_core::ndarray_ext::{Array2, ArrayD, IxDyn};
use std::sync::atomic::AtomicBool;
use ttrain::batch::decompose_batch;
use ttrain::prelude::*;

fn main() -> anyhow::Result<()> {
    println!("{}", "=".repeat(80));
    println!("ttrain Quick Start");
    println!("{}", "=".repeat(80));
    println!();

    // ========================================================================
    // Dense -> TT
    // ========================================================================
    let shape = [8, 8, 8, 8];
    let dense = ArrayD::from_shape_fn(IxDyn(&shape), |idx| {
        let s: f64 = idx.slice().iter().map(|&i| i as f64 / 8.0).sum();
        (1.0 + s).sqrt()
    });
    let x = decompose(&dense.view(), TruncationOptions::tolerance(1e-8))?;
    println!("decompose: shape {:?}", shape);
    println!("  - ranks: {:?}", x.tt_ranks());
    println!("  - parameters: {} of {}", x.num_parameters(), x.full_size());
    println!();

    // ========================================================================
    // Operator application and rounding
    // ========================================================================
    // (I + 0.5 · S) with S a shift along the first mode, built from Kronecker factors
    let shift = Array2::from_shape_fn((8, 8), |(i, j)| if j + 1 == i { 0.5 } else { 0.0 });
    let first = Array2::<f64>::eye(8) + &shift;
    let eye = Array2::<f64>::eye(8);
    let op = TtMatrix::from_kronecker_factors(&[first, eye.clone(), eye.clone(), eye])?;

    let y = matmul(&op, &x)?;
    let z = add(&y, &x)?;
    println!("matmul + add: ranks {:?}", z.tt_ranks());
    let z = round(&z, TruncationOptions::tolerance(1e-8))?;
    println!("after round:  ranks {:?}", z.tt_ranks());
    println!("  - norm: {:.6}", norm(&z)?);
    println!("  - <z, x>: {:.6}", inner_product(&z, &x)?);
    println!();

    // ========================================================================
    // Batches
    // ========================================================================
    let inputs: Vec<ArrayD<f64>> = (1..=8)
        .map(|p| {
            ArrayD::from_shape_fn(IxDyn(&[6, 6, 6]), |idx| {
                let s: f64 = idx.slice().iter().map(|&i| i as f64 / 6.0).sum();
                s.powi(p)
            })
        })
        .collect();
    let results = decompose_batch(&inputs, &TruncationOptions::tolerance(1e-10), None)?;
    for (p, r) in results.iter().enumerate() {
        println!("  s^{}: ranks {:?}", p + 1, r.ranks());
    }

    let cancel = AtomicBool::new(true);
    match decompose_batch(&inputs, &TruncationOptions::default(), Some(&cancel)) {
        Err(e) => println!("cancelled batch: {}", e),
        Ok(_) => println!("batch finished before cancellation"),
    }

    Ok(())
}
