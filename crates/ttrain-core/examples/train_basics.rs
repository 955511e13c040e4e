//! Tensor Train Basics Example
//!
//! Builds trains by hand and from constructors, inspects ranks and storage,
//! evaluates entries and uses the exact structural operations.
//!
//! Run with:
//! ```bash
//! cargo run --example train_basics
//! ```

use scirs2_core::ndarray_ext::{array, Array3};
use ttrain_core::{TtMatrix, TtTensor};

fn main() -> anyhow::Result<()> {
    println!("{}", "=".repeat(80));
    println!("Tensor Train Basics");
    println!("{}", "=".repeat(80));
    println!();

    // ========================================================================
    // A(i, j) = i + j as a rank-2 train
    // ========================================================================
    let n = 1000;
    let first = Array3::from_shape_fn((1, n, 2), |(_, i, r)| if r == 0 { 1.0 } else { i as f64 });
    let last = Array3::from_shape_fn((2, n, 1), |(l, j, _)| if l == 0 { j as f64 } else { 1.0 });
    let tt = TtTensor::from_arrays(vec![first, last])?;

    println!("A(i, j) = i + j on a {}x{} grid", n, n);
    println!("  - TT-ranks: {:?}", tt.tt_ranks());
    println!("  - Parameters: {} (dense: {})", tt.num_parameters(), tt.full_size());
    println!("  - Compression ratio: {:.1}x", tt.compression_ratio());
    println!("  - A(123, 456) = {}", tt.evaluate(&[123, 456])?);
    println!();

    // ========================================================================
    // Exact arithmetic grows ranks
    // ========================================================================
    let ones = TtTensor::<f64>::ones(&[n, n])?;
    let shifted = (&tt + &ones)?;
    let squared = ttrain_core::ops::hadamard(&tt, &tt)?;
    let scaled = &tt * 0.5;
    println!("A + 1:  ranks {:?}, (A + 1)(2, 3) = {}", shifted.tt_ranks(), shifted.evaluate(&[2, 3])?);
    println!("A ∘ A:  ranks {:?}, (A ∘ A)(2, 3) = {}", squared.tt_ranks(), squared.evaluate(&[2, 3])?);
    println!("A / 2:  ranks {:?}, (A / 2)(2, 3) = {}", scaled.tt_ranks(), scaled.evaluate(&[2, 3])?);
    println!();

    // ========================================================================
    // Random trains
    // ========================================================================
    let random = TtTensor::<f64>::random(&[4, 5, 6, 7], &[2, 3, 2], 42)?;
    println!("Random train");
    println!("  - shape: {:?}", random.raw_shape());
    println!("  - ranks: {:?}", random.tt_ranks());
    for (k, core) in random.cores().iter().enumerate() {
        println!("    core {}: {:?}", k, core.dim());
    }
    println!();

    // ========================================================================
    // TT-matrix from Kronecker factors
    // ========================================================================
    let a = array![[1.0, 2.0], [3.0, 4.0]];
    let b = array![[0.0, 1.0], [1.0, 0.0]];
    let m = TtMatrix::from_kronecker_factors(&[a, b])?;
    println!("A ⊗ B as a TT-matrix: {}x{}, ranks {:?}", m.nrows(), m.ncols(), m.tt_ranks());
    for i in 0..2 {
        for k in 0..2 {
            let row: Vec<f64> = (0..2)
                .flat_map(|j| (0..2).map(move |l| (j, l)))
                .map(|(j, l)| m.evaluate(&[i, k], &[j, l]))
                .collect::<Result<_, _>>()?;
            println!("  {:?}", row);
        }
    }

    Ok(())
}
