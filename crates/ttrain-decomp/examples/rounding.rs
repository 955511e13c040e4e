//! TT Rounding Example
//!
//! Exact TT arithmetic grows ranks: sums add them, Hadamard products and
//! operator applications multiply them. This example shows the growth and
//! how rounding brings ranks back down.
//!
//! Run with:
//! ```bash
//! cargo run --example rounding
//! ```

use ttrain_core::{TruncationOptions, TtMatrix, TtTensor};
use ttrain_decomp::tt_round;
use ttrain_kernels::{add, hadamard, matmul, norm, sub};

fn main() -> anyhow::Result<()> {
    println!("{}", "=".repeat(80));
    println!("TT Rounding Example");
    println!("{}", "=".repeat(80));
    println!();

    let shape = [6, 6, 6, 6, 6];
    let a = TtTensor::<f64>::random(&shape, &[3, 4, 4, 3], 42)?;
    let b = TtTensor::<f64>::random(&shape, &[2, 2, 2, 2], 43)?;
    let opts = TruncationOptions::tolerance(1e-10);

    // Sum of a tensor with itself: ranks double, rounding restores them
    let sum = add(&a, &a)?;
    let rounded = tt_round(&sum, &opts)?;
    println!("A + A");
    println!("  - ranks before rounding: {:?}", sum.tt_ranks());
    println!("  - ranks after rounding:  {:?}", rounded.ranks());
    println!();

    // Hadamard product: ranks multiply
    let product = hadamard(&a, &b)?;
    println!("A ∘ B");
    println!("  - ranks: {:?}", product.tt_ranks());
    for eps in [1e-1, 1e-3, 1e-8] {
        let rounded = tt_round(&product, &TruncationOptions::tolerance(eps))?;
        let err = norm(&sub(&rounded.tt, &product)?)? / norm(&product)?;
        println!(
            "  - eps {:e}: ranks {:?}, bound {:.2e}, error {:.2e}",
            eps,
            rounded.ranks(),
            rounded.error_bound,
            err
        );
    }
    println!();

    // Operator application: TT-matrix ranks times operand ranks
    let op = TtMatrix::from_tensor(
        TtTensor::<f64>::random(&[36; 5], &[2, 2, 2, 2], 44)?,
        shape.to_vec(),
        shape.to_vec(),
    )?;
    let y = matmul(&op, &b)?;
    let rounded = tt_round(&y, &TruncationOptions::tolerance(1e-6))?;
    println!("M · B");
    println!("  - operator ranks: {:?}", op.tt_ranks());
    println!("  - ranks before rounding: {:?}", y.tt_ranks());
    println!("  - ranks after rounding:  {:?}", rounded.ranks());

    Ok(())
}
