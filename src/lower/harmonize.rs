//! C7 §4.6.4: row-type harmonisation for the set operators.
//!
//! Before `union`/`except`/`intersect`, every input relation must share
//! one row type. `harmonize` computes the least-restrictive (widening)
//! type across all inputs and converts whichever inputs don't already
//! match it, preserving their original (not stack) order.

use super::builder::{RelBuilder, RelNode};

pub fn harmonize(builder: &mut dyn RelBuilder, inputs: Vec<RelNode>) -> Vec<RelNode> {
    let row_types: Vec<_> = inputs.iter().map(|r| r.row_type().clone()).collect();
    let target = builder.least_restrictive(&row_types);
    inputs
        .into_iter()
        .map(|input| {
            if input.row_type() == &target {
                input
            } else {
                builder.push(input);
                builder.convert(target.clone());
                builder.build()
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "harmonize_tests.rs"]
mod tests;
