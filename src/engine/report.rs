// src/engine/report.rs

//! Human-readable rendering of batch sequences.

use std::io::{self, Write};

use crate::dag::TargetSet;

/// Write one block per batch:
///
/// ```text
/// ========= TARGET SET 0 (1 targets)
///  - A
///
/// ========= TARGET SET 1 (2 targets)
///  - B
///  - C
/// ```
///
/// `empty_message` is written instead when there are no batches.
pub fn write_target_sets<W: Write>(
    w: &mut W,
    sets: &[TargetSet],
    empty_message: &str,
) -> io::Result<()> {
    if sets.is_empty() {
        writeln!(w, "{empty_message}")?;
        return Ok(());
    }

    for (i, set) in sets.iter().enumerate() {
        if i != 0 {
            writeln!(w)?;
        }
        writeln!(w, "========= TARGET SET {} ({} targets)", i, set.len())?;
        for target in set {
            writeln!(w, " - {target}")?;
        }
    }
    Ok(())
}
