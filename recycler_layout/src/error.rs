// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Reasons a layout pass did not complete.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The adapter's item count changed while the pass was running.
    ///
    /// The pass was abandoned with every scrapped slot released, and another
    /// pass is pending.
    #[error("adapter reported {actual} items mid-pass, expected {expected}")]
    InconsistentItemCount {
        /// Count the pass started with.
        expected: usize,
        /// Count the adapter reported.
        actual: usize,
    },
}
