// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use recycler_layout::LayoutError;

/// Reasons a [`RecyclerView`](crate::RecyclerView) operation was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// A layout pass was abandoned; another one is pending.
    #[error(transparent)]
    Layout(#[from] LayoutError),
    /// A drag was requested but no drag-swipe controller is attached.
    #[error("no drag-swipe controller is attached")]
    DragSwipeDetached,
}
