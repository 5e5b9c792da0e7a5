//! Mobile search bottom sheet.
//!
//! Positions are fractions of the viewport height the sheet covers. While a
//! finger is down the sheet is `Dragging`; on release it snaps to the nearest
//! rest position, or one step in the flick direction when released fast.

use serde::Serialize;

/// Release speed (viewport heights per second) above which a drag is a flick
pub const FLICK_VELOCITY: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SnapPoint {
    Collapsed,
    Half,
    Expanded,
}

impl SnapPoint {
    const ALL: [SnapPoint; 3] = [SnapPoint::Collapsed, SnapPoint::Half, SnapPoint::Expanded];

    /// Share of the viewport height covered at this position
    pub fn height(&self) -> f64 {
        match self {
            SnapPoint::Collapsed => 0.12,
            SnapPoint::Half => 0.5,
            SnapPoint::Expanded => 0.92,
        }
    }

    fn up(self) -> Self {
        match self {
            SnapPoint::Collapsed => SnapPoint::Half,
            SnapPoint::Half | SnapPoint::Expanded => SnapPoint::Expanded,
        }
    }

    fn down(self) -> Self {
        match self {
            SnapPoint::Expanded => SnapPoint::Half,
            SnapPoint::Half | SnapPoint::Collapsed => SnapPoint::Collapsed,
        }
    }

    fn nearest(height: f64) -> Self {
        Self::ALL
            .into_iter()
            .min_by(|a, b| {
                (a.height() - height)
                    .abs()
                    .total_cmp(&(b.height() - height).abs())
            })
            .unwrap_or(SnapPoint::Half)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SheetState {
    Resting(SnapPoint),
    Dragging {
        from: SnapPoint,
        /// Pointer position at drag start, as a fraction from the top
        start_y: f64,
        height: f64,
    },
}

/// Pointer positions are fractions of the viewport height from the top
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SheetEvent {
    DragStart { y: f64 },
    DragMove { y: f64 },
    /// `velocity` is positive when moving down the screen
    DragEnd { y: f64, velocity: f64 },
    /// Tap on the handle: cycle Collapsed → Half → Expanded → Collapsed
    Tap,
}

impl SheetState {
    /// Height the sheet currently covers
    pub fn height(&self) -> f64 {
        match self {
            SheetState::Resting(point) => point.height(),
            SheetState::Dragging { height, .. } => *height,
        }
    }

    pub fn transition(self, event: SheetEvent) -> SheetState {
        match (self, event) {
            (SheetState::Resting(from), SheetEvent::DragStart { y }) => SheetState::Dragging {
                from,
                start_y: y,
                height: from.height(),
            },
            (SheetState::Resting(point), SheetEvent::Tap) => SheetState::Resting(match point {
                SnapPoint::Collapsed => SnapPoint::Half,
                SnapPoint::Half => SnapPoint::Expanded,
                SnapPoint::Expanded => SnapPoint::Collapsed,
            }),
            (SheetState::Dragging { from, start_y, .. }, SheetEvent::DragMove { y }) => {
                SheetState::Dragging {
                    from,
                    start_y,
                    height: dragged_height(from, start_y, y),
                }
            }
            (SheetState::Dragging { from, start_y, .. }, SheetEvent::DragEnd { y, velocity }) => {
                let target = if velocity <= -FLICK_VELOCITY {
                    from.up()
                } else if velocity >= FLICK_VELOCITY {
                    from.down()
                } else {
                    SnapPoint::nearest(dragged_height(from, start_y, y))
                };
                SheetState::Resting(target)
            }
            // A second DragStart or a tap mid-drag is ignored
            (state, _) => state,
        }
    }
}

fn dragged_height(from: SnapPoint, start_y: f64, y: f64) -> f64 {
    (from.height() + (start_y - y)).clamp(SnapPoint::Collapsed.height(), SnapPoint::Expanded.height())
}
