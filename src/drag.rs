//! Pointer gesture handling for timeline and board cards.
//!
//! The view feeds abstract events in (`press`, `pointer_move`,
//! `drop_target_entered`/`drop_target_left`, `pointer_up`); only `pointer_up`
//! ever reaches the board, and only from an activated drag.
//!
//! ```text
//! Idle --press--> Pressed --move beyond threshold--> Dragging --pointer_up--> Idle
//!                    \--pointer_up (click)------------------------------------^
//! ```

use crate::board::{BoardError, BoardManager, BoardSnapshot};
use crate::config::DragConfig;
use crate::geometry::{Zoom, pixels_to_day_delta};
use crate::item::{ItemId, Status};
use std::sync::Arc;

/// Which surface the pressed card lives on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragSubject {
    /// Horizontal drag along the timeline at the zoom in effect when pressed.
    TimelineCard { zoom: Zoom },
    /// Drag between status columns.
    BoardCard,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Pressed {
        item_id: ItemId,
        subject: DragSubject,
    },
    Dragging {
        item_id: ItemId,
        subject: DragSubject,
        delta_x: f64,
        delta_y: f64,
        over: Option<Status>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// `pointer_up` with nothing pressed.
    Ignored,
    /// Released before the activation threshold.
    Click { item_id: ItemId },
    /// Released with no effective change: no drop target, or under a day of travel.
    Cancelled { item_id: ItemId },
    Shifted {
        item_id: ItemId,
        delta_days: i64,
        snapshot: Arc<BoardSnapshot>,
    },
    Reclassified {
        item_id: ItemId,
        status: Status,
        snapshot: Arc<BoardSnapshot>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragMachine {
    state: DragState,
    activation_distance: f64,
}

impl Default for DragMachine {
    fn default() -> Self {
        Self::from_config(&DragConfig::default())
    }
}

impl DragMachine {
    pub fn new(activation_distance: f64) -> Self {
        Self {
            state: DragState::Idle,
            activation_distance,
        }
    }

    pub fn from_config(config: &DragConfig) -> Self {
        Self::new(config.activation_distance)
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Item under an activated drag. Pressed-but-not-moved items are not active.
    pub fn active_item(&self) -> Option<ItemId> {
        match self.state {
            DragState::Dragging { item_id, .. } => Some(item_id),
            _ => None,
        }
    }

    pub fn press(&mut self, item_id: ItemId, subject: DragSubject) {
        self.state = DragState::Pressed { item_id, subject };
    }

    /// `delta_x`/`delta_y` are the pointer displacement since the press.
    pub fn pointer_move(&mut self, delta_x: f64, delta_y: f64) {
        match self.state {
            DragState::Idle => {}
            DragState::Pressed { item_id, subject } => {
                if delta_x.hypot(delta_y) > self.activation_distance {
                    self.state = DragState::Dragging {
                        item_id,
                        subject,
                        delta_x,
                        delta_y,
                        over: None,
                    };
                }
            }
            DragState::Dragging {
                item_id,
                subject,
                over,
                ..
            } => {
                self.state = DragState::Dragging {
                    item_id,
                    subject,
                    delta_x,
                    delta_y,
                    over,
                };
            }
        }
    }

    pub fn drop_target_entered(&mut self, status: Status) {
        if let DragState::Dragging { over, .. } = &mut self.state {
            *over = Some(status);
        }
    }

    pub fn drop_target_left(&mut self, status: Status) {
        if let DragState::Dragging { over, .. } = &mut self.state {
            if *over == Some(status) {
                *over = None;
            }
        }
    }

    /// Horizontal pixel offset to draw the dragged card at, on top of its
    /// committed position.
    pub fn preview_delta_pixels(&self) -> f64 {
        match self.state {
            DragState::Dragging { delta_x, .. } => delta_x,
            _ => 0.0,
        }
    }

    /// Whole-day shift a release would commit right now (timeline drags only).
    pub fn preview_day_delta(&self) -> Option<i64> {
        match self.state {
            DragState::Dragging {
                subject: DragSubject::TimelineCard { zoom },
                delta_x,
                ..
            } => Some(pixels_to_day_delta(delta_x, zoom)),
            _ => None,
        }
    }

    /// Ends the gesture, committing to `board` when the drag warrants it.
    /// The machine is back in `Idle` afterwards regardless of the result.
    pub fn pointer_up(&mut self, board: &mut BoardManager) -> Result<DragOutcome, BoardError> {
        match std::mem::take(&mut self.state) {
            DragState::Idle => Ok(DragOutcome::Ignored),
            DragState::Pressed { item_id, .. } => Ok(DragOutcome::Click { item_id }),
            DragState::Dragging {
                item_id,
                subject: DragSubject::TimelineCard { zoom },
                delta_x,
                ..
            } => {
                let delta_days = pixels_to_day_delta(delta_x, zoom);
                if delta_days == 0 {
                    return Ok(DragOutcome::Cancelled { item_id });
                }
                let snapshot = board.shift(item_id, delta_days)?;
                Ok(DragOutcome::Shifted {
                    item_id,
                    delta_days,
                    snapshot,
                })
            }
            DragState::Dragging {
                item_id,
                subject: DragSubject::BoardCard,
                over,
                ..
            } => match over {
                Some(status) => Ok(DragOutcome::Reclassified {
                    item_id,
                    status,
                    snapshot: board.reclassify(item_id, status),
                }),
                None => Ok(DragOutcome::Cancelled { item_id }),
            },
        }
    }
}
