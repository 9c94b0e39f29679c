use crate::config::{LayoutConfig, ZoomConfig};
use crate::item::{Item, ItemId};
use crate::lanes::Lane;
use crate::timeline::TimelineBounds;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("zoom must be a positive, finite number of pixels per day (got {0})")]
pub struct InvalidZoom(pub f64);

/// Pixels per day. Always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Zoom(f64);

impl Zoom {
    pub const DEFAULT: Zoom = Zoom(12.0);

    pub fn new(pixels_per_day: f64) -> Result<Self, InvalidZoom> {
        if pixels_per_day.is_finite() && pixels_per_day > 0.0 {
            Ok(Self(pixels_per_day))
        } else {
            Err(InvalidZoom(pixels_per_day))
        }
    }

    pub fn pixels_per_day(self) -> f64 {
        self.0
    }

    pub fn zoom_in(self, config: &ZoomConfig) -> Self {
        Self::new(self.0 + config.step).unwrap_or(self)
    }

    /// Steps out by `config.step`, never going below `config.min`.
    pub fn zoom_out(self, config: &ZoomConfig) -> Self {
        Self::new((self.0 - config.step).max(config.min)).unwrap_or(self)
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for Zoom {
    type Error = InvalidZoom;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Zoom> for f64 {
    fn from(value: Zoom) -> Self {
        value.0
    }
}

/// Horizontal placement of one item on the timeline canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Geometry {
    pub offset_pixels: f64,
    pub width_pixels: f64,
}

pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

pub fn map_to_geometry(item: &Item, timeline_start: NaiveDate, zoom: Zoom) -> Geometry {
    let ppd = zoom.pixels_per_day();
    Geometry {
        offset_pixels: days_between(timeline_start, item.start) as f64 * ppd,
        width_pixels: (days_between(item.start, item.end) + 1) as f64 * ppd,
    }
}

/// Converts a live horizontal drag distance into whole days. Halves round
/// toward positive infinity, so -0.5 days is 0 and +0.5 days is 1.
pub fn pixels_to_day_delta(delta_pixels: f64, zoom: Zoom) -> i64 {
    (delta_pixels / zoom.pixels_per_day() + 0.5).floor() as i64
}

/// Left edge of a card while it is being dragged.
pub fn preview_offset(geometry: &Geometry, delta_pixels: f64) -> f64 {
    geometry.offset_pixels + delta_pixels
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardPlacement {
    pub item_id: ItemId,
    pub lane: usize,
    pub top_pixels: f64,
    #[serde(flatten)]
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineLayout {
    pub zoom: Zoom,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub cards: Vec<CardPlacement>,
}

impl TimelineLayout {
    pub fn card(&self, id: ItemId) -> Option<&CardPlacement> {
        self.cards.iter().find(|card| card.item_id == id)
    }
}

/// Places every lane's cards on the canvas, lane by lane.
pub fn layout_timeline(
    lanes: &[Lane],
    bounds: &TimelineBounds,
    zoom: Zoom,
    config: &LayoutConfig,
) -> TimelineLayout {
    let cards = lanes
        .iter()
        .enumerate()
        .flat_map(|(lane_idx, lane)| {
            lane.items().iter().map(move |item| CardPlacement {
                item_id: item.id,
                lane: lane_idx,
                top_pixels: lane_idx as f64 * config.lane_height,
                geometry: map_to_geometry(item, bounds.start, zoom),
            })
        })
        .collect();

    TimelineLayout {
        zoom,
        canvas_width: bounds.total_days() as f64 * zoom.pixels_per_day(),
        canvas_height: lanes.len() as f64 * config.lane_height + config.canvas_padding,
        cards,
    }
}
