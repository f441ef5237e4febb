//! Content-region layout engine.
//!
//! `RegionLayout` turns the raw rectangles reported by a [`RegionSource`] into
//! a normalized, classified region set:
//! - regions are kept in canonical order (top to bottom, then left to right)
//! - slivers below the configured minimum size are merged into a neighbour
//! - the arrangement is classified as a [`SplitKind`]
//!
//! Each `update` compares the new state against a snapshot of the old one so
//! callers only redraw when something material changed.

use thiserror::Error;

use crate::config::LayoutOptions;
use crate::emulation::{emulated_regions, EmulationState};
use crate::source::{RegionQuery, RegionSource};
use crate::types::{LayoutSnapshot, Rect, SplitKind, WindowGeometry};

/// Reasons a region query could not produce a region list
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The source failed without recovery information
    #[error("region source failed")]
    Failed,

    /// The source asked for a capacity no larger than the one it was given
    #[error("region source requested capacity {required} but {capacity} was supplied")]
    NoProgress { required: usize, capacity: usize },

    /// The source kept asking for more capacity
    #[error("region source still short of capacity after {0} retries")]
    RetriesExhausted(usize),
}

/// Query `source` until it fills a buffer, growing capacity as requested
pub fn resolve_regions<S: RegionSource>(
    source: &S,
    window: Option<S::Window>,
    initial_capacity: usize,
    max_retries: usize,
) -> Result<Vec<Rect>, QueryError> {
    let mut capacity = initial_capacity;
    let mut retries = 0;

    loop {
        match source.query_regions(window, capacity) {
            RegionQuery::Filled(mut regions) => {
                // A source may hand back more than it was asked for; keep what fits
                regions.truncate(capacity);
                return Ok(regions);
            }
            RegionQuery::NeedsCapacity(required) => {
                if required <= capacity {
                    return Err(QueryError::NoProgress { required, capacity });
                }
                if retries == max_retries {
                    return Err(QueryError::RetriesExhausted(retries));
                }
                log::debug!("Growing region buffer from {} to {}", capacity, required);
                capacity = required;
                retries += 1;
            }
            RegionQuery::Failed => return Err(QueryError::Failed),
        }
    }
}

/// Does the host report more than one region, ignoring any window or emulation?
pub fn multiple_screens_present<S: RegionSource>(source: &S) -> bool {
    match source.query_regions(None, 0) {
        RegionQuery::NeedsCapacity(count) => count > 1,
        RegionQuery::Filled(regions) => regions.len() > 1,
        RegionQuery::Failed => false,
    }
}

/// Classify the arrangement of an already-ordered region set
pub fn classify(regions: &[Rect]) -> SplitKind {
    match regions {
        [_] => SplitKind::None,
        [a, b] if a.top == b.top && a.bottom == b.bottom => SplitKind::Vertical,
        [a, b] if a.left == b.left && a.right == b.right => SplitKind::Horizontal,
        _ => SplitKind::Unknown,
    }
}

/// Merge regions narrower or shorter than `min_size` into an adjacent region.
///
/// A sliver is absorbed by the first region (in current order) that shares
/// its opposite edge and has exactly the same perpendicular span. Slivers
/// with no such neighbour are left alone. The result is in canonical order.
pub fn collapse_slivers(regions: &mut Vec<Rect>, min_size: i32) {
    for i in 0..regions.len() {
        let sliver = regions[i];
        if sliver.is_empty() {
            continue;
        }

        if sliver.width() < min_size {
            let neighbour = (0..regions.len()).find(|&j| {
                let r = &regions[j];
                j != i
                    && !r.is_empty()
                    && r.top == sliver.top
                    && r.bottom == sliver.bottom
                    && (r.right == sliver.left || r.left == sliver.right)
            });
            if let Some(j) = neighbour {
                if regions[j].right == sliver.left {
                    regions[j].right = sliver.right;
                } else {
                    regions[j].left = sliver.left;
                }
                regions[i].right = sliver.left;
                continue;
            }
        }

        if sliver.height() < min_size {
            let neighbour = (0..regions.len()).find(|&j| {
                let r = &regions[j];
                j != i
                    && !r.is_empty()
                    && r.left == sliver.left
                    && r.right == sliver.right
                    && (r.bottom == sliver.top || r.top == sliver.bottom)
            });
            if let Some(j) = neighbour {
                if regions[j].bottom == sliver.top {
                    regions[j].bottom = sliver.bottom;
                } else {
                    regions[j].top = sliver.top;
                }
                regions[i].bottom = sliver.top;
            }
        }
    }

    regions.retain(|r| r.width() != 0 && r.height() != 0);

    // A vertical merge can raise a region's top edge past an earlier region
    regions.sort_by_key(|r| (r.top, r.left));
}

/// Layout model of the content regions of one window
pub struct RegionLayout<S: RegionSource> {
    source: S,
    options: LayoutOptions,
    regions: Vec<Rect>,
    geometry: WindowGeometry,
    split_kind: SplitKind,
    emulation: EmulationState,
}

impl<S: RegionSource> RegionLayout<S> {
    /// Create a layout with default options
    pub fn new(source: S) -> Self {
        Self::with_options(source, LayoutOptions::default())
    }

    pub fn with_options(source: S, options: LayoutOptions) -> Self {
        Self {
            source,
            regions: Vec::with_capacity(options.initial_capacity),
            options,
            geometry: WindowGeometry::default(),
            split_kind: SplitKind::None,
            emulation: EmulationState::Off,
        }
    }

    /// Recompute the layout for the current placement of `window`.
    ///
    /// Returns true if the regions or the client rectangle changed and at
    /// least one region exists.
    pub fn update(&mut self, window: S::Window) -> bool {
        let snapshot = self.current_snapshot();

        match self.source.window_geometry(window) {
            Ok(geometry) => self.geometry = geometry,
            Err(e) => log::warn!("Failed to query window geometry, keeping previous: {:#}", e),
        }

        if let EmulationState::Active { screens, split } = self.emulation {
            self.regions = emulated_regions(self.geometry.client, screens, split);
            self.split_kind = split;
            return self.changed_since(&snapshot);
        }

        let capacity = self.options.initial_capacity.max(2);
        self.regions = match resolve_regions(
            &self.source,
            Some(window),
            capacity,
            self.options.max_query_retries,
        ) {
            Ok(regions) => regions,
            Err(e) => {
                log::warn!("{}; using the client area as the only region", e);
                vec![self.geometry.client]
            }
        };

        if self.regions.len() > 1 {
            self.regions.sort_by_key(|r| (r.top, r.left));
            if self.options.min_region_size > 0 {
                collapse_slivers(&mut self.regions, self.options.min_region_size);
            }
        }

        self.split_kind = classify(&self.regions);

        log::debug!(
            "Layout updated: {} region(s), split {}",
            self.regions.len(),
            self.split_kind
        );

        self.changed_since(&snapshot)
    }

    fn changed_since(&self, snapshot: &LayoutSnapshot) -> bool {
        !self.regions.is_empty() && self.has_changed_since(snapshot)
    }

    /// Capture the current regions and client rectangle
    pub fn current_snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            client: self.geometry.client,
            regions: self.regions.clone(),
        }
    }

    /// Does the current state differ from `snapshot`?
    pub fn has_changed_since(&self, snapshot: &LayoutSnapshot) -> bool {
        snapshot.client != self.geometry.client || snapshot.regions != self.regions
    }

    /// Replace real region queries with `screens` synthetic regions.
    ///
    /// Zero or negative turns emulation off. Takes effect on the next update,
    /// although the split kind is reported immediately.
    pub fn emulate_screens(&mut self, screens: i32, split: SplitKind) {
        self.emulation = EmulationState::new(screens, split);
        self.split_kind = self.emulation.split_kind();
        log::info!("Emulation set to {:?}", self.emulation);
    }

    pub fn is_emulating(&self) -> bool {
        self.emulation.is_active()
    }

    pub fn emulation(&self) -> EmulationState {
        self.emulation
    }

    /// Does the real source report multiple screens? Ignores emulation.
    pub fn multiple_screens_present(&self) -> bool {
        multiple_screens_present(&self.source)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Region at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`region_count`](Self::region_count).
    pub fn region(&self, index: usize) -> Rect {
        assert!(
            index < self.regions.len(),
            "invalid region index {} (count {})",
            index,
            self.regions.len()
        );
        self.regions[index]
    }

    pub fn get(&self, index: usize) -> Option<Rect> {
        self.regions.get(index).copied()
    }

    pub fn regions(&self) -> &[Rect] {
        &self.regions
    }

    pub fn client_rect(&self) -> Rect {
        self.geometry.client
    }

    pub fn window_rect(&self) -> Rect {
        self.geometry.window
    }

    pub fn geometry(&self) -> WindowGeometry {
        self.geometry
    }

    pub fn split_kind(&self) -> SplitKind {
        self.split_kind
    }

    /// Index of the widest region; the first one wins ties
    pub fn widest_index(&self) -> Option<usize> {
        first_max_by(&self.regions, Rect::width)
    }

    /// Index of the tallest region; the first one wins ties
    pub fn tallest_index(&self) -> Option<usize> {
        first_max_by(&self.regions, Rect::height)
    }

    /// Best region for wide content: the widest of a side-by-side pair,
    /// otherwise the top-most region.
    pub fn best_index_for_horizontal_content(&self) -> Option<usize> {
        if self.regions.is_empty() {
            return None;
        }
        if self.split_kind == SplitKind::Vertical {
            self.widest_index()
        } else {
            Some(0)
        }
    }

    /// The widest region of a side-by-side pair, otherwise the tallest region
    pub fn tallest_or_widest_index(&self) -> Option<usize> {
        if self.split_kind == SplitKind::Vertical {
            self.widest_index()
        } else {
            self.tallest_index()
        }
    }

    /// Index of the first region that intersects `rect`
    pub fn index_for_rect(&self, rect: &Rect) -> Option<usize> {
        self.regions.iter().position(|r| r.intersects(rect))
    }
}

fn first_max_by(regions: &[Rect], measure: impl Fn(&Rect) -> i32) -> Option<usize> {
    let mut best: Option<(usize, i32)> = None;
    for (i, r) in regions.iter().enumerate() {
        let value = measure(r);
        if best.map_or(true, |(_, v)| value > v) {
            best = Some((i, value));
        }
    }
    best.map(|(i, _)| i)
}
