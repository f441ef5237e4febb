//! Region sources: where the layout engine gets its raw content rectangles.
//!
//! A source answers a fixed-capacity query: the caller says how many
//! rectangles it can take, and the source either fills them or reports the
//! capacity it actually needs.

use std::cell::RefCell;
use std::collections::VecDeque;

use anyhow::Result;

use crate::types::{Rect, WindowGeometry};

/// Answer to a content-region query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionQuery {
    /// All regions fit in the supplied capacity
    Filled(Vec<Rect>),
    /// The supplied capacity was too small; this many slots are required
    NeedsCapacity(usize),
    /// The query failed with no recovery information
    Failed,
}

/// Host capability the layout engine depends on
pub trait RegionSource {
    /// Host handle identifying the application window
    type Window: Copy;

    /// Current outer and client rectangles of `window`
    fn window_geometry(&self, window: Self::Window) -> Result<WindowGeometry>;

    /// Content regions of `window` in client coordinates, or every region the
    /// host knows about (unclipped) when `window` is `None`.
    fn query_regions(&self, window: Option<Self::Window>, capacity: usize) -> RegionQuery;
}

/// Apply the fixed-capacity protocol to a complete list of regions
pub fn answer_query(regions: Vec<Rect>, capacity: usize) -> RegionQuery {
    if regions.len() > capacity {
        RegionQuery::NeedsCapacity(regions.len())
    } else {
        RegionQuery::Filled(regions)
    }
}

/// Compute the content regions of a window from the monitors it overlaps.
///
/// `client_area` is the window's client area in root coordinates. Each
/// monitor that overlaps it contributes the overlap, translated into client
/// coordinates. Monitors are visited in the order given. Content of the
/// window that lies off every monitor is not part of any region.
pub fn clip_to_monitors(monitors: &[Rect], client_area: Option<Rect>) -> Vec<Rect> {
    match client_area {
        None => monitors.to_vec(),
        Some(area) => monitors
            .iter()
            .filter_map(|monitor| monitor.intersection(&area))
            .map(|r| r.offset(-area.left, -area.top))
            .collect(),
    }
}

/// Deterministic source for tests and headless use.
///
/// Answers from a fixed region list using the capacity protocol, unless a
/// scripted response has been queued, in which case queued responses are
/// returned first, one per query.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    geometry: RefCell<WindowGeometry>,
    regions: RefCell<Vec<Rect>>,
    script: RefCell<VecDeque<RegionQuery>>,
    capacities: RefCell<Vec<usize>>,
}

impl ScriptedSource {
    /// Source for a window with the given client rectangle and no regions
    pub fn new(client: Rect) -> Self {
        let source = Self::default();
        source.set_geometry(WindowGeometry { window: client, client });
        source
    }

    /// Source for a window with the given client rectangle and regions
    pub fn with_regions(client: Rect, regions: &[Rect]) -> Self {
        let source = Self::new(client);
        source.set_regions(regions);
        source
    }

    pub fn set_geometry(&self, geometry: WindowGeometry) {
        *self.geometry.borrow_mut() = geometry;
    }

    /// Replace the client rectangle, keeping the outer rectangle's origin
    pub fn set_client(&self, client: Rect) {
        let mut geometry = self.geometry.borrow_mut();
        let window = geometry.window;
        geometry.client = client;
        geometry.window = Rect::from_origin_size(
            window.left,
            window.top,
            client.width().max(0) as u32,
            client.height().max(0) as u32,
        );
    }

    pub fn set_regions(&self, regions: &[Rect]) {
        *self.regions.borrow_mut() = regions.to_vec();
    }

    /// Queue a response to be returned by the next unanswered query
    pub fn push_response(&self, response: RegionQuery) {
        self.script.borrow_mut().push_back(response);
    }

    /// Capacities passed to every query so far, in order
    pub fn queried_capacities(&self) -> Vec<usize> {
        self.capacities.borrow().clone()
    }
}

impl RegionSource for ScriptedSource {
    type Window = u32;

    fn window_geometry(&self, _window: u32) -> Result<WindowGeometry> {
        Ok(*self.geometry.borrow())
    }

    fn query_regions(&self, _window: Option<u32>, capacity: usize) -> RegionQuery {
        self.capacities.borrow_mut().push(capacity);
        if let Some(response) = self.script.borrow_mut().pop_front() {
            return response;
        }
        answer_query(self.regions.borrow().clone(), capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_query_fits() {
        let regions = vec![Rect::new(0, 0, 10, 10)];
        assert_eq!(answer_query(regions.clone(), 2), RegionQuery::Filled(regions));
    }

    #[test]
    fn test_answer_query_too_small() {
        let regions = vec![
            Rect::new(0, 0, 10, 10),
            Rect::new(10, 0, 20, 10),
            Rect::new(20, 0, 30, 10),
        ];
        assert_eq!(answer_query(regions, 2), RegionQuery::NeedsCapacity(3));
        assert_eq!(answer_query(Vec::new(), 0), RegionQuery::Filled(Vec::new()));
    }

    #[test]
    fn test_clip_window_spanning_two_monitors() {
        let monitors = [
            Rect::from_origin_size(0, 0, 1920, 1080),
            Rect::from_origin_size(1920, 0, 1920, 1080),
        ];
        // Window straddles the seam: 200px on the left monitor, 600px on the right
        let client = Rect::from_origin_size(1720, 100, 800, 600);
        let regions = clip_to_monitors(&monitors, Some(client));

        assert_eq!(
            regions,
            vec![Rect::new(0, 0, 200, 600), Rect::new(200, 0, 800, 600)]
        );
    }

    #[test]
    fn test_clip_drops_offscreen_parts() {
        let monitors = [Rect::from_origin_size(0, 0, 1280, 800)];
        let client = Rect::from_origin_size(1000, 600, 800, 600);
        let regions = clip_to_monitors(&monitors, Some(client));

        assert_eq!(regions, vec![Rect::new(0, 0, 280, 200)]);
    }

    #[test]
    fn test_clip_without_window_returns_monitors() {
        let monitors = [
            Rect::from_origin_size(0, 0, 1920, 1080),
            Rect::from_origin_size(0, 1080, 1920, 1080),
        ];
        assert_eq!(clip_to_monitors(&monitors, None), monitors.to_vec());
    }

    #[test]
    fn test_scripted_source_replays_queue_then_regions() {
        let client = Rect::new(0, 0, 800, 480);
        let source = ScriptedSource::with_regions(client, &[client]);
        source.push_response(RegionQuery::Failed);

        assert_eq!(source.query_regions(Some(1), 2), RegionQuery::Failed);
        assert_eq!(
            source.query_regions(Some(1), 2),
            RegionQuery::Filled(vec![client])
        );
        assert_eq!(source.queried_capacities(), vec![2, 2]);
    }

    #[test]
    fn test_scripted_source_set_client_resizes_window() {
        let source = ScriptedSource::new(Rect::new(0, 0, 800, 480));
        source.set_client(Rect::new(0, 0, 1024, 768));

        let geometry = source.window_geometry(1).unwrap();
        assert_eq!(geometry.client, Rect::new(0, 0, 1024, 768));
        assert_eq!(geometry.window.width(), 1024);
        assert_eq!(geometry.window.height(), 768);
    }
}
