//! Presenter helpers: status text, status placement and per-region labels.
//!
//! These read a `RegionLayout` and produce plain values; painting them is up
//! to the caller.

use serde::Serialize;

use crate::emulation::EmulationState;
use crate::layout::RegionLayout;
use crate::source::RegionSource;
use crate::types::{Rect, SplitKind};

/// One-line summary of the layout, e.g. `2 rects (emu), client:800x480, window:800x480@(0,0)`
pub fn status_line<S: RegionSource>(layout: &RegionLayout<S>) -> String {
    let client = layout.client_rect();
    let window = layout.window_rect();
    format!(
        "{} rects{}, client:{}x{}, window:{}x{}@({},{})",
        layout.region_count(),
        if layout.is_emulating() { " (emu)" } else { "" },
        client.width(),
        client.height(),
        window.width(),
        window.height(),
        window.left,
        window.top
    )
}

/// Where the status element goes: the top of the best region for wide
/// content, inset by `margin`, `height` pixels tall.
pub fn status_placement<S: RegionSource>(
    layout: &RegionLayout<S>,
    margin: i32,
    height: i32,
) -> Option<Rect> {
    let best = layout.region(layout.best_index_for_horizontal_content()?);
    let area = best.inset(margin);
    Some(Rect::new(area.left, area.top, area.right, area.top + height))
}

/// Label and drawable area for one region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionLabel {
    pub index: usize,
    pub text: String,
    /// Region inset by the margin, minus the status element in the best region
    pub content: Rect,
}

/// Labels for every region in canonical order
pub fn region_labels<S: RegionSource>(
    layout: &RegionLayout<S>,
    margin: i32,
    status_height: i32,
) -> Vec<RegionLabel> {
    let best = layout.best_index_for_horizontal_content();
    layout
        .regions()
        .iter()
        .enumerate()
        .map(|(index, region)| {
            let mut content = region.inset(margin);
            if Some(index) == best {
                content.top += status_height + margin;
            }
            RegionLabel {
                index,
                text: format!(
                    "Rect {}, size: {} x {}\n({}, {}) - ({}, {})",
                    index,
                    region.width(),
                    region.height(),
                    region.left,
                    region.top,
                    region.right,
                    region.bottom
                ),
                content,
            }
        })
        .collect()
}

/// Serializable dump of the layout state
#[derive(Debug, Clone, Serialize)]
pub struct LayoutReport {
    pub status: String,
    pub client: Rect,
    pub window: Rect,
    pub split_kind: SplitKind,
    pub emulation: EmulationState,
    pub regions: Vec<Rect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widest_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tallest_index: Option<usize>,
}

impl LayoutReport {
    pub fn from_layout<S: RegionSource>(layout: &RegionLayout<S>) -> Self {
        Self {
            status: status_line(layout),
            client: layout.client_rect(),
            window: layout.window_rect(),
            split_kind: layout.split_kind(),
            emulation: layout.emulation(),
            regions: layout.regions().to_vec(),
            best_index: layout.best_index_for_horizontal_content(),
            widest_index: layout.widest_index(),
            tallest_index: layout.tallest_index(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ScriptedSource;

    fn dual_layout(left_width: i32) -> RegionLayout<ScriptedSource> {
        let client = Rect::new(0, 0, 800, 480);
        let mut layout = RegionLayout::new(ScriptedSource::with_regions(
            client,
            &[
                Rect::new(0, 0, left_width, 480),
                Rect::new(left_width, 0, 800, 480),
            ],
        ));
        layout.update(1);
        layout
    }

    #[test]
    fn test_status_line() {
        let mut layout = dual_layout(400);
        assert_eq!(
            status_line(&layout),
            "2 rects, client:800x480, window:800x480@(0,0)"
        );

        layout.emulate_screens(1, SplitKind::None);
        layout.update(1);
        assert_eq!(
            status_line(&layout),
            "1 rects (emu), client:800x480, window:800x480@(0,0)"
        );
    }

    #[test]
    fn test_status_placement_in_widest_region() {
        let layout = dual_layout(300);
        assert_eq!(
            status_placement(&layout, 5, 20),
            Some(Rect::new(305, 5, 795, 25))
        );
    }

    #[test]
    fn test_status_placement_without_regions() {
        let layout = RegionLayout::new(ScriptedSource::new(Rect::default()));
        assert_eq!(status_placement(&layout, 5, 20), None);
    }

    #[test]
    fn test_region_labels_reserve_status_space() {
        let layout = dual_layout(400);
        let labels = region_labels(&layout, 5, 20);

        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].content, Rect::new(5, 30, 395, 475));
        assert_eq!(labels[1].content, Rect::new(405, 5, 795, 475));
        assert!(labels[1].text.starts_with("Rect 1, size: 400 x 480"));
    }

    #[test]
    fn test_report_serializes() {
        let layout = dual_layout(400);
        let report = LayoutReport::from_layout(&layout);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["split_kind"], "vertical");
        assert_eq!(json["emulation"]["mode"], "off");
        assert_eq!(json["regions"].as_array().unwrap().len(), 2);
        assert_eq!(json["best_index"], 0);
        assert_eq!(json["regions"][1]["left"], 400);
    }
}
