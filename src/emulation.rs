//! Emulated content regions for testing layouts without multi-screen hardware.

use serde::Serialize;

use crate::types::{Rect, SplitKind};

/// Whether region queries are replaced by synthetic regions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EmulationState {
    /// Regions come from the real source
    #[default]
    Off,
    /// The client area is divided into `screens` equal regions
    Active { screens: usize, split: SplitKind },
}

impl EmulationState {
    /// Build a state from a requested screen count; zero or negative turns emulation off.
    ///
    /// A single screen is always unsplit. Several screens without a usable
    /// split direction are laid out side by side.
    pub fn new(screens: i32, split: SplitKind) -> Self {
        if screens <= 0 {
            return EmulationState::Off;
        }
        let split = match (screens, split) {
            (1, _) => SplitKind::None,
            (_, SplitKind::Horizontal) => SplitKind::Horizontal,
            _ => SplitKind::Vertical,
        };
        EmulationState::Active {
            screens: screens as usize,
            split,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, EmulationState::Active { .. })
    }

    /// Split kind reported while this state is in effect
    pub fn split_kind(&self) -> SplitKind {
        match self {
            EmulationState::Off => SplitKind::None,
            EmulationState::Active { split, .. } => *split,
        }
    }
}

/// Divide `client` into `screens` equal slices.
///
/// Horizontal splits stack slices top to bottom; anything else places them
/// left to right. Slice sizes are floored, so leftover pixels at the far
/// edge belong to no region. No slice is narrower than one pixel: the count
/// is capped at the client's extent along the split axis.
pub fn emulated_regions(client: Rect, screens: usize, split: SplitKind) -> Vec<Rect> {
    if screens == 0 {
        return Vec::new();
    }

    let extent = if split == SplitKind::Horizontal {
        client.height()
    } else {
        client.width()
    };
    let limit = usize::try_from(extent).unwrap_or(0).max(1);
    let screens = if screens > limit {
        log::warn!(
            "Cannot emulate {} screens in {} pixels, using {}",
            screens,
            extent,
            limit
        );
        limit
    } else {
        screens
    };

    let count = screens as i32;
    let mut regions = Vec::with_capacity(screens);

    if split == SplitKind::Horizontal {
        let step = client.height() / count;
        for i in 0..count {
            let top = client.top + i * step;
            regions.push(Rect::new(client.left, top, client.right, top + step));
        }
    } else {
        let step = client.width() / count;
        for i in 0..count {
            let left = client.left + i * step;
            regions.push(Rect::new(left, client.top, left + step, client.bottom));
        }
    }

    regions
}

/// Next emulation mode in the toggle cycle, as a `(screens, split)` request.
///
/// With real multiple screens the cycle alternates between "one emulated
/// screen" (draw the whole client area, including off-screen parts) and off.
/// On a single screen it walks side-by-side, stacked, single, then off.
pub fn next_emulation(
    current: EmulationState,
    multiple_present: bool,
    split_kind: SplitKind,
    region_count: usize,
) -> (i32, SplitKind) {
    if current.is_active() {
        if multiple_present {
            (0, SplitKind::None)
        } else if split_kind == SplitKind::Vertical {
            (2, SplitKind::Horizontal)
        } else if region_count == 2 {
            (1, SplitKind::None)
        } else {
            (0, SplitKind::None)
        }
    } else if multiple_present {
        (1, SplitKind::None)
    } else {
        (2, SplitKind::Vertical)
    }
}
