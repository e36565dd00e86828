use super::item::Item;
use super::{
    EDGE_MARGIN, FULL_TURN, ITEM_SIZE, MIN_LABEL_RADIUS, MIN_POINTER_LENGTH, PALETTE_SIZE,
    POINTER_INSET, WHEEL_PADDING,
};
use palette::Srgba;
use strum::{Display as StrumDisplay, EnumIter, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum SectorColor {
    Rose,
    Mint,
    Periwinkle,
    Cream,
}

impl SectorColor {
    pub fn from_index(idx: usize) -> Self {
        Self::iter()
            .nth(idx % PALETTE_SIZE)
            .unwrap_or(Self::Rose)
    }

    pub fn srgba(&self) -> Srgba<f64> {
        let (r, g, b) = match self {
            Self::Rose => (255u8, 240u8, 240u8),
            Self::Mint => (240, 255, 240),
            Self::Periwinkle => (240, 244, 255),
            Self::Cream => (255, 249, 230),
        };
        Srgba::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            0.85,
        )
    }
}

pub fn sector_angle(active_count: usize) -> f64 {
    if active_count == 0 {
        0.0
    } else {
        FULL_TURN / active_count as f64
    }
}

/// Cycles the palette by position. When the count leaves a remainder of one,
/// the last sector would wrap onto the first sector's color, so it is moved to
/// a color that differs from both neighbours. Other counts are left alone, so
/// this is not a proper coloring in general.
pub fn color_assignment(active_count: usize) -> Vec<SectorColor> {
    let mut seq: Vec<SectorColor> = (0..active_count).map(SectorColor::from_index).collect();

    if active_count > 1 && active_count % PALETTE_SIZE == 1 {
        let first = seq[0];
        let prev = seq[active_count - 2];
        if let Some(alt) = SectorColor::iter().find(|c| *c != first && *c != prev) {
            seq[active_count - 1] = alt;
        }
    }
    seq
}

/// Keeps label badges inside the rim without collapsing onto the hub.
pub fn label_radius(wheel_radius: f64, item_size: f64, edge_margin: f64) -> f64 {
    MIN_LABEL_RADIUS.max((wheel_radius - (item_size / 2.0 + edge_margin)).round())
}

/// Clockwise angle from the top of the wheel to the middle of sector `index`.
pub fn sector_midpoint(index: usize, sector_angle: f64) -> f64 {
    index as f64 * sector_angle + sector_angle / 2.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectorGeometry {
    pub index: usize,
    pub item: Item,
    pub start: f64,
    pub end: f64,
    pub midpoint: f64,
    pub color: SectorColor,
}

impl SectorGeometry {
    /// 1-based number shown on the wheel and in the legend.
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WheelLayout {
    pub size: f64,
    pub radius: f64,
    pub sector_angle: f64,
    pub label_radius: f64,
    pub pointer_length: f64,
    pub sectors: Vec<SectorGeometry>,
}

impl WheelLayout {
    pub fn compute(active: &[Item], size: f64) -> Self {
        let radius = size / 2.0 - WHEEL_PADDING;
        let angle = sector_angle(active.len());
        let colors = color_assignment(active.len());

        let sectors = active
            .iter()
            .zip(colors)
            .enumerate()
            .map(|(index, (item, color))| SectorGeometry {
                index,
                item: item.clone(),
                start: index as f64 * angle,
                end: (index + 1) as f64 * angle,
                midpoint: sector_midpoint(index, angle),
                color,
            })
            .collect();

        Self {
            size,
            radius,
            sector_angle: angle,
            label_radius: label_radius(radius, ITEM_SIZE, EDGE_MARGIN),
            pointer_length: MIN_POINTER_LENGTH.max(radius - POINTER_INSET),
            sectors,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::DEFAULT_WHEEL_SIZE;

    fn items(labels: &[&str]) -> Vec<Item> {
        labels.iter().map(|s| Item::from(*s)).collect()
    }

    #[test]
    fn test_sector_angle() {
        assert_eq!(sector_angle(0), 0.0);
        assert_eq!(sector_angle(1), 360.0);
        assert_eq!(sector_angle(3), 120.0);
    }

    #[test]
    fn test_colors_cycle_by_position() {
        let colors = color_assignment(8);
        for (i, c) in colors.iter().enumerate() {
            assert_eq!(*c, SectorColor::from_index(i));
        }
    }

    #[test]
    fn test_five_sectors_avoid_wraparound_clash() {
        let colors = color_assignment(5);
        assert_ne!(colors[4], colors[0]);
        assert_ne!(colors[4], colors[3]);
    }

    #[test]
    fn test_wrap_fix_applies_to_every_remainder_one_count() {
        for count in [5, 9, 13, 17] {
            let colors = color_assignment(count);
            assert_ne!(colors[count - 1], colors[0], "count {count}");
            assert_ne!(colors[count - 1], colors[count - 2], "count {count}");
        }
    }

    #[test]
    fn test_single_sector_keeps_first_color() {
        assert_eq!(color_assignment(1), vec![SectorColor::Rose]);
        assert!(color_assignment(0).is_empty());
    }

    #[test]
    fn test_label_radius_floor() {
        assert_eq!(label_radius(140.0, 28.0, 2.0), 124.0);
        assert_eq!(label_radius(20.0, 28.0, 2.0), MIN_LABEL_RADIUS);
    }

    #[test]
    fn test_sector_midpoint() {
        assert_eq!(sector_midpoint(0, 120.0), 60.0);
        assert_eq!(sector_midpoint(2, 120.0), 300.0);
    }

    #[test]
    fn test_compute_layout_for_three_names() {
        let layout = WheelLayout::compute(&items(&["Alice", "Bob", "Carol"]), DEFAULT_WHEEL_SIZE);
        assert_eq!(layout.radius, 140.0);
        assert_eq!(layout.sector_angle, 120.0);
        assert_eq!(layout.label_radius, 124.0);
        assert_eq!(layout.pointer_length, 132.0);
        assert_eq!(layout.sectors.len(), 3);
        assert_eq!(layout.sectors[1].start, 120.0);
        assert_eq!(layout.sectors[1].end, 240.0);
        assert_eq!(layout.sectors[1].midpoint, 180.0);
        assert_eq!(layout.sectors[2].number(), 3);
    }

    #[test]
    fn test_compute_layout_empty() {
        let layout = WheelLayout::compute(&[], DEFAULT_WHEEL_SIZE);
        assert!(layout.is_empty());
        assert_eq!(layout.sector_angle, 0.0);
    }
}
