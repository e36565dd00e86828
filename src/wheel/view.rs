use super::enablement::{EnablementMap, is_enabled};
use super::item::Item;
use super::layout::WheelLayout;
use super::session::Session;
use crate::config::{LegendPosition, ViewConfig};
use palette::Srgba;
use std::collections::HashMap;
use std::time::Duration;

const SHEEN: &str = "radial-gradient(circle at 50% 50%, rgba(255,255,255,0.28) 0%, \
                     rgba(250,250,250,0.16) 50%, rgba(244,244,244,0.08) 100%)";
const EASING: &str = "cubic-bezier(0.2, 0.7, 0, 1)";

pub fn css_rgba(color: Srgba<f64>) -> String {
    let (r, g, b, a) = color.into_components();
    let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("rgba({},{},{},{})", channel(r), channel(g), channel(b), a)
}

/// One colour stop pair per sector, clockwise from the top.
pub fn conic_gradient(layout: &WheelLayout) -> Option<String> {
    if layout.is_empty() || layout.sector_angle == 0.0 {
        return None;
    }
    let parts: Vec<String> = layout
        .sectors
        .iter()
        .map(|s| format!("{} {}deg {}deg", css_rgba(s.color.srgba()), s.start, s.end))
        .collect();
    Some(format!("conic-gradient({})", parts.join(", ")))
}

pub fn wheel_background(layout: &WheelLayout) -> String {
    match conic_gradient(layout) {
        Some(conic) => format!("{}, {}", conic, SHEEN),
        None => SHEEN.to_string(),
    }
}

pub fn wheel_transform(rotation: f64) -> String {
    format!("rotate({}deg)", rotation)
}

/// Only an in-flight spin animates; settling snaps without a transition.
pub fn wheel_transition(spinning: bool, duration: Duration) -> Option<String> {
    spinning.then(|| format!("transform {}ms {}", duration.as_millis(), EASING))
}

/// Places a label on its sector's midline while keeping it upright relative
/// to the wheel.
pub fn label_transform(midpoint: f64, label_radius: f64) -> String {
    format!(
        "rotate({}deg) translateY(-{}px) rotate({}deg)",
        midpoint, label_radius, -midpoint
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelView {
    pub number: usize,
    pub item: Item,
    pub transform: String,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendRow {
    /// Position on the wheel, `None` when excluded.
    pub number: Option<usize>,
    pub item: Item,
    pub included: bool,
    pub highlighted: bool,
}

/// Every configured item in list order. Duplicate labels all show the number
/// of the last matching sector.
pub fn legend_rows(items: &[Item], enabled: &EnablementMap, selected: Option<&Item>) -> Vec<LegendRow> {
    let active_index: HashMap<&Item, usize> = items
        .iter()
        .filter(|item| is_enabled(enabled, item))
        .enumerate()
        .map(|(i, item)| (item, i))
        .collect();

    items
        .iter()
        .map(|item| {
            let included = is_enabled(enabled, item);
            LegendRow {
                number: included
                    .then(|| active_index.get(item).map(|i| i + 1))
                    .flatten(),
                item: item.clone(),
                included,
                highlighted: selected == Some(item),
            }
        })
        .collect()
}

/// Everything a front end needs to draw one frame of the wheel.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderModel {
    pub title: String,
    pub background_url: String,
    pub layout: WheelLayout,
    pub rotation: f64,
    pub spinning: bool,
    pub transform: String,
    pub transition: Option<String>,
    pub wheel_background: String,
    pub labels: Vec<LabelView>,
    pub legend: Option<(LegendPosition, Vec<LegendRow>)>,
    pub trigger_enabled: bool,
}

impl RenderModel {
    pub fn build<R>(session: &Session<R>, view: &ViewConfig) -> Self {
        let config = session.config();
        let layout = session.layout(view.size);
        let selected = session.selected();
        let rotation = session.rotation();
        let spinning = session.is_spinning();

        let labels = layout
            .sectors
            .iter()
            .map(|s| LabelView {
                number: s.number(),
                item: s.item.clone(),
                transform: label_transform(s.midpoint, layout.label_radius),
                highlighted: selected == Some(&s.item),
            })
            .collect();

        let legend = view.show_legend.then(|| {
            (
                view.legend_position,
                legend_rows(session.items(), session.enabled(), selected),
            )
        });

        Self {
            title: config.title.clone(),
            background_url: config.background_url.clone(),
            wheel_background: wheel_background(&layout),
            transform: wheel_transform(rotation),
            transition: wheel_transition(spinning, config.spin_duration),
            rotation,
            spinning,
            labels,
            legend,
            trigger_enabled: session.can_spin(),
            layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WheelConfig;
    use crate::wheel::Action;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn items(labels: &[&str]) -> Vec<Item> {
        labels.iter().map(|s| Item::from(*s)).collect()
    }

    fn session(labels: &[&str]) -> Session<StdRng> {
        let config = WheelConfig {
            items: items(labels),
            ..WheelConfig::default()
        };
        Session::begin(config, None, StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_conic_gradient_for_three_sectors() {
        let layout = WheelLayout::compute(&items(&["a", "b", "c"]), 320.0);
        assert_eq!(
            conic_gradient(&layout).unwrap(),
            "conic-gradient(rgba(255,240,240,0.85) 0deg 120deg, \
             rgba(240,255,240,0.85) 120deg 240deg, \
             rgba(240,244,255,0.85) 240deg 360deg)"
        );
    }

    #[test]
    fn test_empty_wheel_has_only_sheen() {
        let layout = WheelLayout::compute(&[], 320.0);
        assert_eq!(conic_gradient(&layout), None);
        assert_eq!(wheel_background(&layout), SHEEN);
    }

    #[test]
    fn test_label_transform() {
        assert_eq!(
            label_transform(60.0, 124.0),
            "rotate(60deg) translateY(-124px) rotate(-60deg)"
        );
    }

    #[test]
    fn test_transition_only_while_spinning() {
        let d = Duration::from_millis(2500);
        assert_eq!(wheel_transition(false, d), None);
        assert_eq!(
            wheel_transition(true, d).as_deref(),
            Some("transform 2500ms cubic-bezier(0.2, 0.7, 0, 1)")
        );
    }

    #[test]
    fn test_legend_numbers_skip_excluded_items() {
        let mut s = session(&["a", "b", "c"]);
        s.apply(Action::ToggleItem(Item::from("b")));
        let rows = legend_rows(s.items(), s.enabled(), None);
        let numbers: Vec<_> = rows.iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![Some(1), None, Some(2)]);
        assert!(!rows[1].included);
    }

    #[test]
    fn test_legend_duplicates_share_last_number() {
        let list = items(&["a", "b", "a"]);
        let enabled = crate::wheel::enablement::initialize(&list, None);
        let rows = legend_rows(&list, &enabled, Some(&Item::from("a")));
        let numbers: Vec<_> = rows.iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![Some(3), Some(2), Some(3)]);
        assert!(rows[0].highlighted && rows[2].highlighted && !rows[1].highlighted);
    }

    #[test]
    fn test_render_model_tracks_spin() {
        let mut s = session(&["Alice", "Bob", "Carol"]);
        let view = ViewConfig::default();

        let idle = RenderModel::build(&s, &view);
        assert!(idle.trigger_enabled);
        assert_eq!(idle.transform, "rotate(0deg)");
        assert_eq!(idle.labels.len(), 3);
        assert_eq!(idle.labels[0].transform, label_transform(60.0, 124.0));

        s.apply(Action::StartSpin);
        let spinning = RenderModel::build(&s, &view);
        assert!(!spinning.trigger_enabled);
        assert!(spinning.transition.is_some());
        assert_eq!(spinning.transform, wheel_transform(s.rotation()));

        s.apply(Action::Settle);
        let settled = RenderModel::build(&s, &view);
        assert_eq!(settled.transition, None);
        assert_eq!(settled.labels.iter().filter(|l| l.highlighted).count(), 1);
    }

    #[test]
    fn test_legend_hidden_when_disabled() {
        let s = session(&["a"]);
        let view = ViewConfig {
            show_legend: false,
            ..ViewConfig::default()
        };
        assert_eq!(RenderModel::build(&s, &view).legend, None);
    }
}
