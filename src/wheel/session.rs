use super::enablement::{self, EnablementMap};
use super::item::Item;
use super::layout::WheelLayout;
use super::spin::{Selection, SpinEngine};
use crate::config::WheelConfig;
use rand::Rng;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetItems(Vec<Item>),
    SetConfig(WheelConfig),
    ToggleItem(Item),
    StartSpin,
    Settle,
}

/// Side effects requested by a transition; the caller executes them.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Persist(EnablementMap),
    Animate { from: f64, to: f64, duration: Duration },
    Selected(Selection),
}

/// One wheel's state: configuration snapshot, enablement flags and the spin
/// engine. List changes that arrive mid-spin are held until the spin settles.
pub struct Session<R> {
    config: WheelConfig,
    enabled: EnablementMap,
    engine: SpinEngine,
    selected: Option<Item>,
    pending: Option<WheelConfig>,
    rng: R,
}

impl<R: Rng> Session<R> {
    pub fn begin(config: WheelConfig, persisted: Option<&EnablementMap>, rng: R) -> Self {
        let enabled = enablement::initialize(&config.items, persisted);
        Self {
            config,
            enabled,
            engine: SpinEngine::new(),
            selected: None,
            pending: None,
            rng,
        }
    }

    pub fn apply(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::SetItems(items) => {
                let config = WheelConfig {
                    items,
                    ..self.next_config().clone()
                };
                self.replace_config(config)
            }
            Action::SetConfig(config) => self.replace_config(config),
            Action::ToggleItem(item) => self.toggle(&item),
            Action::StartSpin => self.start_spin(),
            Action::Settle => self.settle(),
        }
    }

    fn next_config(&self) -> &WheelConfig {
        self.pending.as_ref().unwrap_or(&self.config)
    }

    fn replace_config(&mut self, config: WheelConfig) -> Vec<Effect> {
        if self.engine.is_spinning() {
            log::debug!("Deferring configuration change until the spin settles");
            self.pending = Some(config);
            return Vec::new();
        }

        let next = enablement::resync(&config.items, &self.enabled);
        self.config = config;
        if next == self.enabled {
            return Vec::new();
        }
        self.enabled = next;
        vec![Effect::Persist(self.enabled.clone())]
    }

    fn toggle(&mut self, item: &Item) -> Vec<Effect> {
        let next = enablement::toggle(
            &self.config.items,
            &self.enabled,
            item,
            self.engine.is_spinning(),
        );
        if next == self.enabled {
            return Vec::new();
        }
        self.enabled = next;
        vec![Effect::Persist(self.enabled.clone())]
    }

    fn start_spin(&mut self) -> Vec<Effect> {
        let active = self.active_items();
        self.engine
            .start(&active, &mut self.rng)
            .map(|spin| Effect::Animate {
                from: spin.from,
                to: spin.to,
                duration: self.config.spin_duration,
            })
            .into_iter()
            .collect()
    }

    fn settle(&mut self) -> Vec<Effect> {
        let Some(selection) = self.engine.settle() else {
            return Vec::new();
        };
        self.selected = Some(selection.item.clone());

        let mut effects = vec![Effect::Selected(selection)];
        if let Some(config) = self.pending.take() {
            effects.extend(self.replace_config(config));
        }
        effects
    }
}

impl<R> Session<R> {
    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn items(&self) -> &[Item] {
        &self.config.items
    }

    pub fn enabled(&self) -> &EnablementMap {
        &self.enabled
    }

    pub fn active_items(&self) -> Vec<Item> {
        enablement::active_items(&self.config.items, &self.enabled)
    }

    pub fn layout(&self, size: f64) -> WheelLayout {
        WheelLayout::compute(&self.active_items(), size)
    }

    /// Whether the spin trigger should be enabled.
    pub fn can_spin(&self) -> bool {
        !self.engine.is_spinning() && !self.active_items().is_empty()
    }

    pub fn is_spinning(&self) -> bool {
        self.engine.is_spinning()
    }

    pub fn rotation(&self) -> f64 {
        self.engine.rotation()
    }

    /// Label of the most recent selection.
    pub fn selected(&self) -> Option<&Item> {
        self.selected.as_ref()
    }
}
