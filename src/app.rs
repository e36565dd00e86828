use crate::config::{self, Config, ViewConfig};
use crate::events::AppEvent;
use crate::store::{EnablementStore, PersistKey, Storage};
use crate::sys::animation;
use crate::wheel::{Action, Effect, RenderModel, Selection, Session};
use async_channel::{Receiver, Sender};
use rand::Rng;
use std::ops::ControlFlow;
use std::path::PathBuf;

pub type SelectHandler = Box<dyn FnMut(&Selection)>;

/// Event loop around a wheel session: turns `AppEvent`s into actions and
/// carries out the resulting effects.
pub struct AppModel<S, R> {
    session: Session<R>,
    store: EnablementStore<S>,
    persist_key: PersistKey,
    view: ViewConfig,
    config_path: Option<PathBuf>,
    tx: Sender<AppEvent>,
    on_select: SelectHandler,
}

impl<S: Storage, R: Rng> AppModel<S, R> {
    pub fn new(
        config: &Config,
        config_path: Option<PathBuf>,
        store: EnablementStore<S>,
        rng: R,
        tx: Sender<AppEvent>,
        on_select: SelectHandler,
    ) -> Self {
        let persisted = store.load(&config.persist_key);
        let session = Session::begin(config.wheel(), persisted.as_ref(), rng);
        Self {
            session,
            store,
            persist_key: config.persist_key.clone(),
            view: config.view.clone(),
            config_path,
            tx,
            on_select,
        }
    }

    pub fn session(&self) -> &Session<R> {
        &self.session
    }

    pub fn store(&self) -> &EnablementStore<S> {
        &self.store
    }

    pub fn render_model(&self) -> RenderModel {
        RenderModel::build(&self.session, &self.view)
    }

    pub fn update(&mut self, event: AppEvent) -> ControlFlow<()> {
        let action = match event {
            AppEvent::Spin => Action::StartSpin,
            AppEvent::Toggle(item) => Action::ToggleItem(item),
            AppEvent::Settle => Action::Settle,
            AppEvent::ConfigReload => match self.reload_config() {
                Some(action) => action,
                None => return ControlFlow::Continue(()),
            },
            AppEvent::Quit => return ControlFlow::Break(()),
        };
        let effects = self.session.apply(action);
        self.run_effects(effects);
        ControlFlow::Continue(())
    }

    fn reload_config(&mut self) -> Option<Action> {
        let loaded = match &self.config_path {
            Some(path) => config::load_config_from(path),
            None => config::load_config(),
        };
        match loaded {
            Ok(new_config) => {
                if new_config.persist_key != self.persist_key {
                    log::warn!(
                        "persist_key changed to '{}'; it takes effect on restart",
                        new_config.persist_key
                    );
                }
                self.view = new_config.view.clone();
                log::info!("Configuration reloaded");
                Some(Action::SetConfig(new_config.wheel()))
            }
            Err(e) => {
                log::error!("Failed to reload config: {}", e);
                None
            }
        }
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Persist(map) => self.store.save(&self.persist_key, &map),
                Effect::Animate { from, to, duration } => {
                    log::debug!("Animating {:.1} -> {:.1} over {:?}", from, to, duration);
                    animation::schedule_settle(self.tx.clone(), duration);
                }
                Effect::Selected(selection) => {
                    log::info!(
                        "Selected '{}' (#{})",
                        selection.item,
                        selection.index + 1
                    );
                    (self.on_select)(&selection);
                }
            }
        }
    }

    /// Blocks until `Quit` arrives or every sender is gone.
    pub fn run(mut self, rx: Receiver<AppEvent>) {
        while let Ok(event) = rx.recv_blocking() {
            if self.update(event).is_break() {
                break;
            }
        }
    }
}
