use crate::wheel::Item;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Spin,
    Toggle(Item),
    /// The spin animation has finished.
    Settle,
    ConfigReload,
    Quit,
}
