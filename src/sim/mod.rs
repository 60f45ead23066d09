pub mod alert_card;
pub mod bus;
pub mod event;
pub mod runtime;
pub mod scene_with;
pub mod scene_without;
pub mod showcase;
pub mod switcher;
pub mod timer;
