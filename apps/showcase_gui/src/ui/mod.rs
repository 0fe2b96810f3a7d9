//! UI layer for the showcase: app shell, hero stage, and my-area overlay.

pub mod app;
pub mod hero;
pub mod my_area;

pub use app::{PersistedShowcaseSettings, ShowcaseApp, StartupConfig, SETTINGS_STORAGE_KEY};
