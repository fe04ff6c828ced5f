pub mod algo;
pub mod error;
pub mod logging;
pub mod ops;
pub mod pipeline;

#[cfg(feature = "plugin")]
pub mod commands;

#[cfg(feature = "plugin")]
use nu_plugin::{Plugin, PluginCommand};

#[cfg(feature = "plugin")]
pub struct CatmergePlugin;

#[cfg(feature = "plugin")]
impl Plugin for CatmergePlugin {
    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").into()
    }

    fn commands(&self) -> Vec<Box<dyn PluginCommand<Plugin = Self>>> {
        vec![
            Box::new(commands::Normalize),
            Box::new(commands::Consolidate),
            Box::new(commands::Organize),
        ]
    }
}
