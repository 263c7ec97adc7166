//! Interactive-use guard
//!
//! Plugins are driven by the host over pipes. When stdout is a terminal the
//! run is refused before any protocol output is written.

use std::io::IsTerminal;

use crate::protocol::PluginError;

/// Reports whether the plugin's output is attached to a human terminal
pub trait OutputProbe {
    fn is_interactive(&self) -> bool;
}

/// Probes the real process stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutProbe;

impl OutputProbe for StdoutProbe {
    fn is_interactive(&self) -> bool {
        std::io::stdout().is_terminal()
    }
}

/// Fails with [`PluginError::InteractiveInvocation`] on a terminal
pub fn ensure_piped(probe: &dyn OutputProbe) -> Result<(), PluginError> {
    if probe.is_interactive() {
        Err(PluginError::InteractiveInvocation)
    } else {
        Ok(())
    }
}
