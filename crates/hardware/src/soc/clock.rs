//! Clock signals and the SoC clock tree.
//!
//! The SoC has two clock inputs. `sysclk` is driven by the board; `refclk` is owned by the
//! SoC and derived from `sysclk` during realization. `validate_and_wire` enforces that
//! split before anything else is built, so a clock error never leaves mapped regions behind.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::common::error::ClockError;

/// A clock signal: a name, an optional frequency, and an optional upstream source.
#[derive(Clone, PartialEq, Eq)]
pub struct Clock {
    name: String,
    frequency_hz: Option<u64>,
    source: Option<Arc<Self>>,
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clock")
            .field("name", &self.name)
            .field("frequency_hz", &self.frequency_hz)
            .field("source", &self.source.as_ref().map(|s| s.name.as_str()))
            .finish()
    }
}

impl Clock {
    /// Creates an unconnected clock input with no frequency.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frequency_hz: None,
            source: None,
        }
    }

    /// Creates a root oscillator running at `frequency_hz`.
    pub fn fixed(name: impl Into<String>, frequency_hz: u64) -> Self {
        Self {
            name: name.into(),
            frequency_hz: Some(frequency_hz),
            source: None,
        }
    }

    /// Clock name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Frequency in Hz, if set.
    pub const fn frequency_hz(&self) -> Option<u64> {
        self.frequency_hz
    }

    /// Upstream clock, if connected.
    pub const fn source(&self) -> Option<&Arc<Self>> {
        self.source.as_ref()
    }

    /// Returns `true` if the clock has an upstream source.
    pub const fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Connects this clock to `source`, taking its frequency 1:1.
    pub fn set_source(&mut self, source: &Arc<Self>) {
        self.frequency_hz = source.frequency_hz;
        self.source = Some(Arc::clone(source));
    }
}

/// Clock input ports exposed by the SoC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClockPort {
    /// Processor clock; must be connected by the board.
    Sysclk,
    /// Reference (SysTick) clock; connected internally, never by the board.
    Refclk,
}

impl ClockPort {
    /// Port name as exposed to board code.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sysclk => "sysclk",
            Self::Refclk => "refclk",
        }
    }
}

/// Validates clock ownership and derives `refclk` from `sysclk`.
///
/// On success `refclk` has `sysclk` as its source and the same frequency.
///
/// # Errors
///
/// `ExternallyDrivenInternalClock` if `refclk` already has a source, otherwise
/// `MissingRequiredSource` if `sysclk` has no source or no frequency. Neither clock is
/// modified on failure.
pub fn validate_and_wire(sysclk: &Arc<Clock>, refclk: &mut Clock) -> Result<(), ClockError> {
    if refclk.has_source() {
        return Err(ClockError::ExternallyDrivenInternalClock {
            clock: refclk.name.clone(),
        });
    }
    if !sysclk.has_source() || sysclk.frequency_hz.is_none() {
        return Err(ClockError::MissingRequiredSource {
            clock: sysclk.name.clone(),
        });
    }

    refclk.set_source(sysclk);
    info!(
        sysclk_hz = sysclk.frequency_hz,
        refclk_hz = refclk.frequency_hz,
        "wired {} from {}",
        refclk.name,
        sysclk.name
    );
    Ok(())
}
