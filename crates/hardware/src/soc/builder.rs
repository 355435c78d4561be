//! System-on-Chip construction and the top-level `Soc` type.
//!
//! The SoC owns the region table, both clock inputs, the core configuration and the address
//! space, and produces the realized core. Realization runs once and performs, in order:
//! 1. **Clock validation:** `refclk` must be unconnected and `sysclk` driven; `refclk` is then derived.
//! 2. **Memory map:** Every region in the table is allocated and inserted into the address space.
//! 3. **Core:** The processor core is configured and bound to the address space and clocks.
//!
//! The first failure moves the SoC to `Failed`. Nothing is rolled back: regions mapped before
//! a core failure stay mapped, and a failed SoC cannot be realized again.

use std::sync::Arc;

use tracing::{info, warn};

use crate::common::constants::ROM_SIZE;
use crate::common::error::{MapError, SocError};
use crate::core::{CoreConfig, CoreHandle, configure_and_realize};
use crate::soc::clock::{self, Clock, ClockPort};
use crate::soc::interconnect::AddressSpace;
use crate::soc::memory::{MemoryRegion, RegionSpec, canonical_region_table, composer};

/// Lifecycle of a SoC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocState {
    /// Properties and clock ports may still be set.
    Constructed,
    /// Validation and mapping in progress.
    Realizing,
    /// All regions mapped and the core instantiated.
    Realized,
    /// Realization failed; the SoC must not be reused.
    Failed,
}

/// The Teensy 4.1 system-on-chip device.
#[derive(Debug)]
pub struct Soc {
    state: SocState,
    core_config: CoreConfig,
    region_table: Vec<RegionSpec>,
    regions: Vec<Arc<MemoryRegion>>,
    address_space: Arc<AddressSpace>,
    sysclk: Arc<Clock>,
    refclk: Arc<Clock>,
}

impl Default for Soc {
    /// Canonical Teensy 4.1: default core configuration and region table.
    fn default() -> Self {
        Self::new(CoreConfig::default(), canonical_region_table(ROM_SIZE))
    }
}

impl Soc {
    /// Creates an unrealized SoC with unconnected clock inputs and an empty address space.
    pub fn new(core_config: CoreConfig, region_table: Vec<RegionSpec>) -> Self {
        Self {
            state: SocState::Constructed,
            core_config,
            region_table,
            regions: Vec::new(),
            address_space: Arc::new(AddressSpace::new()),
            sysclk: Arc::new(Clock::new(ClockPort::Sysclk.name())),
            refclk: Arc::new(Clock::new(ClockPort::Refclk.name())),
        }
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> SocState {
        self.state
    }

    fn require(&self, expected: SocState) -> Result<(), SocError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SocError::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }

    /// Connects a clock input port to `source`.
    ///
    /// Board code is expected to connect `sysclk` only; connecting `refclk` is accepted here
    /// but rejected at realization.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless the SoC is still `Constructed`.
    pub fn connect_clock(&mut self, port: ClockPort, source: &Arc<Clock>) -> Result<(), SocError> {
        self.require(SocState::Constructed)?;
        let input = match port {
            ClockPort::Sysclk => &mut self.sysclk,
            ClockPort::Refclk => &mut self.refclk,
        };
        Arc::make_mut(input).set_source(source);
        Ok(())
    }

    /// Overrides the `cpu-type` property.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless the SoC is still `Constructed`.
    pub fn set_cpu_type(&mut self, cpu_type: impl Into<String>) -> Result<(), SocError> {
        self.require(SocState::Constructed)?;
        self.core_config.cpu_type = cpu_type.into();
        Ok(())
    }

    /// Validates clocks, maps every region and realizes the core.
    ///
    /// The SoC produces exactly one core; ownership passes to the caller.
    ///
    /// # Errors
    ///
    /// `InvalidState` if called more than once; otherwise the first clock, map or realize
    /// error, after which the SoC is `Failed`.
    pub fn realize(&mut self) -> Result<CoreHandle, SocError> {
        self.require(SocState::Constructed)?;
        self.state = SocState::Realizing;

        match self.realize_steps() {
            Ok(core) => {
                self.state = SocState::Realized;
                info!(regions = self.regions.len(), "SoC realized");
                Ok(core)
            }
            Err(err) => {
                self.state = SocState::Failed;
                warn!(
                    error = %err,
                    mapped = self.address_space.len(),
                    "SoC realization failed"
                );
                Err(err)
            }
        }
    }

    fn realize_steps(&mut self) -> Result<CoreHandle, SocError> {
        clock::validate_and_wire(&self.sysclk, Arc::make_mut(&mut self.refclk))?;

        let space = Arc::get_mut(&mut self.address_space).ok_or(MapError::AddressSpaceShared)?;
        self.regions = composer::map_all(space, &self.region_table)?;

        let core = configure_and_realize(
            self.core_config.clone(),
            Arc::clone(&self.address_space),
            &self.sysclk,
            &self.refclk,
        )?;
        Ok(core)
    }

    /// Core configuration the SoC was built with.
    pub const fn core_config(&self) -> &CoreConfig {
        &self.core_config
    }

    /// Region table the SoC maps at realization.
    pub fn region_table(&self) -> &[RegionSpec] {
        &self.region_table
    }

    /// Regions created by a successful realization, in table order.
    pub fn regions(&self) -> &[Arc<MemoryRegion>] {
        &self.regions
    }

    /// Looks up a realized region by name.
    pub fn region(&self, name: &str) -> Option<&Arc<MemoryRegion>> {
        self.regions.iter().find(|r| r.name() == name)
    }

    /// The physical address space regions are mapped into.
    pub const fn address_space(&self) -> &Arc<AddressSpace> {
        &self.address_space
    }

    /// The `sysclk` input.
    pub const fn sysclk(&self) -> &Arc<Clock> {
        &self.sysclk
    }

    /// The `refclk` input.
    pub const fn refclk(&self) -> &Arc<Clock> {
        &self.refclk
    }
}
