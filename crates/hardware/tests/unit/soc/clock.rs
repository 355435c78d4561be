//! # Clock Tests
//!
//! Validation of the two SoC clock inputs and derivation of `refclk` from `sysclk`.

use rtsim_core::common::ClockError;
use rtsim_core::soc::clock::{Clock, ClockPort, validate_and_wire};
use std::sync::Arc;

fn driven_sysclk(hz: u64) -> Arc<Clock> {
    let root = Arc::new(Clock::fixed("SYSCLK", hz));
    let mut sysclk = Clock::new("sysclk");
    sysclk.set_source(&root);
    Arc::new(sysclk)
}

#[test]
fn new_clock_is_unconnected() {
    let clk = Clock::new("refclk");
    assert_eq!(clk.name(), "refclk");
    assert_eq!(clk.frequency_hz(), None);
    assert!(!clk.has_source());
    assert!(clk.source().is_none());
}

#[test]
fn set_source_copies_frequency() {
    let root = Arc::new(Clock::fixed("SYSCLK", 24_000_000));
    let mut clk = Clock::new("sysclk");
    clk.set_source(&root);
    assert_eq!(clk.frequency_hz(), Some(24_000_000));
    assert!(Arc::ptr_eq(clk.source().unwrap(), &root));
}

#[test]
fn port_names() {
    assert_eq!(ClockPort::Sysclk.name(), "sysclk");
    assert_eq!(ClockPort::Refclk.name(), "refclk");
}

#[test]
fn refclk_derived_one_to_one() {
    let sysclk = driven_sysclk(24_000_000);
    let mut refclk = Clock::new("refclk");

    validate_and_wire(&sysclk, &mut refclk).unwrap();

    assert_eq!(refclk.frequency_hz(), Some(24_000_000));
    assert!(Arc::ptr_eq(refclk.source().unwrap(), &sysclk));
}

#[test]
fn refclk_follows_configured_frequency() {
    let sysclk = driven_sysclk(600_000_000);
    let mut refclk = Clock::new("refclk");
    validate_and_wire(&sysclk, &mut refclk).unwrap();
    assert_eq!(refclk.frequency_hz(), Some(600_000_000));
}

#[test]
fn prewired_refclk_is_rejected() {
    let sysclk = driven_sysclk(24_000_000);
    let other = Arc::new(Clock::fixed("EXT", 1_000_000));
    let mut refclk = Clock::new("refclk");
    refclk.set_source(&other);
    let before = refclk.clone();

    let err = validate_and_wire(&sysclk, &mut refclk).unwrap_err();

    assert_eq!(
        err,
        ClockError::ExternallyDrivenInternalClock {
            clock: "refclk".into()
        }
    );
    assert_eq!(refclk, before);
}

#[test]
fn unconnected_sysclk_is_rejected() {
    let sysclk = Arc::new(Clock::new("sysclk"));
    let mut refclk = Clock::new("refclk");

    let err = validate_and_wire(&sysclk, &mut refclk).unwrap_err();

    assert_eq!(
        err,
        ClockError::MissingRequiredSource {
            clock: "sysclk".into()
        }
    );
    assert!(!refclk.has_source());
}

#[test]
fn sysclk_without_frequency_is_rejected() {
    let silent = Arc::new(Clock::new("floating"));
    let mut sysclk = Clock::new("sysclk");
    sysclk.set_source(&silent);
    let sysclk = Arc::new(sysclk);
    let mut refclk = Clock::new("refclk");

    let err = validate_and_wire(&sysclk, &mut refclk).unwrap_err();
    assert!(matches!(err, ClockError::MissingRequiredSource { .. }));
}

#[test]
fn refclk_checked_before_sysclk() {
    let sysclk = Arc::new(Clock::new("sysclk"));
    let other = Arc::new(Clock::fixed("EXT", 1_000_000));
    let mut refclk = Clock::new("refclk");
    refclk.set_source(&other);

    let err = validate_and_wire(&sysclk, &mut refclk).unwrap_err();
    assert!(matches!(
        err,
        ClockError::ExternallyDrivenInternalClock { .. }
    ));
}
