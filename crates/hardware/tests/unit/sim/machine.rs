//! # Machine Bootstrap Tests
//!
//! End-to-end construction: clock tree, region map, core properties and firmware contents.

use crate::common::harness;
use pretty_assertions::assert_eq;
use rtsim_core::common::constants::{ROM_BASE, ROM_SIZE};
use rtsim_core::common::{BootError, ClockError, MapError, RealizeError, SocError};
use rtsim_core::config::Config;
use rtsim_core::sim::{self, MachineInstance};
use rtsim_core::soc::SocState;
use std::sync::Arc;

fn boot_default(image: &[u8]) -> MachineInstance {
    harness::init_tracing();
    sim::boot_image(&Config::default(), image).unwrap()
}

#[test]
fn boot_from_file() {
    harness::init_tracing();
    let image = harness::pattern(4096);
    let file = harness::temp_image(&image);

    let machine = sim::boot(file.path(), "cortex-m7").unwrap();

    assert_eq!(machine.soc().state(), SocState::Realized);
    assert_eq!(machine.firmware_len(), 4096);
    let rom = machine.boot_region().unwrap();
    assert_eq!(rom.name(), "rom");
    assert_eq!(rom.contents(0, image.len()), image.as_slice());
}

#[test]
fn canonical_map_is_present() {
    let machine = boot_default(&[]);
    let space = machine.address_space();
    assert_eq!(space.len(), 10);
    let expected: [(&str, u64); 10] = [
        ("itcm", 0x0000_0000),
        ("rom", 0x0020_0000),
        ("dtcm", 0x2000_0000),
        ("ram", 0x2020_0000),
        ("flash", 0x6000_0000),
        ("aips1", 0x4000_0000),
        ("aips2", 0x4010_0000),
        ("aips3", 0x4020_0000),
        ("aips4", 0x4030_0000),
        ("cm7_ppb", 0xE000_0000),
    ];
    for (name, base) in expected {
        assert_eq!(space.region(name).map(|r| r.base()), Some(base), "{name}");
    }
}

#[test]
fn clock_tree_is_wired() {
    let machine = boot_default(&[]);
    let soc = machine.soc();

    assert_eq!(machine.root_clock().frequency_hz(), Some(24_000_000));
    assert!(Arc::ptr_eq(soc.sysclk().source().unwrap(), machine.root_clock()));
    assert!(Arc::ptr_eq(soc.refclk().source().unwrap(), soc.sysclk()));
    assert_eq!(machine.core().cpuclk().frequency_hz(), Some(24_000_000));
    assert_eq!(machine.core().refclk().frequency_hz(), Some(24_000_000));
}

#[test]
fn configured_sysclk_propagates() {
    harness::init_tracing();
    let mut config = Config::default();
    config.clock.sysclk_hz = 600_000_000;

    let machine = sim::boot_image(&config, &[]).unwrap();

    assert_eq!(machine.core().refclk().frequency_hz(), Some(600_000_000));
}

#[test]
fn core_properties_applied() {
    let machine = boot_default(&[]);
    let core = machine.core();
    assert_eq!(core.cpu_type().name(), "cortex-m7");
    assert_eq!(core.num_irq(), 160);
    assert_eq!(core.vector_table_base(), ROM_BASE);
    assert!(core.bitband_enabled());
    assert!(Arc::ptr_eq(core.memory(), machine.address_space()));
}

#[test]
fn reset_vector_from_firmware() {
    let machine = boot_default(&harness::vector_table(0x2008_0000, 0x0020_0401));
    let reset = machine.reset_vector();
    assert_eq!(reset.initial_sp, 0x2008_0000);
    assert_eq!(reset.reset_pc, 0x0020_0400);
    assert!(reset.thumb);
}

#[test]
fn firmware_in_rom_is_read_only_to_the_core() {
    let machine = boot_default(&[0x11, 0x22, 0x33, 0x44]);
    machine.core().write_u32(ROM_BASE, 0);
    assert_eq!(machine.core().read_u32(ROM_BASE), 0x4433_2211);
}

#[test]
fn full_rom_image_boots() {
    let image = harness::pattern(ROM_SIZE as usize);
    let machine = boot_default(&image);
    assert_eq!(machine.firmware_len(), image.len());
    let rom = machine.boot_region().unwrap();
    assert_eq!(rom.contents(0, image.len()), image.as_slice());
}

#[test]
fn oversized_image_fails() {
    harness::init_tracing();
    let image = harness::pattern(ROM_SIZE as usize + 1);
    let err = sim::boot_image(&Config::default(), &image).unwrap_err();
    assert!(matches!(err, BootError::ImageTooLarge { .. }));
}

#[test]
fn other_m_profile_cores_boot() {
    harness::init_tracing();
    let file = harness::temp_image(&[]);
    for variant in ["cortex-m0", "cortex-m4", "cortex-m33-arm-cpu"] {
        let machine = sim::boot(file.path(), variant).unwrap();
        assert_eq!(machine.soc().state(), SocState::Realized, "{variant}");
    }
}

#[test]
fn unsupported_core_fails_before_reading_image() {
    harness::init_tracing();
    let err = sim::boot("/nonexistent/rtsim/firmware.bin", "cortex-a7").unwrap_err();
    assert!(matches!(
        err,
        BootError::Soc(SocError::Realize(RealizeError::UnsupportedCpuType(ref t))) if t == "cortex-a7"
    ));
}

#[test]
fn missing_image_file() {
    harness::init_tracing();
    let err = sim::boot("/nonexistent/rtsim/firmware.bin", "cortex-m7").unwrap_err();
    assert!(matches!(err, BootError::ImageRead { .. }));
}

#[test]
fn missing_boot_region() {
    harness::init_tracing();
    let mut config = Config::default();
    config.memory.boot_region = "sdram".into();
    let err = sim::boot_image(&config, &[]).unwrap_err();
    assert!(matches!(err, BootError::MissingBootRegion(ref n) if n == "sdram"));
}

#[test]
fn too_many_irqs_fails() {
    harness::init_tracing();
    let mut config = Config::default();
    config.soc.num_irq = 1000;
    let err = sim::boot_image(&config, &[]).unwrap_err();
    assert!(matches!(
        err,
        BootError::Soc(SocError::Realize(RealizeError::TooManyIrqs { requested: 1000, .. }))
    ));
}

#[test]
fn explicit_region_table_boots() {
    harness::init_tracing();
    let json = r#"{
        "soc": { "vector_table_base": 4096 },
        "memory": {
            "boot_region": "boot",
            "regions": [
                { "name": "boot", "base": 4096, "size": 256, "kind": "ROM" },
                { "name": "sram", "base": 536870912, "size": 4096 }
            ]
        }
    }"#;
    let config = Config::from_json(json).unwrap();
    let image = harness::vector_table(0x2000_1000, 0x1041);

    let machine = sim::boot_image(&config, &image).unwrap();

    assert_eq!(machine.address_space().len(), 2);
    assert_eq!(machine.reset_vector().reset_pc, 0x1040);
    assert_eq!(machine.boot_region().map(|r| r.size()), Some(256));
}

#[test]
fn duplicate_boot_region_name_fails_closed() {
    harness::init_tracing();
    let json = r#"{
        "memory": {
            "regions": [
                { "name": "rom", "base": 2097152, "size": 4096, "kind": "ROM" },
                { "name": "rom", "base": 4096, "size": 4096, "kind": "ROM" },
                { "name": "sram", "base": 536870912, "size": 4096 }
            ]
        }
    }"#;
    let config = Config::from_json(json).unwrap();
    let image = harness::vector_table(0x2000_1000, 0x0020_0041);

    let err = sim::boot_image(&config, &image).unwrap_err();

    assert!(matches!(
        err,
        BootError::Soc(SocError::Map(MapError::DuplicateRegion { ref region })) if region == "rom"
    ));
}

#[test]
fn boot_error_messages_chain() {
    let err = BootError::from(SocError::Clock(ClockError::MissingRequiredSource {
        clock: "sysclk".into(),
    }));
    assert_eq!(
        err.to_string(),
        "SoC realization failed: sysclk clock must be wired up by the board code"
    );
}
