//! # Canonical Memory Map Tests
//!
//! Verifies the canonical Teensy 4.1 region table: exact layout, pairwise
//! disjointness, and bit-band windows staying clear of mapped regions.

use pretty_assertions::assert_eq;
use rtsim_core::common::constants::*;
use rtsim_core::soc::memory::{RegionKind, RegionSpec, canonical_region_table};

fn row(spec: &RegionSpec) -> (&str, u64, u64, RegionKind) {
    (spec.name.as_str(), spec.base, spec.size, spec.kind)
}

#[test]
fn canonical_table_matches_board_layout() {
    let table = canonical_region_table(ROM_SIZE);
    let rows: Vec<_> = table.iter().map(row).collect();
    assert_eq!(
        rows,
        vec![
            ("itcm", 0x0000_0000, 524_288, RegionKind::Ram),
            ("rom", 0x0020_0000, 131_072, RegionKind::Rom),
            ("dtcm", 0x2000_0000, 524_288, RegionKind::Ram),
            ("ram", 0x2020_0000, 524_288, RegionKind::Ram),
            ("flash", 0x6000_0000, 8_126_464, RegionKind::Ram),
            ("aips1", 0x4000_0000, 1_048_576, RegionKind::Ram),
            ("aips2", 0x4010_0000, 1_048_576, RegionKind::Ram),
            ("aips3", 0x4020_0000, 1_048_576, RegionKind::Ram),
            ("aips4", 0x4030_0000, 1_048_576, RegionKind::Ram),
            ("cm7_ppb", 0xE000_0000, 1_048_576, RegionKind::Ram),
        ]
    );
}

#[test]
fn canonical_regions_are_pairwise_disjoint() {
    let table = canonical_region_table(ROM_SIZE);
    for (i, a) in table.iter().enumerate() {
        for b in table.iter().skip(i + 1) {
            let (a_end, b_end) = (a.end().unwrap(), b.end().unwrap());
            assert!(
                a_end <= b.base || b_end <= a.base,
                "{} and {} overlap",
                a.name,
                b.name
            );
        }
    }
}

#[test]
fn rom_size_override_only_changes_rom() {
    let small = canonical_region_table(64 * KIB);
    let default = canonical_region_table(ROM_SIZE);
    for (s, d) in small.iter().zip(&default) {
        if s.name == BOOT_REGION {
            assert_eq!(s.size, 64 * KIB);
            assert_eq!(s.base, d.base);
        } else {
            assert_eq!(s, d);
        }
    }
}

#[test]
fn vector_table_base_is_rom_base_and_aligned() {
    assert_eq!(ROM_BASE % VECTOR_TABLE_ALIGN, 0);
    let table = canonical_region_table(ROM_SIZE);
    let rom = table.iter().find(|r| r.name == BOOT_REGION).unwrap();
    assert_eq!(rom.base, ROM_BASE);
    assert_eq!(rom.kind, RegionKind::Rom);
}

#[test]
fn bitband_alias_windows_are_unmapped() {
    let table = canonical_region_table(ROM_SIZE);
    for target in [BITBAND_SRAM_BASE, BITBAND_PERIPH_BASE] {
        let alias = target + BITBAND_ALIAS_OFFSET;
        let alias_end = alias + BITBAND_ALIAS_SIZE;
        for spec in &table {
            let end = spec.end().unwrap();
            assert!(
                end <= alias || alias_end <= spec.base,
                "alias window at {alias:#x} overlaps {}",
                spec.name
            );
        }
    }
}
