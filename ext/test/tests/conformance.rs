//! Conformance tests that run YAML fixtures against ipstr
//!
//! Run with: cargo test -p ipstr-test --test conformance --features ipstr-test/fixtures
//!
//! Note: This test file requires the `fixtures` feature to be enabled.

#![cfg(feature = "fixtures")]

use ipstr_test::fixture::Fixture;
use std::fs;
use std::path::{Path, PathBuf};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and run one fixture file
fn run_fixture_file(name: &str) {
    let path = fixtures_dir().join(name);
    println!("Running fixture: {}", path.display());

    let yaml = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));

    // Parse potentially multiple fixtures (separated by ---)
    let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
        panic!("Failed to parse {}: {}", path.display(), e);
    });
    assert!(!fixtures.is_empty(), "{} holds no fixtures", path.display());

    for fixture in fixtures {
        println!("  Running: {} ({} cases)", fixture.name, fixture.cases.len());
        fixture.run_and_assert();
    }
}

#[test]
fn test_ipv4() {
    run_fixture_file("ipv4.yaml");
}

#[test]
fn test_ipv6() {
    run_fixture_file("ipv6.yaml");
}

#[test]
fn test_mac() {
    run_fixture_file("mac.yaml");
}

#[test]
fn test_host() {
    run_fixture_file("host.yaml");
}

/// Every fixture file in the directory parses, including ones added later.
#[test]
fn test_all_fixture_files_parse() {
    for entry in fs::read_dir(fixtures_dir()).expect("read dir") {
        let path = entry.expect("dir entry").path();
        if path.extension().is_some_and(|e| e == "yaml" || e == "yml") {
            let yaml = fs::read_to_string(&path).expect("read yaml");
            Fixture::from_yaml_multi(&yaml)
                .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e));
        }
    }
}
