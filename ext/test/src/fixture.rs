//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against the ipstr validators.
//! Each case names only the fields it cares about; unnamed fields are not
//! compared.

use ipstr::prelude::*;
use serde::Deserialize;

use crate::{observe_host, observe_ip, observe_mac, Family, Observation};

/// A complete test fixture
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub family: Family,
    /// Params for `family`, in their serde form. Absent means defaults.
    #[serde(default)]
    pub params: Option<serde_yaml::Value>,
    pub cases: Vec<TestCase>,
}

/// Test case
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestCase {
    pub name: String,
    pub input: String,
    pub expect: Expect,
}

/// Expected outcome. Only the fields present are checked.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Expect {
    pub valid: Option<bool>,
    pub error: Option<ErrorKey>,
    pub kind: Option<ErrorKind>,
    pub index: Option<usize>,
    pub cause: Option<ErrorKey>,
    pub version: Option<IpVersion>,
    pub address: Option<String>,
    pub upper: Option<String>,
    pub prefix_len: Option<u8>,
    pub zone: Option<String>,
    pub port: Option<u16>,
    pub service: Option<String>,
    pub name: Option<String>,
    pub bits: Option<u32>,
    pub multiple: Option<bool>,
}

fn check<T: PartialEq + std::fmt::Debug>(
    out: &mut Vec<String>,
    field: &str,
    expected: Option<&T>,
    actual: &T,
) {
    if let Some(expected) = expected {
        if expected != actual {
            out.push(format!("{field}: expected {expected:?}, got {actual:?}"));
        }
    }
}

impl Expect {
    /// Describe every field where `seen` differs from this expectation.
    #[must_use]
    pub fn mismatches(&self, seen: &Observation) -> Vec<String> {
        let mut out = Vec::new();
        // An expected error implies an invalid string.
        let valid = self.valid.or(self.error.map(|_| false));
        check(&mut out, "valid", valid.as_ref(), &seen.valid);
        check(&mut out, "error", self.error.map(Some).as_ref(), &seen.error);
        check(&mut out, "kind", self.kind.map(Some).as_ref(), &seen.kind);
        check(&mut out, "index", self.index.map(Some).as_ref(), &seen.index);
        check(&mut out, "cause", self.cause.map(Some).as_ref(), &seen.cause);
        check(&mut out, "version", self.version.map(Some).as_ref(), &seen.version);
        check(&mut out, "address", self.address.clone().map(Some).as_ref(), &seen.address);
        check(&mut out, "upper", self.upper.clone().map(Some).as_ref(), &seen.upper);
        check(&mut out, "prefix_len", self.prefix_len.map(Some).as_ref(), &seen.prefix_len);
        check(&mut out, "zone", self.zone.clone().map(Some).as_ref(), &seen.zone);
        check(&mut out, "port", self.port.map(Some).as_ref(), &seen.port);
        check(&mut out, "service", self.service.clone().map(Some).as_ref(), &seen.service);
        check(&mut out, "name", self.name.clone().map(Some).as_ref(), &seen.name);
        check(&mut out, "bits", self.bits.map(Some).as_ref(), &seen.bits);
        check(&mut out, "multiple", self.multiple.as_ref(), &seen.multiple);
        out
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Params
// ═══════════════════════════════════════════════════════════════════════════════

/// Family params, decoded from a fixture's `params` block.
#[derive(Debug, Clone, Copy)]
enum Params {
    Ip(IpAddressStringParams),
    Mac(MacAddressStringParams),
    Host(HostNameParams),
}

impl Fixture {
    fn params(&self) -> Result<Params, serde_yaml::Error> {
        let value = self.params.clone().unwrap_or(serde_yaml::Value::Null);
        let empty = value.is_null();
        Ok(match self.family {
            Family::Ip if empty => Params::Ip(IpAddressStringParams::default()),
            Family::Ip => Params::Ip(serde_yaml::from_value(value)?),
            Family::Mac if empty => Params::Mac(MacAddressStringParams::default()),
            Family::Mac => Params::Mac(serde_yaml::from_value(value)?),
            Family::Host if empty => Params::Host(HostNameParams::default()),
            Family::Host => Params::Host(serde_yaml::from_value(value)?),
        })
    }
}

impl Params {
    fn observe(&self, text: &str) -> Observation {
        match self {
            Self::Ip(p) => observe_ip(p, text),
            Self::Mac(p) => observe_mac(p, text),
            Self::Host(p) => observe_host(p, text),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub mismatches: Vec<String>,
    pub actual: Observation,
}

impl Fixture {
    /// Parse a fixture from YAML
    ///
    /// # Errors
    ///
    /// Malformed YAML or an unknown field.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    ///
    /// # Errors
    ///
    /// The first document that fails to parse.
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Run all test cases and return results
    ///
    /// # Errors
    ///
    /// The fixture's `params` block does not decode for its family.
    pub fn run(&self) -> Result<Vec<CaseResult>, serde_yaml::Error> {
        let params = self.params()?;
        Ok(self
            .cases
            .iter()
            .map(|case| {
                let actual = params.observe(&case.input);
                let mismatches = case.expect.mismatches(&actual);
                CaseResult {
                    case_name: case.name.clone(),
                    passed: mismatches.is_empty(),
                    mismatches,
                    actual,
                }
            })
            .collect())
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        let results = self
            .run()
            .unwrap_or_else(|e| panic!("Fixture '{}' has bad params: {e}", self.name));
        for result in results {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: {}\n  observed {:?}",
                self.name,
                result.case_name,
                result.mismatches.join("; "),
                result.actual
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r"
name: sample
family: ip
cases:
  - name: plain
    input: 1.2.3.4
    expect: { version: ipv4, address: 1.2.3.4 }
  - name: wrong on purpose
    input: 1.2.3.4
    expect: { prefix_len: 8 }
---
name: strict
family: ip
params:
  ipv4:
    format:
      range: { wildcard: false, range_separator: false, reverse_range: false, single_wildcard: false, inferred_boundary: false }
  ipv6:
    format:
      range: { wildcard: false, range_separator: false, reverse_range: false, single_wildcard: false, inferred_boundary: false }
cases:
  - name: wildcard refused
    input: 1.2.3.*
    expect: { error: WildcardNotAllowed }
";

    #[test]
    fn multi_document_parse() {
        let fixtures = Fixture::from_yaml_multi(SAMPLE).unwrap();
        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures[0].family, Family::Ip);
        assert!(fixtures[1].params.is_some());
    }

    #[test]
    fn mismatches_are_reported() {
        let fixtures = Fixture::from_yaml_multi(SAMPLE).unwrap();
        let results = fixtures[0].run().unwrap();
        assert!(results[0].passed);
        assert!(!results[1].passed);
        assert_eq!(results[1].mismatches.len(), 1);
        assert!(results[1].mismatches[0].starts_with("prefix_len"));
    }

    #[test]
    fn params_block_applies() {
        let fixtures = Fixture::from_yaml_multi(SAMPLE).unwrap();
        fixtures[1].run_and_assert();
    }

    #[test]
    fn unknown_fields_rejected() {
        let yaml = "name: x\nfamily: ip\ncases:\n  - { name: a, input: b, expect: { bogus: 1 } }\n";
        assert!(Fixture::from_yaml(yaml).is_err());
    }
}
