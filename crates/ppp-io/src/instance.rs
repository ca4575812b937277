//! Instance files
//!
//! ```text
//! # comments anywhere
//! N        number of cities
//! D        grid side
//! R_s      coverage radius
//! R_p      penalty radius
//! x y      one line per city
//! ```

use crate::lines::{next_record, records};
use crate::ParseError;
use anyhow::{Context, Result};
use ppp_core::{Instance, Radius};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub fn parse_instance(content: &str) -> Result<Instance, ParseError> {
    let mut lines = records(content);

    let n: usize = next_record(&mut lines, "city count")?.number(0, "city count")?;
    let side: u32 = next_record(&mut lines, "grid side")?.number(0, "grid side")?;
    let coverage: f64 = next_record(&mut lines, "coverage radius")?.number(0, "coverage radius")?;
    let penalty: f64 = next_record(&mut lines, "penalty radius")?.number(0, "penalty radius")?;

    // Cities are distinct cells, so the count is bounded by the grid before
    // any of them is read
    let cells = u64::from(side) * u64::from(side);
    if n as u64 > cells {
        return Err(ParseError::TooManyCities { declared: n, cells });
    }

    let mut cities = Vec::new();
    for record in lines {
        if cities.len() == n {
            return Err(ParseError::TrailingData {
                line: record.line,
                what: "city",
            });
        }
        cities.push(record.point()?);
    }
    if cities.len() != n {
        return Err(ParseError::CountMismatch {
            what: "cities",
            expected: n,
            found: cities.len(),
        });
    }

    Ok(Instance::new(
        side,
        cities,
        Radius::new(coverage)?,
        Radius::new(penalty)?,
    )?)
}

pub fn format_instance(instance: &Instance) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", instance.num_cities());
    let _ = writeln!(out, "{}", instance.side());
    let _ = writeln!(out, "{}", instance.coverage_radius());
    let _ = writeln!(out, "{}", instance.penalty_radius());
    for city in instance.cities() {
        let _ = writeln!(out, "{} {}", city.x, city.y);
    }
    out
}

pub fn read_instance(path: &Path) -> Result<Instance> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading instance file: {}", path.display()))?;
    parse_instance(&content).with_context(|| format!("parsing instance file: {}", path.display()))
}

pub fn write_instance(path: &Path, instance: &Instance) -> Result<()> {
    fs::write(path, format_instance(instance))
        .with_context(|| format!("writing instance file: {}", path.display()))
}
