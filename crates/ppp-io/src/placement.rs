//! Solution files
//!
//! ```text
//! # Penalty = 403.0036...
//! T        number of towers
//! x y      one line per tower
//! ```
//!
//! The penalty header is a comment as far as the grammar is concerned. It is
//! written for humans and for [`write_placement_if_better`], and ignored on
//! parse: scores are always recomputed from the towers.

use crate::lines::{next_record, records};
use crate::ParseError;
use anyhow::{Context, Result};
use ppp_core::{Instance, Placement};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Parse a tower list against `instance`. Towers get ids in file order.
pub fn parse_placement(content: &str, instance: Arc<Instance>) -> Result<Placement, ParseError> {
    let mut lines = records(content);
    let count: usize = next_record(&mut lines, "tower count")?.number(0, "tower count")?;

    let mut placement = Placement::new(instance);
    for record in lines {
        if placement.len() == count {
            return Err(ParseError::TrailingData {
                line: record.line,
                what: "tower",
            });
        }
        let point = record.point()?;
        placement
            .add_tower(point)
            .map_err(|source| ParseError::Tower {
                line: record.line,
                source,
            })?;
    }
    if placement.len() != count {
        return Err(ParseError::CountMismatch {
            what: "towers",
            expected: count,
            found: placement.len(),
        });
    }
    Ok(placement)
}

/// Towers in id order under a `# Penalty = ..` header.
pub fn format_placement(placement: &Placement) -> String {
    let mut out = format!("# Penalty = {}\n{}\n", placement.penalty(), placement.len());
    for p in placement.points() {
        let _ = writeln!(out, "{} {}", p.x, p.y);
    }
    out
}

/// The value of the first `# Penalty = <x>` header, if any.
pub fn recorded_penalty(content: &str) -> Option<f64> {
    content.lines().find_map(|line| {
        let rest = line.trim_start().strip_prefix('#')?;
        let (key, value) = rest.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("penalty") {
            return None;
        }
        value.trim().parse().ok()
    })
}

pub fn read_placement(path: &Path, instance: Arc<Instance>) -> Result<Placement> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading solution file: {}", path.display()))?;
    parse_placement(&content, instance)
        .with_context(|| format!("parsing solution file: {}", path.display()))
}

pub fn write_placement(path: &Path, placement: &Placement) -> Result<()> {
    fs::write(path, format_placement(placement))
        .with_context(|| format!("writing solution file: {}", path.display()))
}

/// Write `placement` unless `path` already records a penalty that is no
/// worse. Returns whether the file was written.
///
/// A missing file, or one without a readable penalty header, is always
/// overwritten.
pub fn write_placement_if_better(path: &Path, placement: &Placement) -> Result<bool> {
    if path.is_file() {
        let existing = fs::read_to_string(path)
            .with_context(|| format!("reading solution file: {}", path.display()))?;
        if let Some(recorded) = recorded_penalty(&existing) {
            if placement.penalty() >= recorded {
                return Ok(false);
            }
        }
    }
    write_placement(path, placement)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ppp_core::{PlacementError, Point, Radius};

    fn instance() -> Arc<Instance> {
        Arc::new(
            Instance::new(
                6,
                vec![Point::new(1, 1)],
                Radius::from_steps(1),
                Radius::from_steps(2),
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_parse_with_header() {
        let p = parse_placement("# Penalty = 340\n2\n1 1\n4 4\n", instance()).unwrap();
        let points: Vec<Point> = p.points().collect();
        assert_eq!(points, vec![Point::new(1, 1), Point::new(4, 4)]);
        assert_eq!(p.penalty(), 340.0);
    }

    #[test]
    fn test_format_layout() {
        let p = Placement::from_points(instance(), [Point::new(1, 2)]).unwrap();
        assert_eq!(format_placement(&p), "# Penalty = 170\n1\n1 2\n");
    }

    #[test]
    fn test_format_reparses_to_same_towers() {
        let p = Placement::from_points(
            instance(),
            [Point::new(1, 1), Point::new(2, 1), Point::new(5, 0)],
        )
        .unwrap();
        let text = format_placement(&p);
        let back = parse_placement(&text, instance()).unwrap();
        assert_eq!(back.points().collect::<Vec<_>>(), p.points().collect::<Vec<_>>());
        assert_eq!(recorded_penalty(&text), Some(p.penalty()));
    }

    #[test]
    fn test_duplicate_tower_reports_line() {
        let err = parse_placement("2\n1 1\n1 1\n", instance()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Tower {
                line: 3,
                source: PlacementError::Occupied { .. }
            }
        ));
    }

    #[test]
    fn test_off_grid_tower() {
        let err = parse_placement("1\n6 0\n", instance()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Tower {
                line: 2,
                source: PlacementError::OutOfBounds { .. }
            }
        ));
    }

    #[test]
    fn test_tower_count_mismatch() {
        let err = parse_placement("3\n1 1\n", instance()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::CountMismatch {
                expected: 3,
                found: 1,
                ..
            }
        ));
        assert_eq!(parse_placement("", instance()).unwrap_err(), ParseError::Missing("tower count"));
    }

    #[test]
    fn test_recorded_penalty() {
        assert_eq!(recorded_penalty("# Penalty = 12.5\n0\n"), Some(12.5));
        assert_eq!(recorded_penalty("# note\n#Penalty=7\n"), Some(7.0));
        assert_eq!(recorded_penalty("1\n0 0\n"), None);
        assert_eq!(recorded_penalty("# Penalty = lots\n"), None);
    }
}
