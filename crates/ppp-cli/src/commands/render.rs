use super::{load_instance, load_placement};
use anyhow::Result;
use ppp_core::Placement;
use std::path::Path;
use std::sync::Arc;

pub fn handle(instance_path: &Path, solution_path: Option<&Path>) -> Result<()> {
    let instance = load_instance(instance_path)?;
    let placement = match solution_path {
        Some(path) => load_placement(path, &instance)?,
        None => Placement::new(Arc::clone(&instance)),
    };
    print!("{}", placement.render());
    Ok(())
}
