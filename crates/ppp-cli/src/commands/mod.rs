pub mod render;
pub mod score;
pub mod solve;

use anyhow::Result;
use ppp_core::{Instance, Placement};
use std::path::Path;
use std::sync::Arc;

pub(crate) fn load_instance(path: &Path) -> Result<Arc<Instance>> {
    let instance = ppp_io::read_instance(path)?;
    tracing::debug!(
        side = instance.side(),
        cities = instance.num_cities(),
        "instance loaded from {}",
        path.display()
    );
    Ok(Arc::new(instance))
}

pub(crate) fn load_placement(path: &Path, instance: &Arc<Instance>) -> Result<Placement> {
    ppp_io::read_placement(path, Arc::clone(instance))
}
