use std::path::Path;

use ukko_core::project::Project;

use crate::output;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let project = Project::open(root)?;
    let report = project.status();

    if json {
        return output::print_json(&report);
    }
    output::print_status(&report);
    Ok(())
}
