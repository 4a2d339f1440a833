use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use massing_gen::config::GenParams;
use massing_gen::dataset::Dataset;
use massing_gen::scene::RecordingBackend;

// generates one dataset run headlessly: composed buildings go through the
// recording backend and the annotation lands in the working directory.
// pass a JSON parameter file as the first argument to override defaults.
fn main() -> massing_gen::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let params = match std::env::args().nth(1) {
        Some(path) => GenParams::from_json_file(Path::new(&path))?,
        None => GenParams::default(),
    };

    let mut dataset = Dataset::new(params);
    let mut backend = RecordingBackend::new();
    dataset.populate(&mut backend);

    let written = dataset.write(Path::new("."))?;
    info!(
        buildings = dataset.records().len(),
        annotation = %written.display(),
        "dataset run complete"
    );
    Ok(())
}
