//! Subcommands of the `pasture` binary.

mod run;
mod species;

use std::path::PathBuf;

use pasture_content::ContentFactory;

pub use run::Run;
pub use species::Species;

/// Content from `data_dir`, or the data shipped with the content crate.
fn content(data_dir: Option<&PathBuf>) -> ContentFactory {
    match data_dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::bundled(),
    }
}
