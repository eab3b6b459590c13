use std::{fs, path::Path};

use log::{info, warn};

use crate::{
    context::Config,
    error::{PathContext, Result},
    post::exists,
};

/// Makes sure `bak/`, `drafts/` and `out/p/` exist, and moves bundled
/// templates from `<cwd>/res/templates` into place on first run.
pub(crate) fn bootstrap(config: &Config, cwd: &Path) -> Result<()> {
    for dir in [config.backup_dir(), config.drafts_dir(), config.posts_dir()] {
        if !exists(&dir) {
            fs_extra::dir::create_all(&dir, false)?;
            info!("created {dir:?}");
        }
    }

    let template_dir = config.template_dir();
    if !exists(&template_dir) {
        let bundled = cwd.join("res").join("templates");
        if exists(&bundled) {
            fs::rename(&bundled, &template_dir).at(&template_dir)?;
            info!("installed templates from {bundled:?}");
        } else {
            warn!("{template_dir:?} does not exist; rendering will fail until it does");
        }
    }

    Ok(())
}
