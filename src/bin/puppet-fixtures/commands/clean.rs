//! `puppet-fixtures clean` command

use anyhow::Result;

use puppet_fixtures::ops;
use puppet_fixtures::util::FixturesContext;

pub fn execute(ctx: &FixturesContext) -> Result<()> {
    for path in ops::clean(ctx)? {
        eprintln!("     Removed {}", path.display());
    }
    Ok(())
}
