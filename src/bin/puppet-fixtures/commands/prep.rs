//! `puppet-fixtures prep` command

use anyhow::Result;

use puppet_fixtures::ops;
use puppet_fixtures::util::FixturesContext;

pub fn execute(ctx: &FixturesContext) -> Result<()> {
    ops::prep(ctx)?;
    eprintln!("    Prepared {}", ctx.module_target_dir().display());
    Ok(())
}
