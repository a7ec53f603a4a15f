use crate::app::open_page;
use crate::cli::{Cli, PageArgs};

pub fn handle_lock(cli: &Cli, args: &PageArgs) -> anyhow::Result<()> {
    let mut orchestrator = open_page(cli, &args.page)?;
    if !orchestrator.store().is_persistent() {
        if !cli.quiet {
            println!("Key cache is disabled; nothing to clear.");
        }
        return Ok(());
    }

    orchestrator
        .encrypt_again()
        .map_err(|e| anyhow::anyhow!("Failed to clear cached key: {}", e))?;
    if !cli.quiet {
        println!("Cached key cleared for {}.", orchestrator.page().path);
    }
    Ok(())
}
