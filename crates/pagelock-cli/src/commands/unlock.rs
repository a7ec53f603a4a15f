use crate::app::unlock_with_retry;
use crate::cli::{Cli, UnlockArgs};
use crate::helpers::write_output;

pub fn handle_unlock(cli: &Cli, args: &UnlockArgs) -> anyhow::Result<()> {
    let content = unlock_with_retry(cli, &args.page, args.no_input)?;
    write_output(args.output.as_deref(), content.html())?;
    if let Some(path) = args.output.as_deref() {
        if !cli.quiet {
            eprintln!("Revealed content written to {}", path);
        }
    }
    Ok(())
}
