use crate::cli::SetContextArgs;
use crate::config::MiaContext;
use crate::error::{CliError, Result};
use crate::factory::CommandContext;

/// Save `--api-base-url` and `--api-key` under `<home>/contexts/<name>`.
/// Only the filesystem is needed, so no API client is built.
pub fn context(ctx: &CommandContext, args: SetContextArgs) -> Result<()> {
    let f = ctx.factory()?;
    let opts = ctx.options();

    if opts.api_base_url.is_empty() {
        return Err(CliError::CreateContext("empty api base url".to_string()));
    }
    if opts.api_key.is_empty() {
        return Err(CliError::CreateContext("empty api key".to_string()));
    }

    let context = MiaContext {
        name: args.name.unwrap_or_default(),
        api_base_url: opts.api_base_url.clone(),
        api_key: opts.api_key.clone(),
    };
    context.save(f.fs(), f.home_dir())?;

    f.renderer().message("Context created")?;
    Ok(())
}
