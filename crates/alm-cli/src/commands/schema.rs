use alm_schema::SchemaRegistry;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Handle `almfx schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let registry = SchemaRegistry::new();

    if args.list {
        return output(&registry.list(), flags.format);
    }

    let Some(schema) = registry.get(&args.type_name) else {
        anyhow::bail!(
            "unknown schema type: '{}'. Use --list to see available types.",
            args.type_name
        );
    };
    output(schema, flags.format)
}
