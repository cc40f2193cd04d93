//! `alias`, `unalias` and `aliases`

use super::{list_aliases, report_persistence, Builtin, BuiltinContext, BuiltinOutcome};
use crate::commands::join;
use crate::error::{ConfigError, Result};

/// List aliases, or define one
pub struct AliasCommand;

impl Builtin for AliasCommand {
    fn name(&self) -> &'static str {
        "alias"
    }

    fn usage(&self) -> &'static str {
        "alias [name command...]"
    }

    fn summary(&self) -> &'static str {
        "list aliases, or define name as command"
    }

    fn execute(&self, args: &[String], ctx: &mut BuiltinContext<'_>) -> Result<BuiltinOutcome> {
        match args {
            [] => list_aliases(ctx)?,
            [name] => {
                // `alias ll` with no command
                if name.is_empty() {
                    return Err(ConfigError::EmptyAliasName.into());
                }
                return Err(ConfigError::EmptyAliasCommand(name.clone()).into());
            }
            [name, command] => {
                // A single quoted argument is stored exactly as typed
                let outcome = ctx.config.set_alias(name, command)?;
                report_persistence(ctx, outcome)?;
            }
            [name, words @ ..] => {
                // Several words are re-quoted so they tokenize back the same
                let outcome = ctx.config.set_alias(name, &join(words)?)?;
                report_persistence(ctx, outcome)?;
            }
        }
        Ok(BuiltinOutcome::Continue)
    }
}

/// Remove an alias
pub struct UnaliasCommand;

impl Builtin for UnaliasCommand {
    fn name(&self) -> &'static str {
        "unalias"
    }

    fn usage(&self) -> &'static str {
        "unalias name"
    }

    fn summary(&self) -> &'static str {
        "remove an alias"
    }

    fn execute(&self, args: &[String], ctx: &mut BuiltinContext<'_>) -> Result<BuiltinOutcome> {
        let [name] = args else {
            return Err(ConfigError::Usage(self.usage().to_string()).into());
        };
        let (_, outcome) = ctx.config.remove_alias(name)?;
        report_persistence(ctx, outcome)?;
        Ok(BuiltinOutcome::Continue)
    }
}

/// List aliases
pub struct AliasesCommand;

impl Builtin for AliasesCommand {
    fn name(&self) -> &'static str {
        "aliases"
    }

    fn usage(&self) -> &'static str {
        "aliases"
    }

    fn summary(&self) -> &'static str {
        "list aliases"
    }

    fn execute(&self, _args: &[String], ctx: &mut BuiltinContext<'_>) -> Result<BuiltinOutcome> {
        list_aliases(ctx)?;
        Ok(BuiltinOutcome::Continue)
    }
}
