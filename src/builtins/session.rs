//! `exit`, `version` and `help`

use super::{Builtin, BuiltinContext, BuiltinOutcome};
use crate::config::prompt::PLACEHOLDERS;
use crate::error::Result;

/// Leave the shell with status 0
pub struct ExitCommand;

impl Builtin for ExitCommand {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn usage(&self) -> &'static str {
        "exit"
    }

    fn summary(&self) -> &'static str {
        "leave the shell"
    }

    fn execute(&self, _args: &[String], _ctx: &mut BuiltinContext<'_>) -> Result<BuiltinOutcome> {
        info!("Exit requested");
        Ok(BuiltinOutcome::Exit(0))
    }
}

/// Print the shell name and version
pub struct VersionCommand;

impl Builtin for VersionCommand {
    fn name(&self) -> &'static str {
        "version"
    }

    fn usage(&self) -> &'static str {
        "version"
    }

    fn summary(&self) -> &'static str {
        "print the shell name and version"
    }

    fn execute(&self, _args: &[String], ctx: &mut BuiltinContext<'_>) -> Result<BuiltinOutcome> {
        ctx.say(format!("{} version {}", crate::NAME, crate::VERSION))?;
        Ok(BuiltinOutcome::Continue)
    }
}

/// Print the builtin summary and the prompt placeholder reference
pub struct HelpCommand;

impl Builtin for HelpCommand {
    fn name(&self) -> &'static str {
        "help"
    }

    fn usage(&self) -> &'static str {
        "help"
    }

    fn summary(&self) -> &'static str {
        "show this help"
    }

    fn execute(&self, _args: &[String], ctx: &mut BuiltinContext<'_>) -> Result<BuiltinOutcome> {
        let mut text = format!("{} {}\n\nBuiltin commands:\n", crate::NAME, crate::VERSION);

        let width = ctx.catalog.iter().map(|b| b.usage.len()).max().unwrap_or(0);
        for builtin in ctx.catalog {
            text.push_str(&format!(
                "  {:<width$}  {}\n",
                builtin.usage,
                builtin.summary,
                width = width
            ));
        }

        text.push_str("\nPrompt placeholders (set prompt \"...\"):\n");
        for (placeholder, meaning) in PLACEHOLDERS {
            text.push_str(&format!("  {:<10} {}\n", placeholder, meaning));
        }

        text.push_str("\nAnything else is run as an external program.");
        ctx.say(text)?;
        Ok(BuiltinOutcome::Continue)
    }
}
