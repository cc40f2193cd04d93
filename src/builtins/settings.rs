//! `set`

use super::{report_persistence, Builtin, BuiltinContext, BuiltinOutcome};
use crate::config::SettingKey;
use crate::error::{ConfigError, Result};

/// Show or change prompt, color and history size
pub struct SetCommand;

impl Builtin for SetCommand {
    fn name(&self) -> &'static str {
        "set"
    }

    fn usage(&self) -> &'static str {
        "set [key value...]"
    }

    fn summary(&self) -> &'static str {
        "show settings, or change prompt, color or history_size"
    }

    fn execute(&self, args: &[String], ctx: &mut BuiltinContext<'_>) -> Result<BuiltinOutcome> {
        match args {
            [] => {
                for key in SettingKey::ALL {
                    let value = ctx.config.get(key.as_str())?;
                    ctx.say(format!("{} = {}", key, value))?;
                }
                if let Some(path) = ctx.config.path().map(|p| p.display().to_string()) {
                    ctx.say(format!("(config file: {})", path))?;
                }
            }
            [key] => {
                // Catch a misspelt key before complaining about the arity
                key.parse::<SettingKey>()?;
                return Err(ConfigError::Usage(self.usage().to_string()).into());
            }
            [key, values @ ..] => {
                // Unquoted multi-word values (set prompt {dir} >) are
                // joined back with single spaces
                let value = values.join(" ");
                let outcome = ctx.config.set(key, &value)?;
                report_persistence(ctx, outcome)?;
            }
        }
        Ok(BuiltinOutcome::Continue)
    }
}
