//! Builtin commands
//!
//! Builtins run inside the shell process. Each one implements [`Builtin`]
//! and is registered by name in a [`BuiltinRegistry`]; dispatch is a
//! plain table lookup on the resolved leading word. Names in
//! [`RESERVED_NAMES`] can never be shadowed by an alias.

mod aliases;
mod navigation;
mod session;
mod settings;

use std::collections::BTreeMap;
use std::io::Write;

use crate::commands::quote;
use crate::config::ConfigStore;
use crate::error::{Error, Result};

pub use aliases::{AliasCommand, AliasesCommand, UnaliasCommand};
pub use navigation::{expand_home, CdCommand};
pub use session::{ExitCommand, HelpCommand, VersionCommand};
pub use settings::SetCommand;

/// Builtin names; aliases with these names are rejected
pub const RESERVED_NAMES: &[&str] = &[
    "cd", "exit", "version", "help", "set", "alias", "unalias", "aliases",
];

/// Whether `name` is a reserved builtin name
pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// What the shell should do after a builtin returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinOutcome {
    /// Read the next line
    Continue,
    /// Leave the read loop with this process status
    Exit(i32),
}

/// Name, usage line and summary of one builtin, as shown by `help`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinInfo {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
}

/// Everything a builtin may touch
pub struct BuiltinContext<'a> {
    /// Live configuration; mutations persist through it
    pub config: &'a mut ConfigStore,
    /// Normal output
    pub out: &'a mut dyn Write,
    /// Warnings
    pub err: &'a mut dyn Write,
    /// All registered builtins, for `help`
    pub catalog: &'a [BuiltinInfo],
}

impl BuiltinContext<'_> {
    /// Write a line to the normal output
    pub fn say(&mut self, text: impl AsRef<str>) -> Result<()> {
        writeln!(self.out, "{}", text.as_ref()).map_err(|e| Error::io("write failed", e))
    }

    /// Write a warning line
    pub fn warn(&mut self, text: impl AsRef<str>) -> Result<()> {
        writeln!(self.err, "{}: warning: {}", crate::NAME, text.as_ref())
            .map_err(|e| Error::io("write failed", e))
    }
}

/// A command handled entirely inside the shell
pub trait Builtin: Send + Sync {
    /// Name it is dispatched on
    fn name(&self) -> &'static str;

    /// Usage line, e.g. `cd [path]`
    fn usage(&self) -> &'static str;

    /// One-line description
    fn summary(&self) -> &'static str;

    /// Run with the arguments that follow the name
    fn execute(&self, args: &[String], ctx: &mut BuiltinContext<'_>) -> Result<BuiltinOutcome>;

    fn info(&self) -> BuiltinInfo {
        BuiltinInfo {
            name: self.name(),
            usage: self.usage(),
            summary: self.summary(),
        }
    }
}

/// Table of builtins keyed by name
pub struct BuiltinRegistry {
    builtins: BTreeMap<&'static str, Box<dyn Builtin>>,
    catalog: Vec<BuiltinInfo>,
}

impl BuiltinRegistry {
    /// An empty registry
    pub fn empty() -> Self {
        Self {
            builtins: BTreeMap::new(),
            catalog: Vec::new(),
        }
    }

    /// Add or replace a builtin
    pub fn register(&mut self, builtin: Box<dyn Builtin>) {
        let info = builtin.info();
        self.catalog.retain(|entry| entry.name != info.name);
        self.catalog.push(info);
        self.builtins.insert(info.name, builtin);
    }

    /// Whether `name` dispatches to a builtin
    pub fn contains(&self, name: &str) -> bool {
        self.builtins.contains_key(name)
    }

    /// Registered builtins in registration order
    pub fn catalog(&self) -> &[BuiltinInfo] {
        &self.catalog
    }

    /// Run `tokens[0]` if it is a builtin; `None` means "not mine"
    pub fn dispatch(
        &self,
        tokens: &[String],
        config: &mut ConfigStore,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Option<Result<BuiltinOutcome>> {
        let (name, args) = tokens.split_first()?;
        let builtin = self.builtins.get(name.as_str())?;
        debug!("Dispatching builtin '{}'", name);

        let mut ctx = BuiltinContext {
            config,
            out,
            err,
            catalog: &self.catalog,
        };
        Some(builtin.execute(args, &mut ctx))
    }
}

impl Default for BuiltinRegistry {
    /// The standard builtin set
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(CdCommand));
        registry.register(Box::new(ExitCommand));
        registry.register(Box::new(VersionCommand));
        registry.register(Box::new(HelpCommand));
        registry.register(Box::new(SetCommand));
        registry.register(Box::new(AliasCommand));
        registry.register(Box::new(UnaliasCommand));
        registry.register(Box::new(AliasesCommand));
        registry
    }
}

/// Print every alias as `name='command'`, sorted by name
pub(crate) fn list_aliases(ctx: &mut BuiltinContext<'_>) -> Result<()> {
    let lines = ctx
        .config
        .config()
        .aliases
        .iter()
        .map(|(name, command)| Ok(format!("alias {}={}", name, quote(command)?)))
        .collect::<Result<Vec<String>>>()?;

    if lines.is_empty() {
        return ctx.say("no aliases defined");
    }
    for line in lines {
        ctx.say(line)?;
    }
    Ok(())
}

/// Report a persistence warning, if any
pub(crate) fn report_persistence(
    ctx: &mut BuiltinContext<'_>,
    outcome: crate::config::Persistence,
) -> Result<()> {
    match outcome.warning() {
        Some(warning) => ctx.warn(warning),
        None => Ok(()),
    }
}
