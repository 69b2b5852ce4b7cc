//! The table of commands `A` understands.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::app::commands::Handler;
use crate::app::commands::doc::GoDoc;
use crate::app::commands::fill::Fill;
use crate::app::commands::guru::{Definition, Query, Referrers, Target};
use crate::app::commands::refactor::{Extract, Implement, Rename};
use crate::app::commands::share::Share;
use crate::app::commands::tags::ModifyTags;
use crate::domain::errors::CommandError;

struct Entry {
    summary: &'static str,
    handler: Box<dyn Handler>,
}

/// Command names mapped to their handlers. Built once, never modified.
pub struct Registry {
    entries: BTreeMap<&'static str, Entry>,
}

fn entry(summary: &'static str, handler: impl Handler + 'static) -> Entry {
    Entry {
        summary,
        handler: Box::new(handler),
    }
}

impl Registry {
    /// Every command shipped with `A`.
    pub fn builtin() -> Self {
        let entries = BTreeMap::from([
            ("addtags", entry("adds tags to the selected struct fields", ModifyTags::Add)),
            (
                "cle",
                entry(
                    "shows possible targets of the selected function call",
                    Query::call_graph("callees"),
                ),
            ),
            (
                "clr",
                entry(
                    "shows possible callers of the selected function",
                    Query::call_graph("callers"),
                ),
            ),
            (
                "cs",
                entry(
                    "shows the path from the callgraph root to the selected function",
                    Query::call_graph("callstack"),
                ),
            ),
            ("def", entry("shows declaration of selected identifier", Definition)),
            (
                "desc",
                entry(
                    "describes the selected syntax: definition, methods, etc.",
                    Query::new("describe", Target::Pos),
                ),
            ),
            ("doc", entry("shows documentation for items in Go source code", GoDoc)),
            (
                "err",
                entry(
                    "shows possible values of the selected error variable",
                    Query::scoped("whicherrs", Target::Pos),
                ),
            ),
            ("ex", entry("extracts statements to a new function/method", Extract)),
            ("fstruct", entry("fills a struct literal with default values", Fill::STRUCT)),
            (
                "fswitch",
                entry("fills a (type) switch statement with case statements", Fill::SWITCH),
            ),
            (
                "fv",
                entry(
                    "shows the free variables of the selected snippet",
                    Query::new("freevars", Target::Sel),
                ),
            ),
            ("impl", entry("generates method stubs for implementing an interface", Implement)),
            (
                "impls",
                entry(
                    "shows the 'implements' relation for the selected type or method",
                    Query::scoped("implements", Target::Pos),
                ),
            ),
            (
                "peers",
                entry(
                    "shows send/receive corresponding to selected channel op",
                    Query::scoped("peers", Target::Sel),
                ),
            ),
            (
                "pto",
                entry(
                    "shows variables the selected pointer may point to",
                    Query::scoped("pointsto", Target::Sel),
                ),
            ),
            (
                "refs",
                entry(
                    "shows all refs to the entity denoted by selected identifier",
                    Referrers::default(),
                ),
            ),
            ("rmtags", entry("removes tags from the selected struct fields", ModifyTags::Remove)),
            ("rn", entry("renames the selected identifier", Rename)),
            ("share", entry("uploads the selected code to play.golang.org", Share)),
            (
                "what",
                entry(
                    "shows basic information about the selected syntax node",
                    Query::new("what", Target::Pos),
                ),
            ),
        ]);
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Handler> {
        self.entries.get(name).map(|entry| entry.handler.as_ref())
    }

    /// Like [`Registry::get`], but an unknown name is a usage error.
    pub fn lookup(&self, name: &str) -> Result<&dyn Handler, CommandError> {
        self.get(name).ok_or_else(|| CommandError::Unknown {
            name: name.to_owned(),
            usage: self.usage(),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// The command list shown by `--help` and on usage errors.
    pub fn usage(&self) -> String {
        let mut out = String::from("Commands:\n");
        for (name, entry) in &self.entries {
            let _ = writeln!(out, "  {name:<8} {}", entry.summary);
        }
        out.push_str(
            "\n<scope> is an optional comma-separated list of packages the analysis is limited to.",
        );
        out
    }
}
