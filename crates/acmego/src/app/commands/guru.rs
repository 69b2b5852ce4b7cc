//! Queries answered by `golang.org/x/tools/cmd/guru`.

use std::env;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context as _, Result};
use serde::Deserialize;
use serde_json::Value;

use super::{Context, Handler};
use crate::domain::model::Outcome;
use crate::domain::selection::Selection;

/// Which form of the selection guru is asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The cursor position, `file:#start`.
    Pos,
    /// The whole selection, `file:#start,#end`.
    Sel,
}

/// Where a query puts `-scope <scope>` relative to `-modified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    None,
    Leading,
    AfterModified,
}

/// A guru mode whose plain-text answer is printed as is.
#[derive(Debug, Clone, Copy)]
pub struct Query {
    mode: &'static str,
    target: Target,
    scope: Scope,
}

impl Query {
    pub const fn new(mode: &'static str, target: Target) -> Self {
        Self {
            mode,
            target,
            scope: Scope::None,
        }
    }

    /// Pointer analysis modes take an optional `<scope>` argument.
    pub const fn scoped(mode: &'static str, target: Target) -> Self {
        Self {
            mode,
            target,
            scope: Scope::AfterModified,
        }
    }

    /// Call graph modes, which lead with `-scope`.
    pub const fn call_graph(mode: &'static str) -> Self {
        Self {
            mode,
            target: Target::Pos,
            scope: Scope::Leading,
        }
    }
}

impl Handler for Query {
    fn run(&self, ctx: &Context<'_>, selection: &Selection, args: &[String]) -> Result<Outcome> {
        let scope = ["-scope".to_owned(), ctx.scope(args)];
        let inv = match self.scope {
            Scope::None => ctx.tool("guru").arg("-modified"),
            Scope::Leading => ctx.tool("guru").args(scope).arg("-modified"),
            Scope::AfterModified => ctx.tool("guru").arg("-modified").args(scope),
        };
        let target = match self.target {
            Target::Pos => selection.pos(),
            Target::Sel => selection.sel(),
        };
        let inv = inv.arg(self.mode).arg(target).stdin(selection.archive());
        Ok(Outcome::Print(ctx.run(&inv)?))
    }
}

#[derive(Debug, Deserialize)]
struct DefinitionReply {
    #[serde(default)]
    objpos: String,
}

/// `A def`: plumbs the position of the declaration so acme opens it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Definition;

impl Handler for Definition {
    fn run(&self, ctx: &Context<'_>, selection: &Selection, _args: &[String]) -> Result<Outcome> {
        let inv = ctx
            .tool("guru")
            .args(["-json", "-modified", "definition"])
            .arg(selection.pos())
            .stdin(selection.archive());
        let reply: DefinitionReply =
            serde_json::from_str(&ctx.run(&inv)?).context("failed to unmarshal guru json")?;
        Ok(Outcome::Plumb {
            text: reply.objpos,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ReferrersInitial {
    #[serde(default)]
    objpos: String,
    #[serde(default)]
    desc: String,
}

#[derive(Debug, Deserialize)]
struct ReferrersPackage {
    #[serde(default)]
    refs: Vec<Reference>,
}

#[derive(Debug, Deserialize)]
struct Reference {
    pos: String,
    #[serde(default)]
    text: String,
}

/// `A refs`: every reference to the selected identifier, one per line.
#[derive(Debug, Clone, Default)]
pub struct Referrers {
    cwd: Option<PathBuf>,
}

impl Referrers {
    /// Positions are printed relative to `cwd` where that is shorter.
    pub fn relative_to(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(cwd.into()),
        }
    }
}

impl Handler for Referrers {
    fn run(&self, ctx: &Context<'_>, selection: &Selection, _args: &[String]) -> Result<Outcome> {
        let inv = ctx
            .tool("guru")
            .args(["-json", "-modified", "referrers"])
            .arg(selection.pos())
            .stdin(selection.archive());
        let reply = ctx.run(&inv)?;

        let cwd = self.cwd.clone().or_else(|| env::current_dir().ok());
        let shorten = |pos: &str| match &cwd {
            Some(dir) => shorten_pos(dir, pos),
            None => pos.to_owned(),
        };

        let mut values = serde_json::Deserializer::from_str(&reply).into_iter::<Value>();
        let initial: ReferrersInitial = match values.next() {
            Some(value) => serde_json::from_value(value.context("failed to decode guru output")?)
                .context("failed to unmarshal ReferrersInitial")?,
            None => anyhow::bail!("guru returned no referrers"),
        };

        let mut out = format!(
            "{}: references to {}\n",
            shorten(&initial.objpos),
            initial.desc
        );
        for value in values {
            let package: ReferrersPackage =
                serde_json::from_value(value.context("failed to decode guru output")?)
                    .context("failed to unmarshal ReferrersPackage")?;
            for reference in package.refs {
                out.push_str(&format!("{}: {}\n", shorten(&reference.pos), reference.text));
            }
        }
        Ok(Outcome::Print(out))
    }
}

/// Shorten `file:line:col` by making the file part relative to `cwd` when
/// that is no longer than the original.
fn shorten_pos(cwd: &Path, pos: &str) -> String {
    let Some((rest, _col)) = pos.rsplit_once(':') else {
        return pos.to_owned();
    };
    let Some((file, _line)) = rest.rsplit_once(':') else {
        return pos.to_owned();
    };
    let addr = &pos[file.len()..];
    match relative_path(cwd, Path::new(file)) {
        Some(rel) if rel.as_os_str().len() <= file.len() => format!("{}{addr}", rel.display()),
        _ => pos.to_owned(),
    }
}

/// `target` expressed relative to `base`, walking up with `..` as needed.
/// `None` when one path is absolute and the other is not.
fn relative_path(base: &Path, target: &Path) -> Option<PathBuf> {
    if base.is_absolute() != target.is_absolute() {
        return None;
    }
    let base: Vec<_> = base
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();
    let target: Vec<_> = target
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();
    let common = base
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();
    // `..` left in the base cannot be undone without touching the filesystem.
    if base[common..].contains(&Component::ParentDir) {
        return None;
    }

    let mut rel = PathBuf::new();
    for _ in &base[common..] {
        rel.push("..");
    }
    for component in &target[common..] {
        rel.push(component);
    }
    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    Some(rel)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::testing::{FakeRunner, FakeUploader, args, context, selection, test_config};

    #[test]
    fn call_graph_query_leads_with_scope() {
        let config = test_config();
        let runner = FakeRunner::returning("main.go:3:6: callers of main.f\n");
        let uploader = FakeUploader::default();
        let ctx = context(&config, &runner, &uploader);
        let sel = selection("package main\nfunc f() {}\n", 18, 18);

        let outcome = Query::call_graph("callers")
            .run(&ctx, &sel, &args(&["example.com/pkg"]))
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Print("main.go:3:6: callers of main.f\n".into())
        );
        let call = runner.only_call();
        assert_eq!(call.program, "guru");
        assert_eq!(
            call.args,
            args(&[
                "-scope",
                "example.com/pkg",
                "-modified",
                "callers",
                "/src/main.go:#18"
            ])
        );
        assert_eq!(call.stdin, Some(sel.archive()));
    }

    #[test]
    fn scope_defaults_to_configured_value() {
        let config = test_config();
        let runner = FakeRunner::returning("");
        let uploader = FakeUploader::default();
        let ctx = context(&config, &runner, &uploader);
        let sel = selection("x := 1", 0, 1);

        Query::scoped("pointsto", Target::Sel)
            .run(&ctx, &sel, &[])
            .unwrap();

        assert_eq!(
            runner.only_call().args,
            args(&["-modified", "-scope", ".", "pointsto", "/src/main.go:#0,#1"])
        );
    }

    #[test]
    fn unscoped_query_ignores_arguments() {
        let config = test_config();
        let runner = FakeRunner::returning("identifier\n");
        let uploader = FakeUploader::default();
        let ctx = context(&config, &runner, &uploader);
        let sel = selection("日本語", 2, 2);

        Query::new("what", Target::Pos)
            .run(&ctx, &sel, &args(&["ignored"]))
            .unwrap();

        assert_eq!(
            runner.only_call().args,
            args(&["-modified", "what", "/src/main.go:#6"])
        );
    }

    #[test]
    fn definition_plumbs_object_position() {
        let config = test_config();
        let runner =
            FakeRunner::returning(r#"{"objpos":"/src/util.go:10:6","desc":"func util.Do()"}"#);
        let uploader = FakeUploader::default();
        let ctx = context(&config, &runner, &uploader);
        let sel = selection("util.Do()", 5, 5);

        let outcome = Definition.run(&ctx, &sel, &[]).unwrap();

        assert_eq!(
            outcome,
            Outcome::Plumb {
                text: "/src/util.go:10:6".into()
            }
        );
        assert_eq!(
            runner.only_call().args,
            args(&["-json", "-modified", "definition", "/src/main.go:#5"])
        );
    }

    #[test]
    fn definition_rejects_malformed_json() {
        let config = test_config();
        let runner = FakeRunner::returning("guru: no identifier here");
        let uploader = FakeUploader::default();
        let ctx = context(&config, &runner, &uploader);
        let sel = selection("x", 0, 0);

        let err = Definition.run(&ctx, &sel, &[]).unwrap_err();
        assert!(err.to_string().contains("failed to unmarshal guru json"));
    }

    #[test]
    fn referrers_prints_initial_and_each_package() {
        let reply = r#"{"objpos":"/home/u/proj/a.go:3:6","desc":"func proj.F"}
{"package":"proj","refs":[{"pos":"/home/u/proj/b.go:7:2","text":"F()"},{"pos":"/elsewhere/c.go:1:1","text":"proj.F()"}]}
{"package":"proj/sub","refs":[{"pos":"/home/u/proj/sub/d.go:2:9","text":"x := F"}]}
"#;
        let config = test_config();
        let runner = FakeRunner::returning(reply);
        let uploader = FakeUploader::default();
        let ctx = context(&config, &runner, &uploader);
        let sel = selection("F()", 0, 0);

        let outcome = Referrers::relative_to("/home/u/proj")
            .run(&ctx, &sel, &[])
            .unwrap();

        let Outcome::Print(text) = outcome else {
            panic!("expected printed output");
        };
        assert_eq!(
            text,
            "a.go:3:6: references to func proj.F\n\
             b.go:7:2: F()\n\
             /elsewhere/c.go:1:1: proj.F()\n\
             sub/d.go:2:9: x := F\n"
        );
    }

    #[test]
    fn referrers_without_output_is_an_error() {
        let config = test_config();
        let runner = FakeRunner::returning("");
        let uploader = FakeUploader::default();
        let ctx = context(&config, &runner, &uploader);
        let sel = selection("F()", 0, 0);

        assert!(Referrers::default().run(&ctx, &sel, &[]).is_err());
    }

    #[test]
    fn shorten_pos_keeps_unrelated_or_malformed_positions() {
        let cwd = Path::new("/home/u/proj");
        assert_eq!(shorten_pos(cwd, "/home/u/proj/x.go:1:2"), "x.go:1:2");
        assert_eq!(shorten_pos(cwd, "/home/u/other/x.go:1:2"), "../other/x.go:1:2");
        assert_eq!(shorten_pos(cwd, "/tmp/x.go:1:2"), "/tmp/x.go:1:2");
        assert_eq!(shorten_pos(cwd, "rel/x.go:1:2"), "rel/x.go:1:2");
        assert_eq!(shorten_pos(cwd, "x.go"), "x.go");
        assert_eq!(shorten_pos(cwd, "x.go:4"), "x.go:4");
    }

    #[test]
    fn relative_path_walks_up_from_base() {
        let rel = |base: &str, target: &str| relative_path(Path::new(base), Path::new(target));
        assert_eq!(rel("/a/b", "/a/b/c.go"), Some(PathBuf::from("c.go")));
        assert_eq!(rel("/a/b/c", "/a/d.go"), Some(PathBuf::from("../../d.go")));
        assert_eq!(rel("/a/b/", "/a/b"), Some(PathBuf::from(".")));
        assert_eq!(rel("/a/./b", "/a/b/c.go"), Some(PathBuf::from("c.go")));
        assert_eq!(rel("/a", "b.go"), None);
        assert_eq!(rel("/a/../b", "/c.go"), None);
    }
}
