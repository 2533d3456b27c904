// src/commands.rs

use anyhow::{anyhow, Context, Result};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{
    config::Settings,
    export::{self, ExportReport},
    inventory::Inventory,
    model::Language,
    scan, tree_view, util,
    selection::Selection,
};

pub fn run_cli() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let cmd = args.first().map(String::as_str).unwrap_or("help");
    let rest = args.get(1..).unwrap_or_default();

    match cmd {
        "scan"      => scan_cmd(&Args::parse(rest))?,
        "inventory" => inventory_cmd(&Args::parse(rest))?,
        "export"    => export_cmd(&Args::parse(rest))?,
        "tree"      => tree_cmd(&Args::parse(rest))?,
        _           => print_help(),
    }
    Ok(())
}

/// Positional root plus `--key=value` / `--flag` options.
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    root: Option<PathBuf>,
    opts: Vec<(String, Option<String>)>,
}

impl Args {
    fn parse(raw: &[String]) -> Self {
        let mut out = Args::default();
        for a in raw {
            let s = a.trim();
            if let Some(flag) = s.strip_prefix("--") {
                match flag.split_once('=') {
                    Some((k, v)) => out.opts.push((k.to_string(), Some(v.to_string()))),
                    None => out.opts.push((flag.to_string(), None)),
                }
            } else if out.root.is_none() {
                out.root = Some(PathBuf::from(s));
            }
        }
        out
    }

    fn value(&self, key: &str) -> Option<&str> {
        self.opts
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    fn flag(&self, key: &str) -> bool {
        self.opts.iter().any(|(k, _)| k == key)
    }

    fn root(&self) -> Result<PathBuf> {
        match &self.root {
            Some(p) => Ok(util::absolute_root(p)),
            None => env::current_dir().context("failed to get current_dir"),
        }
    }

    /// Settings file under the root, then CLI overrides.
    fn settings(&self, root: &Path) -> Result<Settings> {
        let mut s = Settings::load(root)?;
        if let Some(v) = self.value("ignore") {
            s.ignore_dirs = util::split_list(v).into_iter().collect();
        }
        if let Some(v) = self.value("out") {
            s.output_name = v.to_string();
        }
        if let Some(v) = self.value("whole-lang") {
            for name in util::split_list(v) {
                let lang = Language::from_str_ic(&name).ok_or_else(|| anyhow!("unknown language: {name}"))?;
                s.always_whole.insert(lang);
            }
        }
        if self.flag("tree") {
            s.append_tree = true;
        }
        Ok(s)
    }
}

fn scan_cmd(args: &Args) -> Result<()> {
    let root = args.root()?;
    let settings = args.settings(&root)?;
    let analysis = scan::scan_project(&root, &settings.ignore_dirs);
    let inv = Inventory::from_analysis(&root, &analysis);
    if inv.is_empty() {
        println!("No analyzable declarations under {}", root.display());
    } else {
        print!("{}", inv.render_text());
    }
    Ok(())
}

fn inventory_cmd(args: &Args) -> Result<()> {
    let root = args.root()?;
    let settings = args.settings(&root)?;
    let analysis = scan::scan_project(&root, &settings.ignore_dirs);
    let inv = Inventory::from_analysis(&root, &analysis);
    let json = serde_json::to_string_pretty(&inv).context("serializing inventory")?;

    // `--out` here names the JSON file, not the bundle
    match args.value("out") {
        Some(out) => {
            fs::write(out, json).with_context(|| format!("writing {out}"))?;
            println!("Inventory written to {out} ({} file(s))", inv.files.len());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn export_cmd(args: &Args) -> Result<()> {
    let root = args.root()?;
    let settings = args.settings(&root)?;
    let sel_path = args
        .value("selection")
        .ok_or_else(|| anyhow!("export needs --selection=FILE"))?;
    let raw = fs::read_to_string(sel_path).with_context(|| format!("reading selection {sel_path}"))?;
    let selection = Selection::from_json_str(&raw).with_context(|| format!("parsing selection {sel_path}"))?;

    let report = match export::export(&root, &selection, &settings) {
        Ok(r) => r,
        Err(e) => {
            let failed = ExportReport::failed(&settings.output_path(&root), &e);
            println!("{}", serde_json::to_string_pretty(&failed).context("serializing report")?);
            return Err(e);
        }
    };
    println!("{}", serde_json::to_string_pretty(&report).context("serializing report")?);
    Ok(())
}

fn tree_cmd(args: &Args) -> Result<()> {
    let root = args.root()?;
    let settings = args.settings(&root)?;
    println!("{}", tree_view::render_tree(&root, &settings.ignore_dirs));
    Ok(())
}

fn print_help() {
    println!(
r#"
declpack: list declarations in a source tree and bundle a selection of them

USAGE:
    declpack scan [ROOT] [--ignore=a,b]
                          # List top-level functions, classes and methods per file
    declpack inventory [ROOT] [--out=FILE]
                          # Same listing as pretty JSON (stdout, or FILE)
    declpack export [ROOT] --selection=FILE [--out=NAME] [--tree] [--whole-lang=js,...]
                          # Write the selected declarations to ROOT/NAME (default gpt_bundle.txt)
    declpack tree [ROOT]  # Print the project tree
    declpack help         # Show this message

ROOT defaults to the current dir. Settings may also come from ROOT/.declpack.json.
Logging: DECLPACK_LOG=debug.
"#    );
}
