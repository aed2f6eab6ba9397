use anyhow::Result;
use clap::Parser;
use std::path::Path;
use std::time::Instant;
use swagtag::analyzer::Analyzer;
use swagtag::analyzer::routes::RouteTable;
use swagtag::analyzer::trace::{BufferTrace, NullTrace};
use swagtag::config::GlobalEnv;
use swagtag::model::{AnalyzeReport, AnnotateStats, FileChanges, PathResolution};
use swagtag::{cli, patch, scan, util};

fn main() {
    if let Err(err) = run() {
        eprintln!("swagtag: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = cli::Args::parse();

    match args.command {
        cli::Command::Analyze {
            path,
            globals,
            routes,
            trace,
        } => {
            let globals = load_globals(globals.as_deref())?;
            let routes = load_routes(routes.as_deref())?;
            let mut analyzer = Analyzer::new(globals)?;
            let source = util::read_to_string(&path)?;
            let mut sink = BufferTrace::default();
            let analysis = analyzer.analyze(&source, &mut sink)?;
            let report = AnalyzeReport {
                file: analysis.report(&path.display().to_string(), &routes),
                trace: if trace { sink.events } else { Vec::new() },
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        cli::Command::Annotate {
            path,
            globals,
            routes,
            dry_run,
            no_ignore,
        } => {
            let started = Instant::now();
            let globals = load_globals(globals.as_deref())?;
            let routes = load_routes(routes.as_deref())?;
            let mut analyzer = Analyzer::new(globals)?;
            let files = if path.is_file() {
                vec![scan::ScannedFile {
                    rel_path: path.display().to_string(),
                    abs_path: path.clone(),
                }]
            } else {
                scan::scan_tests(&path, scan::ScanOptions::new(no_ignore))?
            };
            let mut stats = AnnotateStats {
                scanned: files.len(),
                annotated: 0,
                attributes: 0,
                skipped: 0,
                errors: 0,
                duration_ms: 0,
                changes: Vec::new(),
            };
            for file in &files {
                match annotate_file(&mut analyzer, &routes, file, dry_run) {
                    Ok(Some(changes)) => {
                        stats.annotated += 1;
                        stats.attributes += changes.methods.len();
                        stats.changes.push(changes);
                    }
                    Ok(None) => stats.skipped += 1,
                    Err(err) => {
                        eprintln!("swagtag: {}: {err:#}", file.rel_path);
                        stats.errors += 1;
                    }
                }
            }
            stats.duration_ms = started.elapsed().as_millis() as u64;
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(())
        }
        cli::Command::ResolvePath { routes, path } => {
            let table = RouteTable::parse(&util::read_to_string(&routes)?);
            let resolution = PathResolution {
                route: table.get_var_for_path(&path).map(str::to_string),
                path,
            };
            println!("{}", serde_json::to_string_pretty(&resolution)?);
            Ok(())
        }
    }
}

fn load_globals(path: Option<&Path>) -> Result<GlobalEnv> {
    match path {
        Some(path) => Ok(GlobalEnv::parse(&util::read_to_string(path)?)),
        None => Ok(GlobalEnv::default()),
    }
}

fn load_routes(path: Option<&Path>) -> Result<RouteTable> {
    match path {
        Some(path) => Ok(RouteTable::parse(&util::read_to_string(path)?)),
        None => Ok(RouteTable::default()),
    }
}

fn annotate_file(
    analyzer: &mut Analyzer,
    routes: &RouteTable,
    file: &scan::ScannedFile,
    dry_run: bool,
) -> Result<Option<FileChanges>> {
    let source = util::read_to_string(&file.abs_path)?;
    let analysis = analyzer.analyze(&source, &mut NullTrace)?;
    let (updated, methods) = patch::annotate_source(&analysis, routes, &source);
    if methods.is_empty() {
        return Ok(None);
    }
    if !dry_run {
        util::write_string(&file.abs_path, &updated)?;
    }
    Ok(Some(FileChanges {
        path: file.rel_path.clone(),
        methods,
    }))
}
