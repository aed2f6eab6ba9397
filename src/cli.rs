use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "swagtag",
    version,
    about = "Static analyzer and Swagger annotator for C# integration tests",
    after_help = r#"Examples:
  swagtag analyze --path Tests/ShareTests.cs --globals globals.env --routes Paths.cs
  swagtag analyze --path Tests/ShareTests.cs --trace
  swagtag annotate --path Tests --globals globals.env --routes Paths.cs
  swagtag annotate --path Tests --routes Paths.cs --dry-run
  swagtag resolve-path --routes Paths.cs --path /api/Admin/share/12345/disability
"#
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze one file and print the recovered facts as JSON.
    Analyze {
        #[arg(long)]
        path: PathBuf,
        /// KEY=VALUE globals file seeded into every root scope.
        #[arg(long)]
        globals: Option<PathBuf>,
        /// C# constants file declaring the route table.
        #[arg(long)]
        routes: Option<PathBuf>,
        /// Include diagnostic events in the output.
        #[arg(long)]
        trace: bool,
    },
    /// Insert Swagger attributes into test files under a path.
    Annotate {
        #[arg(long, default_value = ".")]
        path: PathBuf,
        /// KEY=VALUE globals file seeded into every root scope.
        #[arg(long)]
        globals: Option<PathBuf>,
        /// C# constants file declaring the route table.
        #[arg(long)]
        routes: Option<PathBuf>,
        /// Report changes without writing any file.
        #[arg(long)]
        dry_run: bool,
        /// Include files ignored by .gitignore.
        #[arg(long)]
        no_ignore: bool,
    },
    /// Resolve a concrete request path to its route-constant name.
    ResolvePath {
        /// C# constants file declaring the route table.
        #[arg(long)]
        routes: PathBuf,
        #[arg(long)]
        path: String,
    },
}
