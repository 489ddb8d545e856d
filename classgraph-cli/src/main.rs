//! Small smoke-test binary: scans real classpath roots with `classgraph` and
//! prints the result of one query. Not part of the core's specified surface.

use anyhow::Result;
use clap::{Parser, Subcommand};
use classgraph_scanspec::ScanSpec;

#[derive(Parser, Debug)]
#[command(name = "classgraph-cli", about = "Scan a JVM classpath and query the resulting class graph.")]
struct Cli {
    /// Classpath-element paths: directories, jars, or `outer.jar!inner.jar`
    /// chains.
    #[arg(long = "classpath", value_name = "PATH", required = true, num_args = 1..)]
    classpath: Vec<String>,

    /// Package prefixes to include; everything is included if omitted.
    #[arg(long = "whitelist", value_name = "PREFIX")]
    whitelist: Vec<String>,

    /// Package prefixes to exclude, even if whitelisted.
    #[arg(long = "blacklist", value_name = "PREFIX")]
    blacklist: Vec<String>,

    #[command(subcommand)]
    query: Query,
}

#[derive(Subcommand, Debug)]
enum Query {
    /// List every accepted class name.
    AllClasses,
    /// List classes implementing (directly or transitively) an interface.
    Implementing { interface: String },
    /// List classes carrying an annotation (directly or via meta-annotation).
    WithAnnotation { annotation: String },
    /// List transitive subclasses of a class.
    SubclassesOf { class: String },
    /// List transitive superclasses of a class.
    SuperclassesOf { class: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let scan_spec = ScanSpec::builder()
        .whitelist_packages(cli.whitelist.clone())
        .blacklist_packages(cli.blacklist.clone())
        .build();

    let result = classgraph::scan(&scan_spec, &cli.classpath)?;

    let names = match &cli.query {
        Query::AllClasses => result.all_class_names(),
        Query::Implementing { interface } => result.classes_implementing(interface),
        Query::WithAnnotation { annotation } => result.classes_with_annotation(annotation),
        Query::SubclassesOf { class } => result.subclasses_of(class),
        Query::SuperclassesOf { class } => result.superclasses_of(class),
    };

    for name in names {
        println!("{name}");
    }
    Ok(())
}
