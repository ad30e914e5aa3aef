use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Layout-aware Makefile fragment generator for node packages
#[derive(Parser, Debug)]
#[command(
    name = "makeplan",
    about = "Layout-aware Makefile fragment generator for node packages",
    version,
    author,
    long_about = "makeplan inspects a package's source layout, infers its library and \
                  executable build targets, and writes priority-ordered Makefile fragments \
                  under make/ for lint, test, and build pipelines."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Generate Makefile fragments for a package",
        long_about = "Resolves build targets (explicitly or from the source layout), writes \
                      make/<priority>-<name>.mk fragments, records the builder config, and \
                      installs the tool packages the fragments need.\n\n\
                      Examples:\n  \
                      makeplan setup\n  \
                      makeplan setup /path/to/package --no-doc\n  \
                      makeplan setup --with-lib index.js:dist/foo.js --format json"
    )]
    Setup(SetupArgs),

    #[command(
        about = "Show the build targets inferred from the source layout",
        long_about = "Runs the package checks and layout classification only; no files are \
                      written.\n\n\
                      Examples:\n  \
                      makeplan detect\n  \
                      makeplan detect /path/to/package --format yaml"
    )]
    Detect(DetectArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct SetupArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to the package root (defaults to current directory)"
    )]
    pub project_path: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Source root relative to the package root")]
    pub src_path: Option<String>,

    #[arg(long, value_name = "DIR", help = "Distribution root")]
    pub dist_path: Option<String>,

    #[arg(long, value_name = "DIR", help = "Directory tests are staged into")]
    pub test_staging_path: Option<String>,

    #[arg(long, value_name = "DIR", help = "Built documentation directory")]
    pub doc_build_path: Option<String>,

    #[arg(long, value_name = "DIR", help = "Documentation source directory")]
    pub doc_src_path: Option<String>,

    #[arg(long, value_name = "DIR", help = "QA report directory")]
    pub qa_path: Option<String>,

    #[arg(long, help = "Skip documentation targets")]
    pub no_doc: bool,

    #[arg(long, help = "Skip lint fragment")]
    pub no_lint: bool,

    #[arg(long, help = "Skip test fragment")]
    pub no_test: bool,

    #[arg(long, help = "Do not install tool dependencies")]
    pub no_install: bool,

    #[arg(long, help = "Ignore local development packages when installing")]
    pub no_dev_install: bool,

    #[arg(long, help = "Treat a root index as an executable rather than a library")]
    pub is_executable: bool,

    #[arg(
        long = "with-lib",
        value_name = "ENTRY:OUT",
        help = "Explicit library target (repeatable)"
    )]
    pub with_libs: Vec<String>,

    #[arg(
        long = "with-executable",
        value_name = "ENTRY:OUT",
        help = "Explicit executable target (repeatable)"
    )]
    pub with_executables: Vec<String>,

    #[arg(long, value_name = "PREFIX", help = "Make variable namespace prefix")]
    pub namespace: Option<String>,

    #[arg(
        long = "dev-path",
        value_name = "DIR",
        help = "Directory holding local development packages (repeatable)"
    )]
    pub dev_paths: Vec<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct DetectArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to the package root (defaults to current directory)"
    )]
    pub project_path: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Source root relative to the package root")]
    pub src_path: Option<String>,

    #[arg(long, help = "Treat a root index as an executable rather than a library")]
    pub is_executable: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_default_setup_args() {
        let args = CliArgs::parse_from(["makeplan", "setup"]);
        match args.command {
            Commands::Setup(setup_args) => {
                assert_eq!(setup_args.format, OutputFormatArg::Human);
                assert!(setup_args.project_path.is_none());
                assert!(setup_args.src_path.is_none());
                assert!(!setup_args.no_doc);
                assert!(!setup_args.no_install);
                assert!(setup_args.with_libs.is_empty());
            }
            _ => panic!("Expected Setup command"),
        }
    }

    #[test]
    fn test_setup_with_options() {
        let args = CliArgs::parse_from([
            "makeplan",
            "setup",
            "/tmp/pkg",
            "--src-path",
            "source",
            "--no-doc",
            "--no-lint",
            "--no-install",
            "--is-executable",
            "--with-lib",
            "lib/index.js:dist/foo.js",
            "--with-lib",
            "alt/index.js:dist/alt.js",
            "--with-executable",
            "bin/index.js:dist/foo-exec.js",
            "--namespace",
            "CATALYST",
            "--dev-path",
            "/work/dev",
            "--format",
            "json",
        ]);

        match args.command {
            Commands::Setup(setup_args) => {
                assert_eq!(setup_args.project_path, Some(PathBuf::from("/tmp/pkg")));
                assert_eq!(setup_args.src_path.as_deref(), Some("source"));
                assert!(setup_args.no_doc);
                assert!(setup_args.no_lint);
                assert!(!setup_args.no_test);
                assert!(setup_args.no_install);
                assert!(setup_args.is_executable);
                assert_eq!(setup_args.with_libs.len(), 2);
                assert_eq!(setup_args.with_executables, vec!["bin/index.js:dist/foo-exec.js"]);
                assert_eq!(setup_args.namespace.as_deref(), Some("CATALYST"));
                assert_eq!(setup_args.dev_paths, vec![PathBuf::from("/work/dev")]);
                assert_eq!(setup_args.format, OutputFormatArg::Json);
            }
            _ => panic!("Expected Setup command"),
        }
    }

    #[test]
    fn test_detect_command() {
        let args = CliArgs::parse_from(["makeplan", "detect", "/tmp/pkg", "-f", "yaml"]);
        match args.command {
            Commands::Detect(detect_args) => {
                assert_eq!(detect_args.project_path, Some(PathBuf::from("/tmp/pkg")));
                assert_eq!(detect_args.format, OutputFormatArg::Yaml);
            }
            _ => panic!("Expected Detect command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let args = CliArgs::parse_from(["makeplan", "-v", "detect"]);
        assert!(args.verbose);
        assert!(!args.quiet);

        let args = CliArgs::parse_from(["makeplan", "--log-level", "debug", "setup"]);
        assert_eq!(args.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(CliArgs::try_parse_from(["makeplan", "-v", "-q", "setup"]).is_err());
    }
}
