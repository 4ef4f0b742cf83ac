use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::check::CheckArgs;

#[derive(Clone, Debug, Parser)]
#[command(name = "hashcheck", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    /// Show debug logs on stderr.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable coloured output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// TOML file with endpoint, batching and timeout settings.
    #[arg(long, global = true, env = "HASHCHECK_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "c", name = "check", about = "Check every file in a directory against the catalog")]
    Check(CheckArgs),
    #[command(alias = "l", name = "limit", about = "Query the current rate budget")]
    Limit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() { App::command().debug_assert(); }

    #[test]
    fn test_check_alias_and_flags() {
        let app = App::try_parse_from(["hashcheck", "-v", "c", "mods", "--legacy", "--ext", "jar", "--ext", "zip"])
            .unwrap();
        assert!(app.verbose);
        let Commands::Check(args) = app.cmd else {
            panic!("expected check");
        };
        assert_eq!(args.dir, PathBuf::from("mods"));
        assert!(args.legacy);
        assert_eq!(args.ext, ["jar", "zip"]);
    }

    #[test]
    fn test_algorithm_is_parsed() {
        let app = App::try_parse_from(["hashcheck", "check", "mods", "--algorithm", "SHA-256"]).unwrap();
        let Commands::Check(args) = app.cmd else {
            panic!("expected check");
        };
        assert_eq!(args.algorithm, Some(hashcheck_verify::DigestAlgorithm::Sha256));
        assert!(App::try_parse_from(["hashcheck", "check", "mods", "--algorithm", "md5"]).is_err());
    }

    #[test]
    fn test_limit_alias() {
        let app = App::try_parse_from(["hashcheck", "--no-color", "l"]).unwrap();
        assert!(app.no_color);
        assert!(matches!(app.cmd, Commands::Limit));
    }
}
