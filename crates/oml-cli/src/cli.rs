use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "oml",
    about = "Inspect, edit, convert and search OML documents",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List supported platform versions
    Versions(VersionsArgs),
    /// Show all headers, or the value of one header
    Headers(HeadersArgs),
    /// List fragment names, or print one fragment's XML
    Fragments(FragmentsArgs),
    /// Edit headers and fragments and save the result
    Manipulate(ManipulateArgs),
    /// Count a keyword across the documents in a directory
    Search(SearchArgs),
    /// Convert a document to fragment-only XML
    Convert(ConvertArgs),
}

#[derive(Args)]
pub struct VersionsArgs {
    /// Only the latest supported version
    #[arg(long)]
    pub latest: bool,
    /// Full version numbers instead of labels
    #[arg(long)]
    pub full: bool,
}

#[derive(Args)]
pub struct HeadersArgs {
    pub input: PathBuf,
    #[arg(short = 'p', long, default_value = "OL")]
    pub platform: String,
    /// Header to print (case-insensitive)
    #[arg(short, long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct FragmentsArgs {
    pub input: PathBuf,
    #[arg(short = 'p', long, default_value = "OL")]
    pub platform: String,
    /// Fragment to print (case-sensitive)
    #[arg(short, long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct ManipulateArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    #[arg(short = 'p', long, default_value = "OL")]
    pub platform: String,
    /// `xml` to export XML; defaults to the output extension
    #[arg(long = "save-as")]
    pub save_as: Option<String>,
    /// Header edit as `name:value`
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,
    /// Fragment edit as `name:xml`
    #[arg(short = 'F', long = "fragment")]
    pub fragments: Vec<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    pub dir: PathBuf,
    pub keyword: String,
    #[arg(short = 'p', long, default_value = "OL")]
    pub platform: String,
}

#[derive(Args)]
pub struct ConvertArgs {
    pub input: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_versions() {
        let cli = Cli::try_parse_from(["oml", "versions", "--latest", "--full"]).unwrap();
        if let Command::Versions(args) = cli.command {
            assert!(args.latest);
            assert!(args.full);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_headers_defaults_to_latest() {
        let cli = Cli::try_parse_from(["oml", "headers", "a.oml"]).unwrap();
        if let Command::Headers(args) = cli.command {
            assert_eq!(args.platform, "OL");
            assert_eq!(args.input, PathBuf::from("a.oml"));
            assert!(args.name.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_fragments_with_name() {
        let cli = Cli::try_parse_from(["oml", "fragments", "a.oml", "-p", "O10", "-n", "Main"]).unwrap();
        if let Command::Fragments(args) = cli.command {
            assert_eq!(args.platform, "O10");
            assert_eq!(args.name, Some("Main".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_manipulate_repeated_edits() {
        let cli = Cli::try_parse_from([
            "oml", "manipulate", "in.oml", "out.xml",
            "-H", "Name:Portal", "--header", "Revision:2",
            "-F", "Main:<Flow/>", "--save-as", "xml",
        ])
        .unwrap();
        if let Command::Manipulate(args) = cli.command {
            assert_eq!(args.headers, vec!["Name:Portal", "Revision:2"]);
            assert_eq!(args.fragments, vec!["Main:<Flow/>"]);
            assert_eq!(args.save_as, Some("xml".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_search() {
        let cli = Cli::try_parse_from(["oml", "search", "./modules", "Screen"]).unwrap();
        if let Command::Search(args) = cli.command {
            assert_eq!(args.keyword, "Screen");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from([
            "oml", "--verbose", "--format", "json", "--config", "oml.toml", "convert", "a.oml",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.config, Some(PathBuf::from("oml.toml")));
        assert!(matches!(cli.command, Command::Convert(_)));
    }
}
