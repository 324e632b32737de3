use std::path::PathBuf;

use clap::Parser;
use compilerd::language::Language;

#[derive(Parser, Debug, Clone)]
#[command(name = "compilerd", about = "Terminal client for a remote code runner", version)]
pub struct Cli {
    /// Language to run (c, cpp, python, java, nodejs).
    #[arg(short = 'l', long)]
    pub language: Option<Language>,

    /// Load the script from this file.
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Load standard input for the program from this file ("-" reads our own stdin in --run mode).
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Runner base URL, e.g. http://localhost:3000.
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// Request timeout in seconds (0 disables).
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Submit once, print the result and exit instead of opening the editor.
    ///
    /// Chosen automatically when stdout is not a terminal.
    #[arg(long)]
    pub run: bool,

    /// With --run, also print the raw runner response.
    #[arg(long)]
    pub raw: bool,

    /// List supported languages and exit.
    #[arg(long = "list-languages", visible_alias = "ll")]
    pub list_languages: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_run_flags() {
        let cli = Cli::try_parse_from([
            "compilerd", "-l", "python", "-f", "main.py", "--run", "--raw", "--timeout", "5",
        ])
        .unwrap();
        assert_eq!(cli.language, Some(Language::Python));
        assert_eq!(cli.file, Some(PathBuf::from("main.py")));
        assert!(cli.run && cli.raw);
        assert_eq!(cli.timeout, Some(5));
    }

    #[test]
    fn test_rejects_unknown_language() {
        assert!(Cli::try_parse_from(["compilerd", "--language", "cobol"]).is_err());
    }
}
