#![forbid(unsafe_code)]

//! Command-line argument parsing for the token field demo.
//!
//! Parses args manually to keep the binary lean. Supports environment
//! variable overrides via the `TOKENFIELD_DEMO_*` prefix.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Resizing token field terminal demo

USAGE:
    tokenfield-demo [OPTIONS] [TOKEN]...

Each TOKEN is appended to the field before the first layout. The field is
then laid out at --width columns and printed, followed by one frame per
--remove.

OPTIONS:
    --width=N            Field width in columns (default: 40)
    --config=PATH        Load a JSON token field configuration
    --label=TEXT         Show a leading label
    --placeholder=TEXT   Placeholder for the empty text field
    --text=TEXT          Initial text field contents
    --remove=TITLE       Remove a token after the first frame (repeatable)
    --focus              Focus the text field once it loads
    --log-json           Write logs to stderr as JSON lines
    --help, -h           Show this help message
    --version, -V        Show version

CONFIGURATION FILE:
    Any field of the token field configuration may be given; missing fields
    use library defaults. One column is one unit, so set font.advance to 1
    and item_height to 1 for a faithful terminal rendering.

ENVIRONMENT VARIABLES:
    TOKENFIELD_DEMO_WIDTH     Override --width
    TOKENFIELD_DEMO_CONFIG    Override --config
    TOKENFIELD_DEMO_LABEL     Override --label
    RUST_LOG                  Log filter (e.g. tokenfield=debug)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    /// Field width in columns.
    pub width: u16,
    /// Optional JSON configuration file.
    pub config: Option<PathBuf>,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub text: Option<String>,
    /// Tokens appended before the first layout.
    pub tokens: Vec<String>,
    /// Titles removed one by one after the first frame.
    pub remove: Vec<String>,
    pub focus: bool,
    /// Log as JSON instead of human-readable lines.
    pub log_json: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            width: 40,
            config: None,
            label: None,
            placeholder: None,
            text: None,
            tokens: Vec::new(),
            remove: Vec::new(),
            focus: false,
            log_json: false,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

/// Command-line parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    InvalidValue { flag: &'static str, value: String },
    UnknownArgument(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { flag, value } => write!(f, "Invalid {flag} value: {value}"),
            Self::UnknownArgument(arg) => write!(f, "Unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for CliError {}

impl Opts {
    /// Parse command-line arguments and environment variables.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags. Exits the process on `--help`,
    /// `--version` and parse errors.
    pub fn parse() -> Self {
        let mut opts = Self::default();
        opts.apply_env(|key| env::var(key).ok());

        match opts.apply_args(env::args().skip(1)) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("tokenfield-demo {VERSION}");
                process::exit(0);
            }
            Err(err) => {
                eprintln!("{err}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Apply `TOKENFIELD_DEMO_*` overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("TOKENFIELD_DEMO_WIDTH")
            && let Ok(n) = val.parse()
        {
            self.width = n;
        }
        if let Some(val) = lookup("TOKENFIELD_DEMO_CONFIG") {
            self.config = Some(PathBuf::from(val));
        }
        if let Some(val) = lookup("TOKENFIELD_DEMO_LABEL") {
            self.label = Some(val);
        }
    }

    /// Apply command-line arguments on top of `self`.
    pub fn apply_args(
        mut self,
        args: impl IntoIterator<Item = String>,
    ) -> Result<Command, CliError> {
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--focus" => self.focus = true,
                "--log-json" => self.log_json = true,
                other => {
                    if let Some(val) = other.strip_prefix("--width=") {
                        self.width = val.parse().map_err(|_| CliError::InvalidValue {
                            flag: "--width",
                            value: val.to_string(),
                        })?;
                    } else if let Some(val) = other.strip_prefix("--config=") {
                        self.config = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--label=") {
                        self.label = Some(val.to_string());
                    } else if let Some(val) = other.strip_prefix("--placeholder=") {
                        self.placeholder = Some(val.to_string());
                    } else if let Some(val) = other.strip_prefix("--text=") {
                        self.text = Some(val.to_string());
                    } else if let Some(val) = other.strip_prefix("--remove=") {
                        self.remove.push(val.to_string());
                    } else if other.starts_with("--") {
                        return Err(CliError::UnknownArgument(other.to_string()));
                    } else {
                        self.tokens.push(other.to_string());
                    }
                }
            }
        }
        Ok(Command::Run(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_opts() {
        let opts = Opts::default();
        assert_eq!(opts.width, 40);
        assert!(opts.tokens.is_empty());
        assert!(!opts.focus);
        assert!(!opts.log_json);
    }

    #[test]
    fn log_json_flag_is_parsed() {
        let Ok(Command::Run(opts)) = Opts::default().apply_args(args(&["--log-json", "a"])) else {
            panic!("expected run");
        };
        assert!(opts.log_json);
        assert_eq!(opts.tokens, vec!["a"]);
    }

    #[test]
    fn positional_args_become_tokens() {
        let cmd = Opts::default()
            .apply_args(args(&["alice", "--width=60", "bob", "--remove=alice"]))
            .unwrap();
        let Command::Run(opts) = cmd else {
            panic!("expected run");
        };
        assert_eq!(opts.tokens, vec!["alice", "bob"]);
        assert_eq!(opts.width, 60);
        assert_eq!(opts.remove, vec!["alice"]);
    }

    #[test]
    fn invalid_width_is_rejected() {
        let err = Opts::default().apply_args(args(&["--width=wide"])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid --width value: wide");
    }

    #[test]
    fn unknown_flags_are_rejected() {
        let err = Opts::default().apply_args(args(&["--bogus"])).unwrap_err();
        assert_eq!(err, CliError::UnknownArgument("--bogus".into()));
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(
            Opts::default().apply_args(args(&["a", "-h"])),
            Ok(Command::Help)
        );
        assert_eq!(
            Opts::default().apply_args(args(&["--version"])),
            Ok(Command::Version)
        );
    }

    #[test]
    fn env_overrides_are_beaten_by_flags() {
        let mut opts = Opts::default();
        opts.apply_env(|key| match key {
            "TOKENFIELD_DEMO_WIDTH" => Some("72".into()),
            "TOKENFIELD_DEMO_LABEL" => Some("Cc:".into()),
            _ => None,
        });
        assert_eq!(opts.width, 72);
        assert_eq!(opts.label.as_deref(), Some("Cc:"));

        let Ok(Command::Run(opts)) = opts.apply_args(args(&["--label=To:"])) else {
            panic!("expected run");
        };
        assert_eq!(opts.width, 72);
        assert_eq!(opts.label.as_deref(), Some("To:"));
    }

    #[test]
    fn help_text_lists_env_vars() {
        assert!(HELP_TEXT.contains("TOKENFIELD_DEMO_WIDTH"));
        assert!(HELP_TEXT.contains("--remove=TITLE"));
        assert!(HELP_TEXT.contains("--log-json"));
        assert!(!VERSION.is_empty());
    }
}
