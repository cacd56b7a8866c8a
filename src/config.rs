use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::render::RenderMode;
use crate::rule_set::RuleError;
use crate::rule_set::RuleSet;

pub const USAGE: &str = "\
Usage: sparselife [OPTIONS] [PATTERN.rle]

Arguments:
  [PATTERN.rle]      RLE pattern to start from. Defaults to an R-pentomino

Options:
      --tick-ms <N>  Milliseconds between generations [default: 100]
      --paused       Start with automatic stepping paused
      --braille      Draw 2x4 cells per character using braille dots
      --rule <RULE>  Life rule, e.g. B3/S23. Overrides the pattern's rule
      --log <FILE>   Write logs to FILE instead of stderr
  -h, --help         Print help

Keys:
  h j k l, arrows    Move the view
  n, .               Step one generation
  space, p           Pause or resume
  0                  Back to the origin
  left click         Toggle a cell
  q, Esc, Ctrl-C     Quit

The log filter is read from RUST_LOG [default: warn]. Without --log, logs go to stderr
and draw over the screen unless stderr is redirected.";

/// Time between generations when nothing else is configured.
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Time between two `Tick`s
    pub tick: Duration,

    /// Whether ticking starts paused
    pub paused: bool,

    pub mode: RenderMode,

    /// Overrides the rule of the pattern
    pub rules: Option<RuleSet>,

    /// RLE file to seed the board with
    pub pattern: Option<PathBuf>,

    /// File receiving the logs, instead of stderr
    pub log: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK,
            paused: false,
            mode: RenderMode::default(),
            rules: None,
            pattern: None,
            log: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{}", USAGE)]
    Help,

    #[error("Missing value for '{flag}'")]
    MissingValue { flag: String },

    #[error("Invalid tick length \"{got}\", expected a positive number of milliseconds")]
    InvalidTick { got: String },

    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] RuleError),

    #[error("Unknown option '{flag}'")]
    UnknownFlag { flag: String },

    #[error("Only one pattern can be given, got '{first}' and '{second}'")]
    ExtraPattern { first: String, second: String },
}

impl Config {
    /// Build a config from process arguments, without the program name.
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Config::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Err(ConfigError::Help),
                "--paused" => config.paused = true,
                "--braille" => config.mode = RenderMode::Braille,
                "--tick-ms" => {
                    let value = args.next().ok_or_else(|| ConfigError::MissingValue {
                        flag: arg.clone(),
                    })?;

                    let tick = match value.parse::<u64>() {
                        Ok(ms) if ms > 0 => Duration::from_millis(ms),
                        _ => return Err(ConfigError::InvalidTick { got: value }),
                    };

                    config.tick = tick;
                }
                "--rule" => {
                    let value = args.next().ok_or_else(|| ConfigError::MissingValue {
                        flag: arg.clone(),
                    })?;

                    config.rules = Some(value.parse()?);
                }
                "--log" => {
                    let value = args.next().ok_or_else(|| ConfigError::MissingValue {
                        flag: arg.clone(),
                    })?;

                    config.log = Some(PathBuf::from(value));
                }
                flag if flag.starts_with('-') && flag != "-" => {
                    return Err(ConfigError::UnknownFlag {
                        flag: flag.to_string(),
                    });
                }
                _ => {
                    if let Some(first) = &config.pattern {
                        return Err(ConfigError::ExtraPattern {
                            first: first.display().to_string(),
                            second: arg.clone(),
                        });
                    }

                    config.pattern = Some(PathBuf::from(&arg));
                }
            }
        }

        Ok(config)
    }
}
