use markup::ParseOptions;
use sheet::Environment;

/// Settings threaded through parsing and style application.
///
/// # Example
///
/// ```
/// use cascada::Config;
/// use sheet::Environment;
///
/// let config = Config::default()
///     .with_auto_close(false)
///     .with_environment(Environment::new(320.0, 640.0))
///     .with_inline_attribute("data-style");
/// assert!(!config.parse.auto_close);
/// assert_eq!(config.inline_attribute, "data-style");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub parse: ParseOptions,
    /// Environment `@media` rules are evaluated against.
    pub environment: Environment,
    /// Attribute holding per-element inline declarations.
    pub inline_attribute: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            environment: Environment::default(),
            inline_attribute: "style".to_string(),
        }
    }
}

impl Config {
    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    pub fn with_auto_close(mut self, auto_close: bool) -> Self {
        self.parse.auto_close = auto_close;
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_inline_attribute(mut self, name: impl Into<String>) -> Self {
        self.inline_attribute = name.into();
        self
    }
}
