/// The viewing context that conditional rules are evaluated against.
///
/// # Example
///
/// ```
/// use sheet::Environment;
///
/// let env = Environment::new(375.0, 812.0).with_device("handheld");
/// assert_eq!(env.orientation(), "portrait");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Environment {
    /// Viewport width in CSS pixels.
    pub width: f64,
    /// Viewport height in CSS pixels.
    pub height: f64,
    /// Media type, compared against `@media` types (`screen`, `print`, ...).
    pub device: String,
    pub user_agent: Option<String>,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
            device: "screen".to_string(),
            user_agent: None,
        }
    }
}

impl Environment {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn orientation(&self) -> &'static str {
        if self.height >= self.width {
            "portrait"
        } else {
            "landscape"
        }
    }
}
