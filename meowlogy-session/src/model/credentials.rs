use std::env;

const DEFAULT_DEMO_USERNAME: &str = "JAY";
const DEFAULT_DEMO_PASSWORD: &str = "JAY";

/// The single hardcoded login the client accepts. There is no server-side check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DemoCredentials {
    pub username: String,
    pub password: String,
}

impl Default for DemoCredentials {
    fn default() -> Self {
        Self {
            username: DEFAULT_DEMO_USERNAME.to_owned(),
            password: DEFAULT_DEMO_PASSWORD.to_owned(),
        }
    }
}

impl DemoCredentials {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let username = env::var("MEOWLOGY_DEMO_USERNAME")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.username);
        let password = env::var("MEOWLOGY_DEMO_PASSWORD")
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.password);

        Self { username, password }
    }

    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}
