use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use meowlogy_api::ApiClient;
use meowlogy_session::{DemoCredentials, Session, SessionStore};

pub type Error = anyhow::Error;

#[derive(Clone, Debug)]
pub struct Data {
    pub api: ApiClient,
    pub store: SessionStore,
    pub credentials: DemoCredentials,
}

/// Where command output goes. Tests capture it instead of printing.
#[derive(Clone, Default)]
pub enum Output {
    #[default]
    Stdout,
    Captured(Arc<Mutex<String>>),
}

impl Output {
    pub fn captured() -> (Self, Arc<Mutex<String>>) {
        let buffer = Arc::new(Mutex::new(String::new()));
        (Self::Captured(buffer.clone()), buffer)
    }

    fn write(&self, text: &str) -> Result<(), Error> {
        match self {
            Self::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(text.as_bytes())?;
                stdout.flush()?;
            }
            Self::Captured(buffer) => buffer
                .lock()
                .map_err(|_| anyhow::anyhow!("output buffer poisoned"))?
                .push_str(text),
        }
        Ok(())
    }
}

/// Per-invocation state handed to every command: shared services plus the
/// session loaded at startup.
pub struct Context<'a> {
    pub data: &'a Data,
    pub session: Session,
    output: Output,
}

impl<'a> Context<'a> {
    pub fn new(data: &'a Data, session: Session) -> Self {
        Self::with_output(data, session, Output::Stdout)
    }

    pub fn with_output(data: &'a Data, session: Session, output: Output) -> Self {
        Self {
            data,
            session,
            output,
        }
    }

    /// Prints a full line.
    pub fn say(&self, text: impl AsRef<str>) -> Result<(), Error> {
        self.output.write(text.as_ref())?;
        self.output.write("\n")
    }

    /// Prints without a trailing newline and flushes, for streamed text.
    pub fn print(&self, text: impl AsRef<str>) -> Result<(), Error> {
        self.output.write(text.as_ref())
    }

    /// The signed-in username, or an error telling the user to log in.
    pub fn require_session(&self) -> Result<&str, Error> {
        self.session
            .username()
            .ok_or_else(|| anyhow::anyhow!("You need to log in first (`meowlogy login`)."))
    }
}

#[cfg(test)]
mod tests {
    use meowlogy_api::ApiClient;
    use meowlogy_session::{DemoCredentials, Session, SessionStore};

    use super::{Context, Data, Output};

    fn data() -> Data {
        Data {
            api: ApiClient::new("http://localhost:8000").unwrap(),
            store: SessionStore::memory("test"),
            credentials: DemoCredentials::default(),
        }
    }

    #[test]
    fn anonymous_contexts_require_login() {
        let data = data();
        let ctx = Context::new(&data, Session::Anonymous);
        let err = ctx.require_session().unwrap_err();
        assert!(err.to_string().contains("log in"));

        let ctx = Context::new(&data, Session::authenticated("JAY", None).unwrap());
        assert_eq!(ctx.require_session().unwrap(), "JAY");
    }

    #[test]
    fn captured_output_collects_lines_and_fragments() {
        let data = data();
        let (output, buffer) = Output::captured();
        let ctx = Context::with_output(&data, Session::Anonymous, output);

        ctx.say("one").unwrap();
        ctx.print("tw").unwrap();
        ctx.print("o").unwrap();

        assert_eq!(buffer.lock().unwrap().as_str(), "one\ntwo");
    }
}
