use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Shared line writer for everything the shell prints.
///
/// Consecutive identical lines are printed once: a failed start reaches the
/// terminal both as a startup phase and as the wizard's step error.
#[derive(Clone)]
pub struct Console {
    inner: Arc<Mutex<ConsoleInner>>,
}

struct ConsoleInner {
    out: Box<dyn Write + Send>,
    last_line: Option<String>,
}

impl Console {
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ConsoleInner {
                out,
                last_line: None,
            })),
        }
    }

    pub fn line(&self, text: impl Into<String>) {
        let text = text.into();
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };
        if inner.last_line.as_deref() == Some(text.as_str()) {
            return;
        }
        let _ = writeln!(inner.out, "{text}");
        let _ = inner.out.flush();
        inner.last_line = Some(text);
    }

    /// Writes without a newline (prompts, progress ticks).
    pub fn partial(&self, text: &str) {
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };
        let _ = write!(inner.out, "{text}");
        let _ = inner.out.flush();
        inner.last_line = None;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// `Write` sink whose contents can be read back.
    #[derive(Clone, Default)]
    pub struct SharedBuffer(pub Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    pub fn buffered_console() -> (Console, SharedBuffer) {
        let buffer = SharedBuffer::default();
        (Console::new(Box::new(buffer.clone())), buffer)
    }
}
