use std::io::Write;

/// The process environment a command runs against, so commands can be driven from tests
pub trait Host: Send + Sync {
    /// Destination for summaries and success messages.
    fn output(&mut self) -> impl Write;

    /// Destination for warnings and per-repository failures.
    fn error(&mut self) -> impl Write;

    /// End the process with `code`. Test hosts only record it.
    fn exit(&mut self, code: i32);
}

/// Host that captures both streams in memory
#[cfg(test)]
#[derive(Debug, Default)]
pub struct TestHost {
    pub output_buf: Vec<u8>,
    pub error_buf: Vec<u8>,
    pub exit_code: Option<i32>,
}

#[cfg(test)]
impl TestHost {
    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }

    pub fn error_str(&self) -> String {
        String::from_utf8_lossy(&self.error_buf).into_owned()
    }
}

#[cfg(test)]
impl Host for TestHost {
    fn output(&mut self) -> impl Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl Write {
        &mut self.error_buf
    }

    fn exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}
