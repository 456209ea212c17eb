//! Chart contributor, watcher and star counts of GitHub repositories.

use repo_charts::{Host, run};
use std::io::Write;
use std::io::{stderr, stdout};

/// Host bound to the real standard streams and process exit.
#[derive(Debug, Clone, Default)]
pub struct RealHost;

impl Host for RealHost {
    fn output(&mut self) -> impl Write {
        stdout()
    }

    fn error(&mut self) -> impl Write {
        stderr()
    }

    fn exit(&mut self, code: i32) {
        std::process::exit(code);
    }
}

#[tokio::main]
async fn main() -> Result<(), ohno::AppError> {
    run(&mut RealHost, std::env::args()).await
}
