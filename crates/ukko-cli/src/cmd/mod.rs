pub mod auto;
pub mod plan;
pub mod run;
pub mod setup;
pub mod status;

use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// UkkoExit: typed non-zero exit codes (no std::process::exit in handlers)
// ---------------------------------------------------------------------------

/// A stop the command has already explained on stdout.
#[derive(Debug)]
pub enum UkkoExit {
    GenerationFailed(i32),
    ConflictPending,
    StillPlanning,
    Interrupted,
}

impl UkkoExit {
    pub fn exit_code(&self) -> i32 {
        match self {
            UkkoExit::Interrupted => 130,
            _ => 1,
        }
    }
}

impl std::fmt::Display for UkkoExit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UkkoExit::GenerationFailed(code) => write!(f, "generation exited with code {code}"),
            UkkoExit::ConflictPending => write!(f, "generation refused: conflict pending"),
            UkkoExit::StillPlanning => write!(f, "planning phase not complete"),
            UkkoExit::Interrupted => write!(f, "interrupted by operator"),
        }
    }
}

impl std::error::Error for UkkoExit {}

/// A token cancelled on Ctrl+C.
///
/// Installing the handler also keeps Ctrl+C from killing `ukko` while an
/// interactive session owns the terminal; the child receives it instead.
pub fn interrupt_token() -> CancellationToken {
    let token = CancellationToken::new();
    let cancel = token.clone();
    if let Err(e) = ctrlc::set_handler(move || cancel.cancel()) {
        tracing::warn!(error = %e, "could not install Ctrl+C handler");
    }
    token
}

pub fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().map_err(|e| anyhow::anyhow!("failed to start async runtime: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(UkkoExit::Interrupted.exit_code(), 130);
        assert_eq!(UkkoExit::GenerationFailed(7).exit_code(), 1);
        assert_eq!(UkkoExit::ConflictPending.exit_code(), 1);
        assert_eq!(UkkoExit::StillPlanning.exit_code(), 1);
    }

    #[test]
    fn downcasts_through_anyhow() {
        let err: anyhow::Error = UkkoExit::GenerationFailed(2).into();
        let exit = err.downcast_ref::<UkkoExit>().unwrap();
        assert_eq!(exit.to_string(), "generation exited with code 2");
    }
}
