use roster_model::CancelToken;

/// The façade's one piece of call-scoped configuration that isn't already
/// carried on `Problem` itself — the cancellation primitive (§4.6/§5).
#[derive(Debug, Clone, Default)]
pub struct SolveConfig {
    pub cancel: CancelToken,
}

impl SolveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(cancel: CancelToken) -> Self {
        Self { cancel }
    }
}
