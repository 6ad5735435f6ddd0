// Pagination window shared by list queries

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u32,
    pub limit: u32,
}

impl Page {
    /// Resolves raw `skip`/`limit` parameters, clamping the limit into `1..=max_limit`.
    pub fn resolve(skip: Option<u32>, limit: Option<u32>, default_limit: u32, max_limit: u32) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            offset: skip.unwrap_or(0),
            limit: limit.unwrap_or(default_limit).clamp(1, max_limit),
        }
    }

    pub fn unbounded() -> Self {
        Self {
            offset: 0,
            limit: u32::MAX,
        }
    }
}
