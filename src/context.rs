use nix::unistd::{Gid, Uid, getgid, getuid};
use once_cell::sync::OnceCell;

static GLOBAL_CONTEXT: OnceCell<GlobalContext> = OnceCell::new();

/// The caller's identity as it was on the host, captured once at startup.
///
/// The uid/gid mappings have to reference the ids the process held *before*
/// entering the user namespace, so these are read before any namespace work
/// starts and never refreshed.
#[derive(Debug, Clone, Copy)]
pub struct GlobalContext {
    ruid: Uid,
    rgid: Gid,
}

impl GlobalContext {
    /// Captures the startup identity. Later calls are no-ops.
    pub fn init() {
        GLOBAL_CONTEXT.get_or_init(GlobalContext::new);
    }

    /// Get the current context
    pub fn current() -> Self {
        *GLOBAL_CONTEXT.get_or_init(GlobalContext::new)
    }

    #[inline]
    pub fn ruid(&self) -> Uid {
        self.ruid
    }

    #[inline]
    pub fn rgid(&self) -> Gid {
        self.rgid
    }

    fn new() -> Self {
        Self {
            ruid: getuid(),
            rgid: getgid(),
        }
    }
}
