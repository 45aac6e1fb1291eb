use anyhow::{Context, Result, bail};
use nix::sched::{CloneFlags, unshare};
use std::path::Path;

/// Places the calling process into new user, mount, and network namespaces
/// with a single `unshare` request.
///
/// There is no partial-success state to clean up: the kernel applies the
/// three flags atomically, so on error the process is still in its original
/// namespaces and on success it is the sole member of all three new ones.
/// The process still holds an unmapped (nobody) identity afterwards until
/// the id maps are written.
pub fn create_namespaces() -> Result<()> {
    for (flag, name) in namespace_kinds() {
        if !is_namespace_supported(name) {
            bail!("Kernel doesn't support {:?} ({} namespaces)", flag, name);
        }
    }

    unshare(namespace_flags())
        .context("unshare(CLONE_NEWUSER | CLONE_NEWNS | CLONE_NEWNET) failed")?;

    Ok(())
}

pub fn namespace_flags() -> CloneFlags {
    namespace_kinds()
        .into_iter()
        .fold(CloneFlags::empty(), |flags, (flag, _)| flags | flag)
}

fn namespace_kinds() -> [(CloneFlags, &'static str); 3] {
    [
        (CloneFlags::CLONE_NEWUSER, "user"),
        (CloneFlags::CLONE_NEWNS, "mnt"),
        (CloneFlags::CLONE_NEWNET, "net"),
    ]
}

fn is_namespace_supported(ns: &str) -> bool {
    Path::new("/proc/self/ns").join(ns).exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_cover_user_mount_net() {
        let flags = namespace_flags();
        assert!(flags.contains(CloneFlags::CLONE_NEWUSER));
        assert!(flags.contains(CloneFlags::CLONE_NEWNS));
        assert!(flags.contains(CloneFlags::CLONE_NEWNET));
        assert_eq!(
            flags,
            CloneFlags::CLONE_NEWUSER | CloneFlags::CLONE_NEWNS | CloneFlags::CLONE_NEWNET
        );
    }

    #[test]
    fn test_unknown_namespace_is_unsupported() {
        assert!(!is_namespace_supported("no-such-namespace"));
    }
}
