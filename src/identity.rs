use crate::context::GlobalContext;
use anyhow::{Context, Result};
use nix::unistd::{Gid, Uid, setresgid, setresuid};
use std::{fs, io, path::Path};

const SETGROUPS_PATH: &str = "/proc/self/setgroups";
const UID_MAP_PATH: &str = "/proc/self/uid_map";
const GID_MAP_PATH: &str = "/proc/self/gid_map";

/// Maps the caller's real uid/gid to root inside the new user namespace and
/// switches the process credentials over.
///
/// The kernel enforces the ordering: `setgroups` must be denied before the
/// gid map is accepted, both maps must be written before id 0 is a valid
/// target for `setres{u,g}id`, and each map file takes exactly one write.
/// The resulting root identity is namespace-local; from the host's point of
/// view the process keeps its unprivileged ids.
pub fn become_root(context: &GlobalContext) -> Result<()> {
    deny_setgroups(Path::new(SETGROUPS_PATH))?;

    write_id_map(Path::new(UID_MAP_PATH), context.ruid().as_raw())?;
    write_id_map(Path::new(GID_MAP_PATH), context.rgid().as_raw())?;

    let root_uid = Uid::from_raw(0);
    let root_gid = Gid::from_raw(0);
    setresuid(root_uid, root_uid, root_uid).context("setresuid(0, 0, 0) failed")?;
    setresgid(root_gid, root_gid, root_gid).context("setresgid(0, 0, 0) failed")?;

    Ok(())
}

/// Disables the supplementary-group-list override for the namespace, which
/// lifts the CAP_SETGID requirement on the gid map write.
///
/// `/proc/self/setgroups` only exists since Linux 3.19; on older kernels the
/// gid map write is accepted without it, so a missing file is success.
fn deny_setgroups(path: &Path) -> Result<()> {
    match fs::write(path, "deny") {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(error)
            .with_context(|| format!("Failed to write \"deny\" to {}", path.display())),
    }
}

/// Writes a single-entry id map: outer real id becomes id 0 inside.
fn write_id_map(path: &Path, outer_id: u32) -> Result<()> {
    fs::write(path, map_line(outer_id))
        .with_context(|| format!("Failed to write id mapping to {}", path.display()))
}

fn map_line(outer_id: u32) -> String {
    format!("0 {outer_id} 1\n")
}
