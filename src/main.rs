mod config;
mod context;
mod exec;
mod identity;
mod namespace;

use anyhow::Result;
use config::Config;
use context::GlobalContext;
use std::process;

fn main() {
    let config = Config::from_args();

    // Capture the outer identity before entering the user namespace.
    GlobalContext::init();
    let context = GlobalContext::current();

    debug_print!(config, "outer uid={} gid={}", context.ruid(), context.rgid());

    // Namespace and credential transitions apply to the kernel thread that
    // issues them, and that same thread must be the one that execs. The
    // whole sequence therefore stays on the main thread, in order.
    if let Err(error) = isolate(&context) {
        eprintln!("netns-run: {error:#}");
        process::exit(255);
    }

    debug_print!(config, "namespaces ready, executing command");

    // Replaces the process image on success, so this only falls through on
    // failure.
    let error = match exec::replace_process(&config) {
        Ok(never) => match never {},
        Err(error) => error,
    };

    eprintln!("netns-run: {error:#}");
    process::exit(1);
}

/// Enters the new namespaces and becomes root inside them. Once
/// `create_namespaces` has succeeded there is no way back; any later failure
/// leaves termination as the only safe continuation.
fn isolate(context: &GlobalContext) -> Result<()> {
    namespace::create_namespaces()?;
    identity::become_root(context)?;
    Ok(())
}
