//! Ctrl-C → abort token.
//!
//! The first interrupt trips the token so the run stops at the next blocking
//! boundary. A second interrupt exits immediately with status 130.

use rightsync_core::control::AbortToken;

/// What an interrupt should do given the token's current state.
#[derive(Debug, PartialEq, Eq)]
enum Interrupt {
    Abort,
    Exit,
}

fn on_interrupt(token: &AbortToken) -> Interrupt {
    if token.is_aborted() {
        return Interrupt::Exit;
    }
    token.abort();
    Interrupt::Abort
}

/// Route Ctrl-C to `token`. Failure to install is logged, not fatal.
pub fn install(token: &AbortToken) {
    let token = token.clone();
    let installed = ctrlc::set_handler(move || {
        if on_interrupt(&token) == Interrupt::Exit {
            std::process::exit(130);
        }
        eprintln!("\nInterrupted; finishing the current step (Ctrl-C again to quit now)");
    });
    if let Err(e) = installed {
        tracing::warn!("could not install Ctrl-C handler ({e}); Ctrl-C will kill the run");
    }
}
