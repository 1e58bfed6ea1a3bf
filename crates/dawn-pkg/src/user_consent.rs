//! User consent acquiring logic.

use std::io;

use crossterm::tty::IsTty as _;
use dawn_recipe::source::UpstreamSource;

/// Asks before cloning the multi-gigabyte upstream checkout.
///
/// The prompt is skipped when `skip` is set or when there is no TTY to ask
/// on; headless builds proceed as if `--yes` was passed.
///
/// # Errors
///
/// Returns an error if reading user input fails or the user denies.
pub fn ask_for_fetch_consent(source: &UpstreamSource, skip: bool) -> Result<(), UserConsentError> {
    if skip {
        return Ok(());
    }

    if !io::stdout().is_tty() {
        log::debug!("no TTY detected, skipping the consent prompt");
        return Ok(());
    }

    log::debug!("asking for consent to fetch the upstream checkout");
    crossterm::terminal::enable_raw_mode().map_err(UserConsentError::IoRead)?;
    crate::user_output!("Fetch {source} (large download)? [y/n]: ");
    let mut input = crossterm::event::read().map_err(UserConsentError::IoRead)?;

    if let crossterm::event::Event::Key(crossterm::event::KeyEvent {
        code: crossterm::event::KeyCode::Enter,
        kind: crossterm::event::KeyEventKind::Release,
        ..
    }) = input
    {
        // In Powershell, programs will potentially observe the Enter key release after they started
        // (see crossterm#124). If that happens, re-read the input.
        input = crossterm::event::read().map_err(UserConsentError::IoRead)?;
    }
    crossterm::terminal::disable_raw_mode().map_err(UserConsentError::IoRead)?;
    crate::user_output!("\n");

    if let crossterm::event::Event::Key(crossterm::event::KeyEvent {
        code: crossterm::event::KeyCode::Char('y'),
        ..
    }) = input
    {
        Ok(())
    } else {
        Err(UserConsentError::UserDenied)
    }
}

/// An error indicating that user consent was not acquired.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum UserConsentError {
    /// An I/O error occurred while reading user input.
    #[error("failed to read user input: {0}")]
    IoRead(#[source] io::Error),
    /// User denied fetching the upstream checkout.
    #[error("user denied fetching the upstream checkout")]
    UserDenied,
}
