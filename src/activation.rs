//! Startup check for launches caused by clicking an earlier toast.
//!
//! Every posted toast names [`LAUNCH_MARKER`] in its launch payload, so a
//! click relaunches the executable with that argument. The check runs
//! before any argument parsing: such a launch clears this app's toast
//! history and exits instead of posting a new notification.

use anyhow::Result;

/// Argument passed back to the process when it is launched from a toast.
pub const LAUNCH_MARKER: &str = "-ToastActivated";

pub fn was_toast_activated() -> bool {
    std::env::args().skip(1).any(|arg| arg == LAUNCH_MARKER)
}

#[cfg(windows)]
pub fn clear_history() -> Result<()> {
    use anyhow::Context;
    use windows::core::HSTRING;
    use windows::UI::Notifications::ToastNotificationManager;

    use crate::registration::AUMID;

    let history = ToastNotificationManager::History().context("Failed to open toast history")?;
    history
        .ClearWithId(&HSTRING::from(AUMID))
        .context("Failed to clear toast history")?;
    Ok(())
}

#[cfg(not(windows))]
pub fn clear_history() -> Result<()> {
    Ok(())
}
