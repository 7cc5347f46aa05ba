mod activation;
mod cli;
mod icon;
mod registration;
mod toast;

use anyhow::Result;
use cli::Args;
use toast::NotificationRequest;

fn main() {
    if let Err(e) = run() {
        eprintln!("\x1b[1;31m[ERROR]\x1b[0m {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // A launch caused by clicking an earlier toast clears the history and
    // exits before any argument parsing happens.
    if activation::was_toast_activated() {
        activation::clear_history()?;
        return Ok(());
    }

    let args = Args::parse_args();

    if args.init {
        println!("\x1b[1;32m[INFO]\x1b[0m Registering AUMID and creating Start Menu shortcut...");
        registration::register()?;
        println!("\x1b[1;32m[INFO]\x1b[0m Registration complete!");
        return Ok(());
    }

    if args.uninstall {
        println!("\x1b[1;32m[INFO]\x1b[0m Removing registration...");
        registration::unregister()?;
        println!("\x1b[1;32m[INFO]\x1b[0m Unregistration complete!");
        return Ok(());
    }

    if !registration::is_registered() {
        eprintln!("\x1b[1;33m[WARN]\x1b[0m Not registered. Run with --init first for proper notifications.");
    }

    let request = NotificationRequest::from_args(&args)?;
    toast::show(&request)?;

    Ok(())
}
