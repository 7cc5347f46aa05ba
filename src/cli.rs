use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "notifme")]
#[command(about = "Show a Windows toast notification")]
#[command(version)]
pub struct Args {
    /// Set title of the toast notification
    #[arg(short = 'p', long)]
    pub prompt: Option<String>,

    /// Set message of the toast notification
    #[arg(short = 'm', long, required_unless_present_any = ["init", "uninstall"])]
    pub message: Option<String>,

    /// Set icon of the toast notification (error, info, question, success, warn)
    #[arg(short = 't', long = "type")]
    pub kind: Option<String>,

    /// Number of seconds before the OS marks this notification as expired (default: 86400 seconds; 1 day)
    #[arg(short = 'e', long)]
    pub expiration: Option<f64>,

    /// Make the toast appear longer
    #[arg(short = 'd', long)]
    pub duration: bool,

    /// Keep the toast up as a reminder until it is dismissed
    #[arg(short = 's', long = "Sticky")]
    pub sticky: bool,

    /// First-run: register AUMID and create Start Menu shortcut
    #[arg(long)]
    pub init: bool,

    /// Remove registration and clean up
    #[arg(long)]
    pub uninstall: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
